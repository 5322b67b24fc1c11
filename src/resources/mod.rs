//! Resource sources
//!
//! Resources are the named payloads bundled with the executable. This module
//! abstracts where they come from so the extractor can work with compiled-in
//! bytes, a bundle directory shipped next to the binary, or a mock source in
//! tests.
//!
//! # Submodules
//!
//! - `traits` - The `ResourceSource` trait and resource name validation
//! - `embedded` - Resources compiled into the binary with `include_bytes!`
//! - `bundle` - Resources read from a flat bundle directory

pub mod bundle;
pub mod embedded;
pub mod traits;

pub use bundle::BundleResources;
pub use embedded::EmbeddedResources;
pub use traits::{is_valid_resource_name, ResourceSource, ResourceStream};
