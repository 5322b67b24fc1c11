//! Resource source abstraction
//!
//! The extractor only needs two things from a packaging mechanism: the list of
//! resource names and a read stream per name. Both compiled-in resources and
//! the bundle directory implement `ResourceSource`, as does the mock source in
//! `testdb`, so the extraction pipeline is exercised the same way in tests.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use embedded_chart::resources::{ResourceSource, BundleResources};
//! use std::io::Read;
//!
//! let source = BundleResources::new("./bundle");
//! for name in source.resource_names().unwrap() {
//!     if let Some(mut stream) = source.open_resource(&name) {
//!         let mut bytes = Vec::new();
//!         stream.read_to_end(&mut bytes).unwrap();
//!         println!("{}: {} bytes", name, bytes.len());
//!     }
//! }
//! ```

use crate::core::error::Result;
use std::io::Read;
use std::path::{Component, Path};

/// A read stream for one resource
pub type ResourceStream<'a> = Box<dyn Read + Send + 'a>;

/// Trait for anything that can hand out named binary payloads
///
/// Implementations must be shareable across the extraction worker threads.
pub trait ResourceSource: Send + Sync {
    /// Human-readable label used in log messages
    fn source_name(&self) -> String;

    /// List every resource name
    ///
    /// An `Err` means the source itself could not be enumerated. An empty
    /// list is a valid answer.
    fn resource_names(&self) -> Result<Vec<String>>;

    /// Open a read stream for a resource
    ///
    /// Returns `None` when the stream cannot be obtained. Resource presence is
    /// not guaranteed, so callers treat `None` as a skip rather than an error.
    fn open_resource(&self, name: &str) -> Option<ResourceStream<'_>>;

    /// Number of resources, or zero if enumeration fails
    fn resource_count(&self) -> usize {
        self.resource_names().map(|n| n.len()).unwrap_or(0)
    }
}

/// Check that a resource name maps to exactly one file inside the target directory
///
/// Names are used verbatim as file names, so anything with a separator, a
/// parent reference, a root or drive prefix is rejected.
pub fn is_valid_resource_name(name: &str) -> bool {
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return false;
    }

    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}
