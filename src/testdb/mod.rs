//! Test Database Module
//!
//! Mock resource sources, mock album loaders and payload generators that let
//! the whole lifecycle be exercised without a packaged executable or the real
//! album library.
//!
//! # Features
//!
//! - **Mock Resources**: In-memory resources with failure injection (missing
//!   streams, reads that fail part-way, enumeration failures, slow reads)
//! - **Mock Loader**: Records every `load_one`/`load_pack` call and can fail or
//!   panic on chosen files
//! - **Data Generator**: Seeded album-like payloads and bundle directories
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use embedded_chart::core::lifecycle::EmbeddedChart;
//! use embedded_chart::testdb::{MockAlbumLoader, MockResources};
//!
//! let resources = MockResources::new()
//!     .with_resource("a.mdm", b"album".to_vec())
//!     .with_missing_stream("ghost.mdm");
//!
//! let mut chart = EmbeddedChart::new("/tmp/EmbeddedAlbums", resources, MockAlbumLoader::new());
//! chart.on_initialize().unwrap();
//! chart.on_late_initialize();
//! assert_eq!(chart.loader().calls().len(), 1);
//! chart.on_application_quit();
//! ```

pub mod generator;
pub mod mock_loader;
pub mod mock_resources;

#[cfg(test)]
mod integration;

pub use generator::MockDataGenerator;
pub use mock_loader::{LoadCall, MockAlbumLoader};
pub use mock_resources::{MockResource, MockResources};
