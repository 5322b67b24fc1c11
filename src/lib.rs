//! Embedded Chart Library
//!
//! Ships album files inside an application and makes them available to the
//! host's album library at runtime: bundled resources are extracted into a
//! directory under the user data root, every album in that directory is
//! loaded, and the directory is removed again when the application quits.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`core`] - Configuration, error handling, the target directory, the
//!   extractor, the directory loader and the lifecycle driver
//! - [`resources`] - Where bundled resources come from (compiled-in bytes or a
//!   bundle directory next to the executable)
//! - [`album`] - The album loader seam and a catalog-building loader
//! - [`cli`] - Command-line interface (only used by the binary)
//! - [`testdb`] - Mock resources and loaders for testing
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use embedded_chart::album::CatalogLoader;
//! use embedded_chart::core::config::Config;
//! use embedded_chart::core::lifecycle::EmbeddedChart;
//! use embedded_chart::resources::BundleResources;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default()?;
//!
//!     let mut chart = EmbeddedChart::from_config(
//!         &config,
//!         BundleResources::new(config.bundle_dir()),
//!         CatalogLoader::new(),
//!     );
//!
//!     chart.on_initialize()?;
//!     let stats = chart.on_late_initialize();
//!     println!("{}", stats);
//!
//!     chart.on_application_quit();
//!     Ok(())
//! }
//! ```
//!
//! # Compiled-in Resources
//!
//! ```rust,ignore
//! use embedded_chart::embedded_resources;
//! use embedded_chart::core::lifecycle::EmbeddedChart;
//! use embedded_chart::testdb::MockAlbumLoader;
//!
//! let resources = embedded_resources! {
//!     "Showcase.mdp" => "../albums/Showcase.mdp",
//! };
//! let mut chart = EmbeddedChart::new("./UserData/EmbeddedAlbums", resources, MockAlbumLoader::new());
//! # let _ = chart.on_initialize();
//! ```

pub mod album;
pub mod cli;
pub mod core;
pub mod resources;
pub mod testdb;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
