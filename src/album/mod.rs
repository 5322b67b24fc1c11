//! Album loader seam
//!
//! The album library that understands `.mdm` and `.mdp` contents lives outside
//! this crate. This module defines the interface the directory loader dispatches
//! to and ships a catalog-keeping implementation for the CLI host.
//!
//! # Submodules
//!
//! - `traits` - `AlbumLoader`, `AlbumKind` and `LoaderError`
//! - `catalog` - `CatalogLoader`, which validates and records loaded albums

pub mod catalog;
pub mod traits;

pub use catalog::{CatalogEntry, CatalogLoader};
pub use traits::{AlbumKind, AlbumLoader, LoaderError, ALBUM_EXTENSION, PACK_EXTENSION};
