//! Core functionality module
//!
//! This module contains the core logic for extracting bundled albums into the
//! user data directory, loading them, and removing them again on exit.
//!
//! # Submodules
//!
//! - `config` - Configuration loading, saving, and management
//! - `directory` - Target directory preparation, listing and cleanup
//! - `error` - Error types and result aliases
//! - `extractor` - Concurrent resource extraction
//! - `lifecycle` - Initialize / late initialize / quit hooks
//! - `loader` - Extension-based dispatch to the album loader

pub mod config;
pub mod directory;
pub mod error;
pub mod extractor;
pub mod lifecycle;
pub mod loader;
