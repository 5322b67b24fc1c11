//! Catalog-keeping album loader
//!
//! Stands in for the album library when the crate runs as its own host. Each
//! file is checked to be a readable, non-empty regular file and recorded in an
//! in-memory catalog, which can be written out as JSON.

use super::traits::{AlbumKind, AlbumLoader, LoaderError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// One loaded album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// File name
    pub name: String,
    /// Full path that was loaded
    pub path: PathBuf,
    /// Album or album pack
    pub kind: AlbumKind,
    /// File size in bytes
    pub size: u64,
}

/// Album loader that validates files and keeps a catalog of what it loaded
#[derive(Debug, Default)]
pub struct CatalogLoader {
    entries: Mutex<Vec<CatalogEntry>>,
}

impl CatalogLoader {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the catalog in load order
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.lock().clone()
    }

    /// Number of loaded albums and packs
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been loaded
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Write the catalog as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.entries())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)?;
        info!("Catalog written to: {}", path.display());
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CatalogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, kind: AlbumKind, path: &Path) -> Result<(), LoaderError> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoaderError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };

        if !metadata.is_file() {
            return Err(LoaderError::Rejected(format!(
                "'{}' is not a regular file",
                path.display()
            )));
        }
        if metadata.len() == 0 {
            return Err(LoaderError::Empty(path.to_path_buf()));
        }

        // Make sure the file can actually be opened for reading
        File::open(path)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!("Cataloged {}: {} ({} bytes)", kind, name, metadata.len());

        self.lock().push(CatalogEntry {
            name,
            path: path.to_path_buf(),
            kind,
            size: metadata.len(),
        });
        Ok(())
    }
}

impl AlbumLoader for CatalogLoader {
    fn load_one(&self, path: &Path) -> Result<(), LoaderError> {
        self.record(AlbumKind::Single, path)
    }

    fn load_pack(&self, path: &Path) -> Result<(), LoaderError> {
        self.record(AlbumKind::Pack, path)
    }
}
