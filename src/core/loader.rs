//! Directory loader
//!
//! Scans the target directory (non-recursively) and hands each file to the
//! album loader entry point matching its extension. Files are processed one
//! at a time, and a failure on one file never stops the rest.

use crate::album::{AlbumKind, AlbumLoader};
use crate::core::directory::TargetDirectory;
use crate::core::error::{panic_message, ChartError};
use log::{error, info, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

/// Statistics about one load pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadStats {
    pub files_found: usize,
    pub albums_loaded: usize,
    pub packs_loaded: usize,
    pub unsupported: usize,
    pub errors: usize,
}

impl LoadStats {
    /// Albums and packs handed to the loader successfully
    pub fn loaded(&self) -> usize {
        self.albums_loaded + self.packs_loaded
    }
}

impl std::fmt::Display for LoadStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Files: {}, Albums: {}, Packs: {}, Unsupported: {}, Errors: {}",
            self.files_found, self.albums_loaded, self.packs_loaded, self.unsupported, self.errors
        )
    }
}

/// Loads every album file found in the target directory
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    target: TargetDirectory,
}

impl DirectoryLoader {
    /// Create a loader for `target`
    pub fn new(target: TargetDirectory) -> Self {
        Self { target }
    }

    /// Dispatch every file in the directory to `loader`
    ///
    /// An absent or empty directory is logged and yields empty stats.
    pub fn load_all<L: AlbumLoader + ?Sized>(&self, loader: &L) -> LoadStats {
        let mut stats = LoadStats::default();
        info!("Loading albums from directory...");

        if !self.target.exists() {
            warn!(
                "Albums directory does not exist at: {}",
                self.target.path().display()
            );
            return stats;
        }

        let files = match self.target.list_files() {
            Ok(files) => files,
            Err(e) => {
                error!("Failed to load albums from directory: {}", e);
                stats.errors += 1;
                return stats;
            }
        };

        if files.is_empty() {
            info!("No album files found in the directory.");
            return stats;
        }

        stats.files_found = files.len();
        info!("Loading {} album files...", files.len());

        for file in &files {
            let name = display_name(file);

            let Some(kind) = AlbumKind::from_path(file) else {
                warn!("{}", ChartError::UnsupportedFileType(name));
                stats.unsupported += 1;
                continue;
            };

            match dispatch(loader, kind, file) {
                Ok(()) => {
                    info!("Loaded {}: {}", kind, name);
                    match kind {
                        AlbumKind::Single => stats.albums_loaded += 1,
                        AlbumKind::Pack => stats.packs_loaded += 1,
                    }
                }
                Err(message) => {
                    error!("{}", ChartError::ExternalLoader { file: name, message });
                    stats.errors += 1;
                }
            }
        }

        info!("Album loading completed. {}", stats);
        stats
    }
}

/// Call the loader, turning both errors and panics into a message
fn dispatch<L: AlbumLoader + ?Sized>(
    loader: &L,
    kind: AlbumKind,
    path: &Path,
) -> Result<(), String> {
    match catch_unwind(AssertUnwindSafe(|| loader.load(kind, path))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(panic_payload) => Err(format!(
            "loader panicked: {}",
            panic_message(panic_payload.as_ref())
        )),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdb::{LoadCall, MockAlbumLoader};
    use std::fs;
    use tempfile::TempDir;

    fn populated(files: &[(&str, &[u8])]) -> (TempDir, DirectoryLoader) {
        let temp_dir = TempDir::new().unwrap();
        let target = TargetDirectory::new(temp_dir.path());
        for (name, bytes) in files {
            fs::write(target.file_path(name), bytes).unwrap();
        }
        (temp_dir, DirectoryLoader::new(target))
    }

    #[test]
    fn test_dispatch_by_extension() {
        let (temp_dir, dir_loader) =
            populated(&[("x.mdm", &b"one"[..]), ("y.mdp", &b"pack"[..]), ("z.txt", &b"text"[..])]);
        let loader = MockAlbumLoader::new();

        let stats = dir_loader.load_all(&loader);

        assert_eq!(stats.files_found, 3);
        assert_eq!(stats.albums_loaded, 1);
        assert_eq!(stats.packs_loaded, 1);
        assert_eq!(stats.unsupported, 1);
        assert_eq!(stats.errors, 0);

        let mut calls = loader.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                LoadCall::One(temp_dir.path().join("x.mdm")),
                LoadCall::Pack(temp_dir.path().join("y.mdp")),
            ]
        );
    }

    #[test]
    fn test_loader_failure_does_not_stop_the_rest() {
        let (_temp_dir, dir_loader) =
            populated(&[("a.mdm", &b"a"[..]), ("bad.mdm", &b"b"[..]), ("c.mdp", &b"c"[..])]);
        let loader = MockAlbumLoader::new().failing_on("bad.mdm");

        let stats = dir_loader.load_all(&loader);

        assert_eq!(stats.errors, 1);
        assert_eq!(stats.loaded(), 2);
        assert_eq!(loader.calls().len(), 3);
    }

    #[test]
    fn test_loader_panic_is_contained() {
        let (_temp_dir, dir_loader) = populated(&[("boom.mdp", &b"a"[..]), ("fine.mdm", &b"b"[..])]);
        let loader = MockAlbumLoader::new().panicking_on("boom.mdp");

        let stats = dir_loader.load_all(&loader);

        assert_eq!(stats.errors, 1);
        assert_eq!(stats.albums_loaded, 1);
    }

    #[test]
    fn test_missing_directory_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let dir_loader = DirectoryLoader::new(TargetDirectory::new(temp_dir.path().join("gone")));
        let loader = MockAlbumLoader::new();

        let stats = dir_loader.load_all(&loader);

        assert_eq!(stats, LoadStats::default());
        assert!(loader.calls().is_empty());
    }

    #[test]
    fn test_empty_directory_is_noop() {
        let (_temp_dir, dir_loader) = populated(&[]);
        let loader = MockAlbumLoader::new();

        let stats = dir_loader.load_all(&loader);

        assert_eq!(stats.files_found, 0);
        assert!(loader.calls().is_empty());
    }

    #[test]
    fn test_subdirectories_are_ignored() {
        let (temp_dir, dir_loader) = populated(&[("a.mdm", &b"a"[..])]);
        fs::create_dir(temp_dir.path().join("nested.mdp")).unwrap();
        let loader = MockAlbumLoader::new();

        let stats = dir_loader.load_all(&loader);

        assert_eq!(stats.files_found, 1);
        assert_eq!(
            loader.calls(),
            vec![LoadCall::One(temp_dir.path().join("a.mdm"))]
        );
    }
}
