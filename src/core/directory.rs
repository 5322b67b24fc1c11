//! Target directory management
//!
//! The target directory is the ephemeral staging area for extracted resources:
//! created before extraction, scanned by the directory loader, deleted on quit.

use crate::core::error::{ChartError, Result};
use log::{debug, error, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What happened when the target directory was cleaned up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The directory and its contents were deleted
    Removed,
    /// There was nothing to delete
    NotPresent,
    /// Deletion failed; the message is the underlying error
    Failed(String),
}

impl fmt::Display for CleanupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupOutcome::Removed => write!(f, "removed"),
            CleanupOutcome::NotPresent => write!(f, "not present"),
            CleanupOutcome::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

/// The on-disk staging directory for extracted albums
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDirectory {
    path: PathBuf,
}

impl TargetDirectory {
    /// Wrap a directory path; nothing is touched on disk
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the directory currently exists
    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Destination path for a resource
    pub fn file_path(&self, resource_name: &str) -> PathBuf {
        self.path.join(resource_name)
    }

    /// Ensure the directory exists, creating parents as needed
    ///
    /// Succeeds without touching anything if the directory is already there.
    /// Fails if creation is denied or a non-directory entry occupies the path.
    pub fn prepare(&self) -> Result<()> {
        if self.path.is_dir() {
            debug!("Albums directory already present: {}", self.path.display());
            return Ok(());
        }

        if self.path.exists() {
            let err = ChartError::DirectoryPrep {
                path: self.path.clone(),
                message: "path exists and is not a directory".to_string(),
            };
            error!("{}", err);
            return Err(err);
        }

        fs::create_dir_all(&self.path).map_err(|e| {
            let err = ChartError::DirectoryPrep {
                path: self.path.clone(),
                message: e.to_string(),
            };
            error!("{}", err);
            err
        })?;

        info!("Created albums directory: {}", self.path.display());
        Ok(())
    }

    /// Regular files directly inside the directory, in file system order
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.path).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ChartError::Io(e.to_string()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Recursively delete the directory and everything in it
    ///
    /// Never fails: errors are logged and reported in the outcome.
    ///
    /// A non-directory entry at the path is not ours and is left untouched.
    pub fn clean(&self) -> CleanupOutcome {
        if !self.path.is_dir() {
            if self.path.exists() {
                warn!(
                    "Albums path is not a directory, leaving it in place: {}",
                    self.path.display()
                );
            }
            info!("Temporary albums directory does not exist - no cleanup needed.");
            return CleanupOutcome::NotPresent;
        }

        match fs::remove_dir_all(&self.path) {
            Ok(()) => {
                info!("Temporary albums directory cleaned up successfully.");
                CleanupOutcome::Removed
            }
            Err(e) => {
                let err = ChartError::Cleanup {
                    path: self.path.clone(),
                    message: e.to_string(),
                };
                error!("{}", err);
                CleanupOutcome::Failed(e.to_string())
            }
        }
    }
}
