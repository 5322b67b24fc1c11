//! Recording album loader
//!
//! Stands in for the host's album library. Every call is recorded before any
//! simulated failure, so tests can assert on exactly which files were handed
//! over and through which entry point.

use crate::album::{AlbumLoader, LoaderError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// A recorded loader call
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadCall {
    /// `load_one` was called with this path
    One(PathBuf),
    /// `load_pack` was called with this path
    Pack(PathBuf),
}

impl LoadCall {
    /// Path passed to the loader
    pub fn path(&self) -> &Path {
        match self {
            LoadCall::One(path) | LoadCall::Pack(path) => path,
        }
    }
}

/// Album loader that records calls and can fail or panic on chosen files
#[derive(Debug, Default)]
pub struct MockAlbumLoader {
    calls: Mutex<Vec<LoadCall>>,
    fail_on: HashSet<String>,
    panic_on: HashSet<String>,
}

impl MockAlbumLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return an error when a file with this name is loaded
    pub fn failing_on(mut self, file_name: &str) -> Self {
        self.fail_on.insert(file_name.to_string());
        self
    }

    /// Panic when a file with this name is loaded
    pub fn panicking_on(mut self, file_name: &str) -> Self {
        self.panic_on.insert(file_name.to_string());
        self
    }

    /// Calls recorded so far, in call order
    pub fn calls(&self) -> Vec<LoadCall> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LoadCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: LoadCall) -> Result<(), LoaderError> {
        let path = call.path().to_path_buf();
        self.lock().push(call);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.panic_on.contains(&name) {
            panic!("simulated loader panic on {}", name);
        }
        if self.fail_on.contains(&name) {
            return Err(LoaderError::Rejected(format!("simulated failure on {}", name)));
        }
        Ok(())
    }
}

impl AlbumLoader for MockAlbumLoader {
    fn load_one(&self, path: &Path) -> Result<(), LoaderError> {
        self.record(LoadCall::One(path.to_path_buf()))
    }

    fn load_pack(&self, path: &Path) -> Result<(), LoaderError> {
        self.record(LoadCall::Pack(path.to_path_buf()))
    }
}
