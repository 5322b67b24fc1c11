//! Resources shipped as files in a bundle directory
//!
//! The CLI host uses this source: payloads sit flat in a `bundle` folder next
//! to the executable. Only regular files directly inside the folder count.

use super::traits::{ResourceSource, ResourceStream};
use crate::core::error::{ChartError, Result};
use log::{debug, trace};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A directory of bundled payloads
#[derive(Debug, Clone)]
pub struct BundleResources {
    root: PathBuf,
}

impl BundleResources {
    /// Create a source rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The bundle directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceSource for BundleResources {
    fn source_name(&self) -> String {
        format!("bundle '{}'", self.root.display())
    }

    fn resource_names(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(ChartError::Enumeration(format!(
                "bundle directory '{}' does not exist",
                self.root.display()
            )));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ChartError::Enumeration(e.to_string()))?;
            if !entry.file_type().is_file() {
                trace!("Skipping non-file bundle entry: {}", entry.path().display());
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => debug!(
                    "Skipping bundle entry with non UTF-8 name: {}",
                    entry.path().display()
                ),
            }
        }

        names.sort();
        Ok(names)
    }

    fn open_resource(&self, name: &str) -> Option<ResourceStream<'_>> {
        match File::open(self.root.join(name)) {
            Ok(file) => Some(Box::new(BufReader::new(file))),
            Err(e) => {
                debug!("Cannot open bundled resource '{}': {}", name, e);
                None
            }
        }
    }
}
