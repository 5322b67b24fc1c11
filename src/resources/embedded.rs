//! Resources compiled into the binary
//!
//! Use the [`embedded_resources!`](crate::embedded_resources) macro to build a
//! table from files at compile time:
//!
//! ```rust,ignore
//! use embedded_chart::embedded_resources;
//!
//! let resources = embedded_resources! {
//!     "song.mdm" => "../assets/song.mdm",
//!     "pack.mdp" => "../assets/pack.mdp",
//! };
//! ```

use super::traits::{ResourceSource, ResourceStream};
use crate::core::error::Result;
use std::io::Cursor;

/// A single compiled-in payload
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedResource {
    /// Resource name, used verbatim as the extracted file name
    pub name: &'static str,
    /// Payload bytes
    pub bytes: &'static [u8],
}

/// A table of compiled-in payloads
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    entries: Vec<EmbeddedResource>,
}

impl EmbeddedResources {
    /// Create a table from `(name, bytes)` pairs
    pub fn new(entries: Vec<(&'static str, &'static [u8])>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, bytes)| EmbeddedResource { name, bytes })
                .collect(),
        }
    }

    /// Add one payload
    pub fn with_resource(mut self, name: &'static str, bytes: &'static [u8]) -> Self {
        self.entries.push(EmbeddedResource { name, bytes });
        self
    }

    /// All entries, in declaration order
    pub fn entries(&self) -> &[EmbeddedResource] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceSource for EmbeddedResources {
    fn source_name(&self) -> String {
        "embedded resources".to_string()
    }

    fn resource_names(&self) -> Result<Vec<String>> {
        Ok(self.entries.iter().map(|e| e.name.to_string()).collect())
    }

    fn open_resource(&self, name: &str) -> Option<ResourceStream<'_>> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| Box::new(Cursor::new(e.bytes)) as ResourceStream<'_>)
    }
}

/// Build an [`EmbeddedResources`] table with `include_bytes!`
///
/// Paths are resolved relative to the file that invokes the macro.
#[macro_export]
macro_rules! embedded_resources {
    ($($name:literal => $path:literal),* $(,)?) => {
        $crate::resources::EmbeddedResources::new(vec![
            $(($name, include_bytes!($path) as &'static [u8])),*
        ])
    };
}
