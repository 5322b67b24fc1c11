//! Album loader abstraction
//!
//! `AlbumLoader` mirrors the two entry points of the external album library:
//! one for single albums and one for album packs. Which one a file goes to is
//! decided by [`AlbumKind::from_path`].

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name suffix of a single album
pub const ALBUM_EXTENSION: &str = ".mdm";

/// File name suffix of an album pack
pub const PACK_EXTENSION: &str = ".mdp";

/// Errors reported by an album loader
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The file vanished before it could be loaded
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// The file has no content
    #[error("Album file is empty: {0}")]
    Empty(PathBuf),

    /// Reading the file failed
    #[error("IO error: {0}")]
    Io(String),

    /// The loader refused the album
    #[error("Album rejected: {0}")]
    Rejected(String),
}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::Io(err.to_string())
    }
}

/// What kind of album a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumKind {
    /// A single album (`.mdm`)
    Single,
    /// An album pack (`.mdp`)
    Pack,
}

impl AlbumKind {
    /// Classify a path by its file name suffix
    ///
    /// Matching is case-sensitive. Returns `None` for unsupported files.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(ALBUM_EXTENSION) {
            Some(AlbumKind::Single)
        } else if name.ends_with(PACK_EXTENSION) {
            Some(AlbumKind::Pack)
        } else {
            None
        }
    }

    /// File name suffix for this kind
    pub fn extension(&self) -> &'static str {
        match self {
            AlbumKind::Single => ALBUM_EXTENSION,
            AlbumKind::Pack => PACK_EXTENSION,
        }
    }
}

impl Display for AlbumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlbumKind::Single => write!(f, "album"),
            AlbumKind::Pack => write!(f, "album pack"),
        }
    }
}

/// Trait for the external album library
///
/// Implementations are called sequentially from the directory loader, one
/// file at a time.
pub trait AlbumLoader: Send + Sync {
    /// Load a single album from `path`
    fn load_one(&self, path: &Path) -> Result<(), LoaderError>;

    /// Load an album pack from `path`
    fn load_pack(&self, path: &Path) -> Result<(), LoaderError>;

    /// Dispatch `path` to the entry point matching `kind`
    fn load(&self, kind: AlbumKind, path: &Path) -> Result<(), LoaderError> {
        match kind {
            AlbumKind::Single => self.load_one(path),
            AlbumKind::Pack => self.load_pack(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_kind_from_path() {
        assert_eq!(
            AlbumKind::from_path(Path::new("/dir/x.mdm")),
            Some(AlbumKind::Single)
        );
        assert_eq!(
            AlbumKind::from_path(Path::new("/dir/x.mdp")),
            Some(AlbumKind::Pack)
        );
        assert_eq!(AlbumKind::from_path(Path::new("/dir/x.txt")), None);
        assert_eq!(AlbumKind::from_path(Path::new("/dir/mdm")), None);
    }

    #[test]
    fn test_album_kind_is_case_sensitive() {
        assert_eq!(AlbumKind::from_path(Path::new("x.MDM")), None);
        assert_eq!(AlbumKind::from_path(Path::new("x.Mdp")), None);
    }

    #[test]
    fn test_album_kind_uses_file_name_only() {
        // A directory called "something.mdm" does not make its children albums
        assert_eq!(
            AlbumKind::from_path(Path::new("/songs.mdm/readme.txt")),
            None
        );
    }

    #[test]
    fn test_album_kind_display() {
        assert_eq!(AlbumKind::Single.to_string(), "album");
        assert_eq!(AlbumKind::Pack.to_string(), "album pack");
        assert_eq!(AlbumKind::Pack.extension(), ".mdp");
    }
}
