//! Mock data generator for album-like payloads
//!
//! Album files are zip archives, so generated payloads start with a zip local
//! file header followed by seeded random bytes. That is enough for extraction
//! and loading tests, which treat contents as opaque.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::io;
use std::path::Path;

/// Zip local file header signature
pub const ZIP_MAGIC: [u8; 4] = *b"PK\x03\x04";

/// Default payload size for generated resources (4KB)
pub const TEST_PAYLOAD_SIZE: usize = 4 * 1024;

/// Seeded generator for resource names and payloads
pub struct MockDataGenerator {
    rng: StdRng,
}

impl MockDataGenerator {
    /// Create a generator; the same seed always yields the same data
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Name for the `index`-th generated resource
    ///
    /// Every fourth resource is an album pack, the rest are single albums.
    pub fn resource_name(index: usize) -> String {
        if index % 4 == 3 {
            format!("pack_{:03}.mdp", index)
        } else {
            format!("album_{:03}.mdm", index)
        }
    }

    /// Generate a payload of exactly `size` bytes (at least the zip header)
    pub fn album_payload(&mut self, size: usize) -> Vec<u8> {
        let size = size.max(ZIP_MAGIC.len());
        let mut data = vec![0u8; size];
        data[..ZIP_MAGIC.len()].copy_from_slice(&ZIP_MAGIC);
        self.rng.fill(&mut data[ZIP_MAGIC.len()..]);
        data
    }

    /// Generate `count` named payloads
    pub fn resources(&mut self, count: usize, size: usize) -> Vec<(String, Vec<u8>)> {
        (0..count)
            .map(|i| (Self::resource_name(i), self.album_payload(size)))
            .collect()
    }

    /// Write `count` payloads into `dir` as a bundle directory
    ///
    /// Sizes vary between half and the full `size`. Returns the file names.
    pub fn write_bundle(&mut self, dir: &Path, count: usize, size: usize) -> io::Result<Vec<String>> {
        fs::create_dir_all(dir)?;

        let mut names = Vec::with_capacity(count);
        for i in 0..count {
            let name = Self::resource_name(i);
            let len = self.rng.gen_range(size / 2..=size.max(1));
            let payload = self.album_payload(len);
            fs::write(dir.join(&name), payload)?;
            names.push(name);
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_payload_has_zip_header() {
        let mut generator = MockDataGenerator::new(42);
        let payload = generator.album_payload(TEST_PAYLOAD_SIZE);
        assert_eq!(payload.len(), TEST_PAYLOAD_SIZE);
        assert_eq!(&payload[..4], b"PK\x03\x04");

        assert_eq!(generator.album_payload(0).len(), 4);
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = MockDataGenerator::new(7).resources(3, 256);
        let b = MockDataGenerator::new(7).resources(3, 256);
        let c = MockDataGenerator::new(8).resources(3, 256);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(MockDataGenerator::resource_name(0), "album_000.mdm");
        assert_eq!(MockDataGenerator::resource_name(3), "pack_003.mdp");
        assert_eq!(MockDataGenerator::resource_name(12), "album_012.mdm");
    }

    #[test]
    fn test_write_bundle() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = temp_dir.path().join("bundle");

        let names = MockDataGenerator::new(1)
            .write_bundle(&bundle, 5, 1000)
            .unwrap();

        assert_eq!(names.len(), 5);
        for name in &names {
            let len = fs::metadata(bundle.join(name)).unwrap().len();
            assert!((500..=1000).contains(&len));
        }
    }
}
