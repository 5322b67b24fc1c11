//! End-to-end scenarios across extraction, loading and cleanup

use super::{LoadCall, MockAlbumLoader, MockDataGenerator, MockResources};
use crate::album::{AlbumKind, CatalogLoader};
use crate::core::config::Config;
use crate::core::directory::CleanupOutcome;
use crate::core::extractor::ExtractorConfig;
use crate::core::lifecycle::{EmbeddedChart, LifecycleState};
use crate::embedded_resources;
use crate::resources::BundleResources;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

fn albums_dir(temp_dir: &TempDir) -> std::path::PathBuf {
    temp_dir.path().join("UserData").join("EmbeddedAlbums")
}

#[test]
fn test_album_and_pack_each_loaded_once() {
    let temp_dir = TempDir::new().unwrap();
    let dir = albums_dir(&temp_dir);
    let resources = MockResources::new()
        .with_resource("a.mdm", b"PK\x03\x04album".to_vec())
        .with_resource("b.mdp", b"PK\x03\x04pack".to_vec());

    let mut chart = EmbeddedChart::new(&dir, resources, MockAlbumLoader::new());
    chart.on_initialize().unwrap();
    chart.on_late_initialize();

    let mut calls = chart.loader().calls();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            LoadCall::One(dir.join("a.mdm")),
            LoadCall::Pack(dir.join("b.mdp")),
        ]
    );
}

#[test]
fn test_extracted_bytes_match_resources() {
    let temp_dir = TempDir::new().unwrap();
    let dir = albums_dir(&temp_dir);
    let resources = MockResources::generated(9, 20_000, 11);
    let expected: Vec<_> = resources.resources().to_vec();

    let mut chart = EmbeddedChart::new(&dir, resources, MockAlbumLoader::new())
        .with_extractor_config(ExtractorConfig::default().buffer_size(1000).max_threads(3));
    let stats = chart.initialize_blocking().unwrap();
    assert!(stats.is_complete());

    for resource in &expected {
        let written = fs::read(dir.join(&resource.name)).unwrap();
        assert_eq!(Some(&written), resource.content.as_ref());
    }
}

#[test]
fn test_one_bad_resource_does_not_affect_others() {
    let temp_dir = TempDir::new().unwrap();
    let dir = albums_dir(&temp_dir);
    let resources = MockResources::new()
        .with_resource("good1.mdm", vec![1u8; 500])
        .with_missing_stream("gone.mdm")
        .with_resource("broken.mdp", vec![2u8; 500])
        .with_failing_read("broken.mdp", 100)
        .with_resource("../escape.mdm", vec![3u8; 10])
        .with_resource("good2.mdp", vec![4u8; 500]);

    let mut chart = EmbeddedChart::new(&dir, resources, MockAlbumLoader::new())
        .with_extractor_config(ExtractorConfig::default().buffer_size(50));
    chart.on_initialize().unwrap();
    let load_stats = chart.on_late_initialize();

    let stats = chart.extraction_stats().unwrap();
    assert_eq!(stats.resources_found, 5);
    assert_eq!(stats.files_extracted, 2);
    assert_eq!(stats.streams_unavailable, 1);
    assert_eq!(stats.invalid_names, 1);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.failures.len(), 3);

    assert!(!dir.join("broken.mdp").exists());
    assert!(!temp_dir.path().join("UserData").join("escape.mdm").exists());
    assert_eq!(load_stats.files_found, 2);
    assert_eq!(load_stats.loaded(), 2);
}

#[test]
fn test_panicking_resource_does_not_lose_stats() {
    let temp_dir = TempDir::new().unwrap();
    let dir = albums_dir(&temp_dir);
    let resources = MockResources::generated(6, 1024, 8).with_panicking_read("album_000.mdm");

    let mut chart = EmbeddedChart::new(&dir, resources, MockAlbumLoader::new());
    chart.on_initialize().unwrap();
    let load_stats = chart.on_late_initialize();

    let stats = chart.extraction_stats().unwrap();
    assert_eq!(stats.files_extracted, 5);
    assert_eq!(stats.errors, 1);
    assert!(!dir.join("album_000.mdm").exists());
    assert_eq!(load_stats.loaded(), 5);
    assert_eq!(chart.state(), LifecycleState::AlbumsLoaded);
}

#[test]
fn test_no_resources_leaves_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let dir = albums_dir(&temp_dir);

    let mut chart = EmbeddedChart::new(&dir, MockResources::new(), MockAlbumLoader::new());
    chart.on_initialize().unwrap();
    let load_stats = chart.on_late_initialize();

    assert!(dir.is_dir());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    assert_eq!(load_stats.files_found, 0);
    assert!(chart.loader().calls().is_empty());
}

#[test]
fn test_enumeration_failure_still_loads_existing_files() {
    let temp_dir = TempDir::new().unwrap();
    let dir = albums_dir(&temp_dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("left_over.mdm"), b"old").unwrap();

    let resources = MockResources::new().with_enumeration_failure("manifest unreadable");
    let mut chart = EmbeddedChart::new(&dir, resources, MockAlbumLoader::new());
    chart.on_initialize().unwrap();
    let load_stats = chart.on_late_initialize();

    assert_eq!(chart.extraction_stats().unwrap().errors, 1);
    assert_eq!(load_stats.albums_loaded, 1);
}

#[test]
fn test_existing_file_is_overwritten() {
    let temp_dir = TempDir::new().unwrap();
    let dir = albums_dir(&temp_dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("a.mdm"), vec![9u8; 4096]).unwrap();

    let resources = MockResources::new().with_resource("a.mdm", b"fresh".to_vec());
    let mut chart = EmbeddedChart::new(&dir, resources, MockAlbumLoader::new());
    chart.initialize_blocking().unwrap();

    assert_eq!(fs::read(dir.join("a.mdm")).unwrap(), b"fresh");
}

#[test]
fn test_quit_removes_everything() {
    let temp_dir = TempDir::new().unwrap();
    let dir = albums_dir(&temp_dir);
    let resources = MockResources::generated(6, 2048, 5);

    let mut chart = EmbeddedChart::new(&dir, resources, MockAlbumLoader::new());
    chart.on_initialize().unwrap();
    chart.on_late_initialize();
    fs::create_dir(dir.join("host_cache")).unwrap();

    assert_eq!(chart.on_application_quit(), CleanupOutcome::Removed);
    assert_eq!(chart.state(), LifecycleState::CleanedUp);
    assert!(!dir.exists());
    assert!(temp_dir.path().join("UserData").is_dir());
}

#[test]
fn test_progress_reports_every_task() {
    let temp_dir = TempDir::new().unwrap();
    let dir = albums_dir(&temp_dir);
    let resources = MockResources::generated(10, 512, 2).with_missing_stream("ghost.mdm");

    let reported = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&reported);
    let config = ExtractorConfig::default().on_progress(move |progress| {
        assert_eq!(progress.total, 11);
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut chart =
        EmbeddedChart::new(&dir, resources, MockAlbumLoader::new()).with_extractor_config(config);
    chart.initialize_blocking().unwrap();

    assert_eq!(reported.load(Ordering::SeqCst), 11);
}

#[test]
fn test_bundle_to_catalog_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let bundle_dir = temp_dir.path().join("bundle");
    let names = MockDataGenerator::new(21)
        .write_bundle(&bundle_dir, 8, 4096)
        .unwrap();
    fs::write(bundle_dir.join("README.txt"), b"not an album").unwrap();

    let mut config = Config::default();
    config.paths.user_data_dir = temp_dir.path().join("UserData");

    let mut chart = EmbeddedChart::from_config(
        &config,
        BundleResources::new(&bundle_dir),
        CatalogLoader::new(),
    );
    chart.on_initialize().unwrap();
    let load_stats = chart.on_late_initialize();

    assert_eq!(chart.extraction_stats().unwrap().files_extracted, 9);
    assert_eq!(load_stats.unsupported, 1);
    assert_eq!(load_stats.loaded(), names.len());

    let entries = chart.loader().entries();
    assert_eq!(entries.len(), 8);
    assert_eq!(entries.iter().filter(|e| e.kind == AlbumKind::Pack).count(), 2);

    chart.on_application_quit();
    assert!(!config.albums_dir().exists());
}

#[test]
fn test_embedded_resources_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let dir = albums_dir(&temp_dir);
    let resources = embedded_resources! {
        "default.mdp" => "../../config.example.toml",
    };

    let mut chart = EmbeddedChart::new(&dir, resources, MockAlbumLoader::new());
    chart.on_initialize().unwrap();
    chart.on_late_initialize();

    assert_eq!(
        chart.loader().calls(),
        vec![LoadCall::Pack(dir.join("default.mdp"))]
    );
    assert_eq!(
        fs::read_to_string(dir.join("default.mdp")).unwrap(),
        include_str!("../../config.example.toml")
    );
}
