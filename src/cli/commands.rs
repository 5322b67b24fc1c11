//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands. The binary
//! stands in for the host application: it drives the lifecycle hooks in order
//! and uses a [`CatalogLoader`] in place of the real album library.

use crate::album::CatalogLoader;
use crate::cli::progress::{
    format_bytes, print_header, print_info, print_success, print_warning, ExtractionProgress,
};
use crate::cli::{Args, Commands};
use crate::core::config::{init_config, Config};
use crate::core::directory::{CleanupOutcome, TargetDirectory};
use crate::core::extractor::ExtractorConfig;
use crate::core::lifecycle::EmbeddedChart;
use crate::core::loader::DirectoryLoader;
use crate::resources::{BundleResources, ResourceSource};
use crate::testdb::MockDataGenerator;
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Run the appropriate command based on CLI arguments
pub fn run_command(args: &Args, config: &Config, shutdown_flag: Arc<AtomicBool>) -> Result<()> {
    match &args.command {
        None => run_lifecycle(config, false, None, shutdown_flag)?,
        Some(Commands::Run { hold, catalog }) => {
            run_lifecycle(config, *hold, catalog.as_deref(), shutdown_flag)?;
        }
        Some(Commands::Extract) => {
            extract_only(config)?;
        }
        Some(Commands::Load { catalog }) => {
            load_only(config, catalog.as_deref())?;
        }
        Some(Commands::Clean) => {
            clean(config);
        }
        Some(Commands::List) => {
            list_resources(config)?;
        }
        Some(Commands::ShowConfig) => {
            show_config(config);
        }
        Some(Commands::GenerateConfig { output }) => {
            generate_config_file(output.clone())?;
        }
        Some(Commands::GenerateBundle {
            output,
            count,
            size,
            seed,
        }) => {
            generate_bundle(output, *count, *size, *seed)?;
        }
    }

    Ok(())
}

/// Extractor settings from config, wired to a progress bar
fn extractor_config_with_progress(config: &Config) -> (ExtractorConfig, Arc<ExtractionProgress>) {
    let progress = Arc::new(ExtractionProgress::new());
    let callback_progress = Arc::clone(&progress);
    let extractor_config = ExtractorConfig::from(&config.extraction)
        .on_progress(move |update| callback_progress.update(&update));
    (extractor_config, progress)
}

/// Initialize, late initialize, optionally hold, then quit
pub fn run_lifecycle(
    config: &Config,
    hold: bool,
    catalog: Option<&Path>,
    shutdown_flag: Arc<AtomicBool>,
) -> Result<()> {
    let bundle_dir = config.bundle_dir();
    info!("Bundle: {}", bundle_dir.display());
    info!("Albums directory: {}", config.albums_dir().display());

    let (extractor_config, progress) = extractor_config_with_progress(config);
    let mut chart = EmbeddedChart::from_config(
        config,
        BundleResources::new(&bundle_dir),
        CatalogLoader::new(),
    )
    .with_extractor_config(extractor_config);

    if let Err(e) = chart.on_initialize() {
        progress.finish_with_error("Failed to prepare the albums directory");
        return Err(e).context("Failed to prepare the albums directory");
    }

    let load_stats = chart.on_late_initialize();
    match chart.extraction_stats() {
        Some(stats) => {
            progress.finish(stats.total_bytes);
            print_extraction_summary(stats.files_extracted, stats.resources_found, stats.total_bytes);
        }
        None => progress.finish_with_error("Extraction did not report results"),
    }
    print_success(&format!(
        "Loaded {} albums and {} packs",
        load_stats.albums_loaded, load_stats.packs_loaded
    ));
    if load_stats.errors > 0 || load_stats.unsupported > 0 {
        print_warning(&format!(
            "{} files failed to load, {} unsupported",
            load_stats.errors, load_stats.unsupported
        ));
    }

    if let Some(path) = catalog {
        write_catalog(chart.loader(), path)?;
    }

    if hold {
        print_info("Albums are available. Press Ctrl+C to quit and clean up.");
        while !shutdown_flag.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(200));
        }
    }

    report_cleanup(&chart.on_application_quit());
    Ok(())
}

/// Prepare the directory and extract, leaving the files in place
pub fn extract_only(config: &Config) -> Result<()> {
    let bundle_dir = config.bundle_dir();
    let (extractor_config, progress) = extractor_config_with_progress(config);
    let mut chart = EmbeddedChart::from_config(
        config,
        BundleResources::new(&bundle_dir),
        CatalogLoader::new(),
    )
    .with_extractor_config(extractor_config);

    let stats = match chart.initialize_blocking() {
        Ok(stats) => stats,
        Err(e) => {
            progress.finish_with_error("Failed to prepare the albums directory");
            return Err(e).context("Failed to prepare the albums directory");
        }
    };
    progress.finish(stats.total_bytes);

    print_extraction_summary(stats.files_extracted, stats.resources_found, stats.total_bytes);
    for failure in &stats.failures {
        print_warning(&format!("{}: {}", failure.name, failure.message));
    }
    print_info(&format!("Albums directory: {}", config.albums_dir().display()));
    Ok(())
}

/// Load the albums already in the directory
pub fn load_only(config: &Config, catalog: Option<&Path>) -> Result<()> {
    let loader = CatalogLoader::new();
    let stats = DirectoryLoader::new(TargetDirectory::new(config.albums_dir())).load_all(&loader);

    print_success(&format!("{}", stats));
    for entry in loader.entries() {
        print_info(&format!("{} ({}, {})", entry.name, entry.kind, format_bytes(entry.size)));
    }

    if let Some(path) = catalog {
        write_catalog(&loader, path)?;
    }
    Ok(())
}

/// Remove the albums directory
pub fn clean(config: &Config) {
    report_cleanup(&TargetDirectory::new(config.albums_dir()).clean());
}

/// List the resources in the bundle
pub fn list_resources(config: &Config) -> Result<()> {
    let source = BundleResources::new(config.bundle_dir());
    let names = source
        .resource_names()
        .with_context(|| format!("Failed to list {}", source.source_name()))?;

    if names.is_empty() {
        print_warning(&format!("No resources in {}", source.source_name()));
        return Ok(());
    }

    print_header(&format!("{} resources", names.len()));
    for name in &names {
        println!("  {}", name);
    }
    Ok(())
}

/// Generate a configuration file at the specified or default location
pub fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let output_path = match output {
        Some(path) => {
            fs::write(&path, Config::generate_default_config())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path
        }
        None => init_config()?,
    };

    info!("Configuration file: {}", output_path.display());
    info!("Edit this file to customize the albums directory and extraction settings.");
    Ok(())
}

/// Show the current configuration settings
pub fn show_config(config: &Config) {
    let config_path = Config::get_active_config_path();
    info!("Configuration file: {}", config_path.display());
    if !config_path.exists() {
        info!("(Using default settings - no config file found)");
    }
    info!("");
    info!("Current Configuration:");
    info!("----------------------");
    info!("[paths]");
    info!(
        "  user_data_dir = \"{}\"",
        config.paths.user_data_dir.display()
    );
    info!("  albums_folder = \"{}\"", config.paths.albums_folder);
    info!("  -> albums directory: {}", config.albums_dir().display());
    info!("");
    info!("[resources]");
    info!("  bundle_dir = \"{}\"", config.resources.bundle_dir.display());
    info!("  -> bundle directory: {}", config.bundle_dir().display());
    info!("");
    info!("[extraction]");
    info!("  buffer_size = {}", config.extraction.buffer_size);
    info!("  max_threads = {}", config.extraction.max_threads);
    info!("");
    info!("[logging]");
    info!("  level = \"{}\"", config.logging.level);
    info!("  log_to_file = {}", config.logging.log_to_file);
    info!("  log_file = \"{}\"", config.logging.log_file.display());
}

/// Write generated album files for trying the tool without real content
pub fn generate_bundle(output: &Path, count: usize, size: usize, seed: u64) -> Result<()> {
    let names = MockDataGenerator::new(seed)
        .write_bundle(output, count, size)
        .with_context(|| format!("Failed to write bundle to {}", output.display()))?;

    print_success(&format!(
        "Generated {} files in {}",
        names.len(),
        output.display()
    ));
    print_info(&format!(
        "Run 'embedded-chart --bundle {} run' to try it",
        output.display()
    ));
    Ok(())
}

fn write_catalog(loader: &CatalogLoader, path: &Path) -> Result<()> {
    loader
        .write_json(path)
        .with_context(|| format!("Failed to write catalog to {}", path.display()))?;
    print_info(&format!("Catalog written to {}", path.display()));
    Ok(())
}

fn print_extraction_summary(extracted: usize, found: usize, bytes: u64) {
    print_success(&format!(
        "Extracted {} of {} resources ({})",
        extracted,
        found,
        format_bytes(bytes)
    ));
}

fn report_cleanup(outcome: &CleanupOutcome) {
    match outcome {
        CleanupOutcome::Removed => print_success("Albums directory removed"),
        CleanupOutcome::NotPresent => print_info("Nothing to clean up"),
        CleanupOutcome::Failed(message) => {
            warn!("Cleanup failed: {}", message);
            print_warning(&format!("Cleanup failed: {}", message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.paths.user_data_dir = temp_dir.path().join("UserData");
        config.resources.bundle_dir = temp_dir.path().join("bundle");
        config
    }

    #[test]
    fn test_run_lifecycle_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        generate_bundle(&config.resources.bundle_dir, 4, 1024, 3).unwrap();
        let catalog = temp_dir.path().join("catalog.json");

        run_lifecycle(&config, false, Some(&catalog), Arc::new(AtomicBool::new(false))).unwrap();

        assert!(!config.albums_dir().exists());
        let json = fs::read_to_string(&catalog).unwrap();
        assert!(json.contains("album_000.mdm"));
        assert!(json.contains("pack_003.mdp"));
    }

    #[test]
    fn test_extract_then_load_then_clean() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        generate_bundle(&config.resources.bundle_dir, 3, 512, 1).unwrap();

        extract_only(&config).unwrap();
        assert_eq!(fs::read_dir(config.albums_dir()).unwrap().count(), 3);

        load_only(&config, None).unwrap();

        clean(&config);
        assert!(!config.albums_dir().exists());
    }

    #[test]
    fn test_run_lifecycle_reports_prepare_failure() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        generate_bundle(&config.resources.bundle_dir, 2, 256, 4).unwrap();
        fs::create_dir_all(config.user_data_dir()).unwrap();
        fs::write(config.albums_dir(), b"file in the way").unwrap();

        let result = run_lifecycle(&config, false, None, Arc::new(AtomicBool::new(false)));

        assert!(result.is_err());
        assert!(config.albums_dir().is_file());
        assert!(extract_only(&config).is_err());
    }

    #[test]
    fn test_list_missing_bundle_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        assert!(list_resources(&config).is_err());
    }

    #[test]
    fn test_generate_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("generated.toml");

        generate_config_file(Some(path.clone())).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.paths.albums_folder, "EmbeddedAlbums");
    }
}
