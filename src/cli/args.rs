//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Extract bundled albums into the user data directory, load them, and clean up on exit
#[derive(Parser, Debug)]
#[command(name = "embedded-chart")]
#[command(author = "AshtonMemer")]
#[command(version = "1.0.0")]
#[command(about = "Extract, load and clean up bundled album files", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Bundle directory containing the resources to extract (overrides config)
    #[arg(short, long, global = true)]
    pub bundle: Option<PathBuf>,

    /// User data directory the albums folder is created in (overrides config)
    #[arg(short, long, global = true)]
    pub user_data_dir: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full lifecycle: extract, load, then clean up (default)
    Run {
        /// Keep the extracted albums until Ctrl+C is pressed
        #[arg(long)]
        hold: bool,

        /// Write the catalog of loaded albums as JSON
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },

    /// Prepare the albums directory and extract resources, without cleanup
    Extract,

    /// Load the albums already present in the albums directory
    Load {
        /// Write the catalog of loaded albums as JSON
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },

    /// Remove the albums directory
    Clean,

    /// List the resources in the bundle
    List,

    /// Show current configuration
    ShowConfig,

    /// Generate a configuration file at a specific location
    GenerateConfig {
        /// Output path for the config file (defaults to standard location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a bundle directory of generated album files for testing
    GenerateBundle {
        /// Output directory for the generated files
        #[arg(short, long, default_value = "./test_bundle")]
        output: PathBuf,

        /// Number of files to generate
        #[arg(long, default_value = "20")]
        count: usize,

        /// Maximum file size in bytes
        #[arg(long, default_value = "262144")]
        size: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let args = Args::try_parse_from(["embedded-chart"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.bundle.is_none());
    }

    #[test]
    fn test_run_with_global_overrides() {
        let args = Args::try_parse_from([
            "embedded-chart",
            "run",
            "--hold",
            "--bundle",
            "./bundle",
            "--user-data-dir",
            "/tmp/ud",
        ])
        .unwrap();

        assert!(matches!(
            args.command,
            Some(Commands::Run { hold: true, catalog: None })
        ));
        assert_eq!(args.bundle, Some(PathBuf::from("./bundle")));
        assert_eq!(args.user_data_dir, Some(PathBuf::from("/tmp/ud")));
    }

    #[test]
    fn test_generate_bundle_defaults() {
        let args = Args::try_parse_from(["embedded-chart", "generate-bundle"]).unwrap();
        match args.command {
            Some(Commands::GenerateBundle {
                output,
                count,
                size,
                seed,
            }) => {
                assert_eq!(output, PathBuf::from("./test_bundle"));
                assert_eq!(count, 20);
                assert_eq!(size, 262144);
                assert_eq!(seed, 42);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
