//! Host lifecycle
//!
//! `EmbeddedChart` ties the phases together behind the three hooks a host
//! calls: initialize, late initialize and quit.
//!
//! ```text
//! Uninitialized -> DirectoryPrepared -> ResourcesExtracted -> AlbumsLoaded -> CleanedUp
//! ```
//!
//! Extraction runs on a background thread started by `on_initialize`. It
//! reports back over a one-shot channel, and `on_late_initialize` blocks on
//! that channel before scanning the directory, so loading never observes a
//! half-written file.
//!
//! # Example
//!
//! ```rust,no_run
//! use embedded_chart::album::CatalogLoader;
//! use embedded_chart::core::lifecycle::EmbeddedChart;
//! use embedded_chart::resources::BundleResources;
//!
//! let mut chart = EmbeddedChart::new(
//!     "./UserData/EmbeddedAlbums",
//!     BundleResources::new("./bundle"),
//!     CatalogLoader::new(),
//! );
//!
//! if let Err(e) = chart.on_initialize() {
//!     eprintln!("Failed to initialize: {}", e);
//! }
//! chart.on_late_initialize();
//! // ... host runs ...
//! chart.on_application_quit();
//! ```

use crate::album::AlbumLoader;
use crate::core::config::Config;
use crate::core::directory::{CleanupOutcome, TargetDirectory};
use crate::core::error::Result;
use crate::core::extractor::{ExtractionStats, ExtractorConfig, ResourceExtractor};
use crate::core::loader::{DirectoryLoader, LoadStats};
use crate::resources::ResourceSource;
use crossbeam_channel::Receiver;
use log::{debug, error, info, warn};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Where the lifecycle currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Nothing has happened yet, or directory preparation failed
    Uninitialized,
    /// The target directory exists; extraction may still be running
    DirectoryPrepared,
    /// Every extraction task has finished
    ResourcesExtracted,
    /// The directory has been handed to the album loader
    AlbumsLoaded,
    /// The target directory has been removed (terminal)
    CleanedUp,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::DirectoryPrepared => "directory prepared",
            LifecycleState::ResourcesExtracted => "resources extracted",
            LifecycleState::AlbumsLoaded => "albums loaded",
            LifecycleState::CleanedUp => "cleaned up",
        };
        write!(f, "{}", name)
    }
}

/// Extraction running in the background
struct PendingExtraction {
    done: Receiver<ExtractionStats>,
    handle: Option<JoinHandle<()>>,
}

/// Lifecycle driver for extracting, loading and cleaning up bundled albums
pub struct EmbeddedChart<S, L> {
    target: TargetDirectory,
    source: Arc<S>,
    loader: L,
    extractor_config: ExtractorConfig,
    state: LifecycleState,
    pending: Option<PendingExtraction>,
    extraction_stats: Option<ExtractionStats>,
    load_stats: Option<LoadStats>,
}

impl<S, L> EmbeddedChart<S, L>
where
    S: ResourceSource + 'static,
    L: AlbumLoader,
{
    /// Create a lifecycle that extracts into `albums_dir`
    pub fn new<P: AsRef<Path>>(albums_dir: P, source: S, loader: L) -> Self {
        Self {
            target: TargetDirectory::new(albums_dir),
            source: Arc::new(source),
            loader,
            extractor_config: ExtractorConfig::default(),
            state: LifecycleState::Uninitialized,
            pending: None,
            extraction_stats: None,
            load_stats: None,
        }
    }

    /// Create a lifecycle using the albums directory and extraction settings from `config`
    pub fn from_config(config: &Config, source: S, loader: L) -> Self {
        Self::new(config.albums_dir(), source, loader)
            .with_extractor_config(ExtractorConfig::from(&config.extraction))
    }

    /// Replace the extractor settings
    pub fn with_extractor_config(mut self, config: ExtractorConfig) -> Self {
        self.extractor_config = config;
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn target(&self) -> &TargetDirectory {
        &self.target
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Stats of the finished extraction, if it has been collected
    pub fn extraction_stats(&self) -> Option<&ExtractionStats> {
        self.extraction_stats.as_ref()
    }

    /// Stats of the last load pass
    pub fn load_stats(&self) -> Option<&LoadStats> {
        self.load_stats.as_ref()
    }

    /// Prepare the directory and start extracting in the background
    ///
    /// Returns the preparation error, in which case extraction never starts
    /// and the state stays `Uninitialized`. The host decides whether that is
    /// fatal.
    pub fn on_initialize(&mut self) -> Result<()> {
        if self.state != LifecycleState::Uninitialized {
            warn!("Initialize called in state '{}', ignoring", self.state);
            return Ok(());
        }

        self.target.prepare()?;
        self.state = LifecycleState::DirectoryPrepared;

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        let extractor = self.extractor();
        let source = Arc::clone(&self.source);

        let spawned = thread::Builder::new()
            .name("resource-extraction".to_string())
            .spawn(move || {
                let stats = extractor.extract_all(source.as_ref());
                // Receiver may be gone if the lifecycle was dropped
                let _ = done_tx.send(stats);
            });

        match spawned {
            Ok(handle) => {
                debug!("Extraction started in background");
                self.pending = Some(PendingExtraction {
                    done: done_rx,
                    handle: Some(handle),
                });
            }
            Err(e) => {
                warn!("Failed to spawn extraction thread, extracting inline: {}", e);
                let stats = self.extractor().extract_all(self.source.as_ref());
                self.finish_extraction(stats);
            }
        }

        Ok(())
    }

    /// Prepare the directory and extract, blocking until extraction is done
    pub fn initialize_blocking(&mut self) -> Result<&ExtractionStats> {
        if self.state == LifecycleState::Uninitialized {
            self.target.prepare()?;
            self.state = LifecycleState::DirectoryPrepared;
            let stats = self.extractor().extract_all(self.source.as_ref());
            self.finish_extraction(stats);
        } else {
            self.wait_for_extraction();
        }

        Ok(self.extraction_stats.get_or_insert_with(ExtractionStats::default))
    }

    /// Block until the background extraction has finished
    ///
    /// Returns the extraction stats, or `None` if extraction never ran.
    pub fn wait_for_extraction(&mut self) -> Option<&ExtractionStats> {
        if let Some(mut pending) = self.pending.take() {
            match pending.done.recv() {
                Ok(stats) => self.finish_extraction(stats),
                Err(_) => error!("Extraction worker exited without reporting results"),
            }

            if let Some(handle) = pending.handle.take() {
                if handle.join().is_err() {
                    error!("Extraction worker panicked");
                }
            }
        }

        self.extraction_stats.as_ref()
    }

    /// Wait for extraction to finish, then load every album in the directory
    pub fn on_late_initialize(&mut self) -> LoadStats {
        match self.state {
            LifecycleState::Uninitialized => {
                warn!("Albums directory was never prepared, skipping album loading");
                return LoadStats::default();
            }
            LifecycleState::AlbumsLoaded | LifecycleState::CleanedUp => {
                warn!("Late initialize called in state '{}', ignoring", self.state);
                return self.load_stats.clone().unwrap_or_default();
            }
            LifecycleState::DirectoryPrepared | LifecycleState::ResourcesExtracted => {}
        }

        self.wait_for_extraction();

        let stats = DirectoryLoader::new(self.target.clone()).load_all(&self.loader);
        self.state = LifecycleState::AlbumsLoaded;
        self.load_stats = Some(stats.clone());
        stats
    }

    /// Remove the albums directory
    ///
    /// Waits for a still-running extraction first so no worker is writing into
    /// the directory while it is deleted. Always ends in `CleanedUp`.
    pub fn on_application_quit(&mut self) -> CleanupOutcome {
        self.wait_for_extraction();
        let outcome = self.target.clean();
        self.state = LifecycleState::CleanedUp;
        outcome
    }

    fn extractor(&self) -> ResourceExtractor {
        ResourceExtractor::new(self.target.clone(), self.extractor_config.clone())
    }

    fn finish_extraction(&mut self, stats: ExtractionStats) {
        info!(
            "Extracted {} of {} resources",
            stats.files_extracted, stats.resources_found
        );
        self.extraction_stats = Some(stats);
        if self.state == LifecycleState::DirectoryPrepared {
            self.state = LifecycleState::ResourcesExtracted;
        }
    }
}

impl<S, L> fmt::Debug for EmbeddedChart<S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedChart")
            .field("target", &self.target)
            .field("state", &self.state)
            .field("extraction_pending", &self.pending.is_some())
            .finish()
    }
}
