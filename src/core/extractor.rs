//! Resource extraction module
//!
//! Copies every resource of a [`ResourceSource`] into the target directory.
//! One task per resource runs on a rayon pool; `extract_all` returns once all
//! of them have finished. A resource that cannot be opened or written is
//! logged and counted, and never affects its siblings.
//!
//! # Example
//!
//! ```rust,no_run
//! use embedded_chart::core::directory::TargetDirectory;
//! use embedded_chart::core::extractor::{ExtractorConfig, ResourceExtractor};
//! use embedded_chart::resources::BundleResources;
//!
//! let target = TargetDirectory::new("./UserData/EmbeddedAlbums");
//! target.prepare().unwrap();
//!
//! let extractor = ResourceExtractor::new(target, ExtractorConfig::default());
//! let stats = extractor.extract_all(&BundleResources::new("./bundle"));
//! println!("{}", stats);
//! ```

use crate::core::config::{ExtractionConfig, DEFAULT_BUFFER_SIZE};
use crate::core::directory::TargetDirectory;
use crate::core::error::{panic_message, ChartError, Result};
use crate::resources::{is_valid_resource_name, ResourceSource};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

// =============================================================================
// Configuration
// =============================================================================

/// Progress report sent after each resource task finishes
#[derive(Debug, Clone)]
pub struct ExtractProgress {
    /// Tasks finished so far, including this one
    pub completed: usize,
    /// Total number of tasks
    pub total: usize,
    /// Resource that just finished
    pub resource: String,
    /// Whether it was written to disk
    pub extracted: bool,
}

/// Callback invoked from worker threads with progress updates
pub type ProgressCallback = Arc<dyn Fn(ExtractProgress) + Send + Sync>;

/// Configuration for the resource extractor
pub struct ExtractorConfig {
    /// Copy buffer size in bytes
    pub buffer_size: usize,
    /// Worker threads (0 = rayon's global pool)
    pub max_threads: usize,
    /// Callback for progress updates
    pub progress_callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("buffer_size", &self.buffer_size)
            .field("max_threads", &self.max_threads)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Clone for ExtractorConfig {
    fn clone(&self) -> Self {
        Self {
            buffer_size: self.buffer_size,
            max_threads: self.max_threads,
            progress_callback: self.progress_callback.clone(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_threads: 0,
            progress_callback: None,
        }
    }
}

impl From<&ExtractionConfig> for ExtractorConfig {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            buffer_size: config.buffer_size,
            max_threads: config.max_threads,
            progress_callback: None,
        }
    }
}

impl ExtractorConfig {
    /// Set the copy buffer size
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Set the number of worker threads
    pub fn max_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads;
        self
    }

    /// Set the progress callback
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ExtractProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// A resource that was not extracted, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFailure {
    /// Resource name
    pub name: String,
    /// Why it was skipped
    pub message: String,
}

/// Statistics about one extraction run
#[derive(Debug, Default, Clone)]
pub struct ExtractionStats {
    pub resources_found: usize,
    pub files_extracted: usize,
    pub streams_unavailable: usize,
    pub invalid_names: usize,
    pub duplicates_skipped: usize,
    pub errors: usize,
    pub total_bytes: u64,
    pub duration_ms: u64,
    /// Every resource that did not produce a file
    pub failures: Vec<ResourceFailure>,
}

impl ExtractionStats {
    /// Whether every resource was written
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.duplicates_skipped == 0
    }
}

impl std::fmt::Display for ExtractionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size_mb = self.total_bytes as f64 / 1_048_576.0;
        write!(
            f,
            "Resources: {}, Extracted: {}, Unavailable: {}, Invalid names: {}, Duplicates: {}, Errors: {}, Total size: {:.2} MB in {}ms",
            self.resources_found,
            self.files_extracted,
            self.streams_unavailable,
            self.invalid_names,
            self.duplicates_skipped,
            self.errors,
            size_mb,
            self.duration_ms
        )
    }
}

/// Result of one resource task
enum TaskOutcome {
    /// Written, with the number of bytes
    Extracted(u64),
    /// Skipped for the given reason
    Skipped(ChartError),
}

// =============================================================================
// Extractor
// =============================================================================

/// Concurrent resource extractor
#[derive(Debug, Clone)]
pub struct ResourceExtractor {
    target: TargetDirectory,
    config: ExtractorConfig,
}

impl ResourceExtractor {
    /// Create an extractor writing into `target`
    pub fn new(target: TargetDirectory, config: ExtractorConfig) -> Self {
        Self { target, config }
    }

    /// The directory files are written to
    pub fn target(&self) -> &TargetDirectory {
        &self.target
    }

    /// Extract every resource of `source` into the target directory
    ///
    /// Blocks until every task has finished. Never fails: enumeration errors
    /// and per-resource errors are logged and reflected in the returned stats.
    pub fn extract_all<S: ResourceSource + ?Sized>(&self, source: &S) -> ExtractionStats {
        let start_time = Instant::now();
        let mut stats = ExtractionStats::default();

        let names = match source.resource_names() {
            Ok(names) => names,
            Err(e) => {
                error!("Failed to enumerate {}: {}", source.source_name(), e);
                stats.errors += 1;
                return stats;
            }
        };

        if names.is_empty() {
            debug!("No resources in {}", source.source_name());
            return stats;
        }

        stats.resources_found = names.len();

        // Two resources with the same name would race on one destination file
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(names.len());
        for name in names {
            if seen.insert(name.clone()) {
                unique.push(name);
            } else {
                warn!("Duplicate resource name '{}', extracting it once", name);
                stats.duplicates_skipped += 1;
            }
        }

        let total = unique.len();
        info!(
            "Extracting {} resources from {} into {}",
            total,
            source.source_name(),
            self.target.path().display()
        );

        let completed = AtomicUsize::new(0);
        let run = || {
            unique
                .par_iter()
                .map(|name| {
                    let outcome = self.extract_one(source, name);
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(ref callback) = self.config.progress_callback {
                        callback(ExtractProgress {
                            completed: done,
                            total,
                            resource: name.clone(),
                            extracted: matches!(outcome, TaskOutcome::Extracted(_)),
                        });
                    }
                    (name, outcome)
                })
                .collect::<Vec<_>>()
        };

        let outcomes = match self.build_pool() {
            Some(pool) => pool.install(run),
            None => run(),
        };

        for (name, outcome) in outcomes {
            match outcome {
                TaskOutcome::Extracted(bytes) => {
                    stats.files_extracted += 1;
                    stats.total_bytes += bytes;
                }
                TaskOutcome::Skipped(err) => {
                    match err {
                        ChartError::ResourceStreamUnavailable(_) => stats.streams_unavailable += 1,
                        ChartError::InvalidResourceName(_) => stats.invalid_names += 1,
                        _ => stats.errors += 1,
                    }
                    stats.failures.push(ResourceFailure {
                        name: name.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        stats.duration_ms = start_time.elapsed().as_millis() as u64;
        info!("Extraction finished: {}", stats);
        stats
    }

    /// Dedicated pool when a thread limit is configured
    fn build_pool(&self) -> Option<rayon::ThreadPool> {
        if self.config.max_threads == 0 {
            return None;
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_threads)
            .thread_name(|i| format!("extract-{}", i))
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!("Failed to build extraction pool, using global pool: {}", e);
                None
            }
        }
    }

    /// Extract a single resource; all failures stay inside this call
    ///
    /// Panics raised by the source while opening or reading are caught here
    /// too, so they count against this resource only.
    fn extract_one<S: ResourceSource + ?Sized>(&self, source: &S, name: &str) -> TaskOutcome {
        if !is_valid_resource_name(name) {
            let err = ChartError::InvalidResourceName(name.to_string());
            warn!("{}", err);
            return TaskOutcome::Skipped(err);
        }

        let output_path = self.target.file_path(name);
        let mut file_opened = false;

        let result = catch_unwind(AssertUnwindSafe(|| {
            self.copy_resource(source, name, &output_path, &mut file_opened)
        }))
        .unwrap_or_else(|panic_payload| {
            Err(ChartError::ResourceWrite {
                name: name.to_string(),
                message: format!(
                    "resource stream panicked: {}",
                    panic_message(panic_payload.as_ref())
                ),
            })
        });

        match result {
            Ok(bytes) => {
                debug!("Extracted: {} ({} bytes)", output_path.display(), bytes);
                TaskOutcome::Extracted(bytes)
            }
            Err(err @ ChartError::ResourceStreamUnavailable(_)) => {
                warn!("{}", err);
                TaskOutcome::Skipped(err)
            }
            Err(err) => {
                error!("{}", err);
                if file_opened {
                    discard_partial_file(&output_path);
                }
                TaskOutcome::Skipped(err)
            }
        }
    }

    /// Open the stream and copy it to `output_path`
    ///
    /// `file_opened` is set once the destination has been created or
    /// truncated, so the caller knows whether anything on disk is ours.
    fn copy_resource<S: ResourceSource + ?Sized>(
        &self,
        source: &S,
        name: &str,
        output_path: &Path,
        file_opened: &mut bool,
    ) -> Result<u64> {
        let write_error = |e: io::Error| ChartError::ResourceWrite {
            name: name.to_string(),
            message: e.to_string(),
        };

        let mut stream = source
            .open_resource(name)
            .ok_or_else(|| ChartError::ResourceStreamUnavailable(name.to_string()))?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(output_path)
            .map_err(write_error)?;
        *file_opened = true;

        copy_stream(&mut stream, &mut file, self.config.buffer_size).map_err(write_error)
    }
}

/// Remove a destination file left incomplete by a failed copy
fn discard_partial_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed partial file: {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => error!(
            "Failed to remove partial file '{}', it will be left in place: {}",
            path.display(),
            e
        ),
    }
}

/// Copy `reader` into `file` with a buffer of `buffer_size` bytes
///
/// Returns the number of bytes written.
fn copy_stream(reader: &mut dyn Read, file: &mut File, buffer_size: usize) -> io::Result<u64> {
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut total = 0u64;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        file.write_all(&buffer[..read])?;
        total += read as u64;
    }

    file.flush()?;
    Ok(total)
}
