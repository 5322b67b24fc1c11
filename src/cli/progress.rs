//! Progress bar utilities for CLI output
//!
//! Key features:
//! - An extraction progress bar fed from the extractor's progress callback
//! - Consistent visual styling and console helpers
//! - A dual writer for logging to stderr and a file at once

use crate::core::extractor::ExtractProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

// ============================================================================
// Styles - Consistent visual appearance
// ============================================================================

/// Get the progress bar style for extraction operations
fn progress_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  {spinner:.green} [{bar:40.cyan/dim}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━╾─")
}

/// Get the style for completed progress bars
fn completed_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  ✓ [{bar:40.green/dim}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━━")
}

// ============================================================================
// Console output helpers
// ============================================================================

/// Print a header section with a box
pub fn print_header(title: &str) {
    let width = 60;
    let title_padded = format!("{:^width$}", title, width = width - 2);
    println!();
    println!("╔{}╗", "═".repeat(width - 2));
    println!("║{}║", title_padded);
    println!("╚{}╝", "═".repeat(width - 2));
    println!();
}

/// Print a success message with checkmark
pub fn print_success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print an info message with bullet
pub fn print_info(msg: &str) {
    println!("  • {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("  ⚠ {}", msg);
}

// ============================================================================
// Extraction progress
// ============================================================================

/// Progress bar for one extraction run
pub struct ExtractionProgress {
    progress_bar: ProgressBar,
    start_time: Instant,
    skipped: AtomicUsize,
}

impl ExtractionProgress {
    /// Create a progress bar; the length is set by the first update
    pub fn new() -> Self {
        let progress_bar = ProgressBar::new(0);
        progress_bar.set_style(progress_bar_style());
        progress_bar.enable_steady_tick(Duration::from_millis(100));
        progress_bar.set_message("Starting...");

        Self {
            progress_bar,
            start_time: Instant::now(),
            skipped: AtomicUsize::new(0),
        }
    }

    /// Apply an update from the extractor's progress callback
    pub fn update(&self, progress: &ExtractProgress) {
        self.progress_bar.set_length(progress.total as u64);
        self.progress_bar.set_position(progress.completed as u64);

        if progress.extracted {
            self.progress_bar.set_message(progress.resource.clone());
        } else {
            self.skipped.fetch_add(1, Ordering::Relaxed);
            self.progress_bar.suspend(|| {
                println!("  ⚠ Skipped {}", progress.resource);
            });
        }
    }

    /// Finish the progress display
    pub fn finish(&self, total_bytes: u64) {
        self.progress_bar.set_style(completed_style());
        let skipped = self.skipped.load(Ordering::Relaxed);
        let message = if skipped > 0 {
            format!(
                "Complete ({} in {:.1}s, {} skipped)",
                format_bytes(total_bytes),
                self.start_time.elapsed().as_secs_f64(),
                skipped
            )
        } else {
            format!(
                "Complete ({} in {:.1}s)",
                format_bytes(total_bytes),
                self.start_time.elapsed().as_secs_f64()
            )
        };
        self.progress_bar.finish_with_message(message);
    }

    /// Stop the progress display after a failure
    pub fn finish_with_error(&self, msg: &str) {
        self.progress_bar.abandon_with_message(format!("✗ {}", msg));
    }

    /// Whether the display has been stopped
    pub fn is_finished(&self) -> bool {
        self.progress_bar.is_finished()
    }
}

impl Default for ExtractionProgress {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Utility functions
// ============================================================================

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

// ============================================================================
// Dual writer for file + console logging
// ============================================================================

/// A writer that writes to both console and file
///
/// Used for logging to both stderr and a log file simultaneously.
pub struct DualWriter {
    pub console: std::io::Stderr,
    pub file: std::fs::File,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let _ = self.console.write(buf);
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = self.console.flush();
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 bytes");
        assert_eq!(format_bytes(81920), "80.0 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
    }

    #[test]
    fn test_progress_counts_skipped() {
        let progress = ExtractionProgress::new();
        progress.update(&ExtractProgress {
            completed: 1,
            total: 2,
            resource: "a.mdm".to_string(),
            extracted: true,
        });
        progress.update(&ExtractProgress {
            completed: 2,
            total: 2,
            resource: "b.mdm".to_string(),
            extracted: false,
        });

        assert_eq!(progress.skipped.load(Ordering::Relaxed), 1);
        progress.finish(10);
        assert!(progress.is_finished());
    }

    #[test]
    fn test_finish_with_error_stops_display() {
        let progress = ExtractionProgress::new();
        assert!(!progress.is_finished());
        progress.finish_with_error("Failed to prepare the albums directory");
        assert!(progress.is_finished());
    }
}
