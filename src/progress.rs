//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive events
//! as the runner works through the input directory. The CLI uses this to print
//! one line per article and drive its progress bar; library callers can forward
//! the events anywhere without the runner knowing how.
//!
//! # Example
//!
//! ```rust
//! use litscreen::{BatchConfig, BatchProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: Arc<AtomicUsize>,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, file_name: &str, _index: usize, _total: usize, _len: usize, _api_error: bool) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("wrote analysis for {file_name}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     written: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = BatchConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch runner as it processes each input file.
///
/// Implementations must be `Send + Sync`. Done/error events arrive in sorted
/// file order for any concurrency; with `concurrency > 1`, `on_file_start` for
/// later files may arrive before earlier files finish. All methods have default
/// no-op implementations so callers only override what they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after the input directory has been listed.
    ///
    /// # Arguments
    /// * `total_files` — number of matching input files
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before a file's text is extracted.
    ///
    /// # Arguments
    /// * `file_name` — input file name (no directory)
    /// * `index`     — 1-indexed position in the sorted batch
    /// * `total`     — total files in the batch
    fn on_file_start(&self, file_name: &str, index: usize, total: usize) {
        let _ = (file_name, index, total);
    }

    /// Called after the analysis file has been written.
    ///
    /// # Arguments
    /// * `output_len` — byte length of the written analysis
    /// * `api_error`  — `true` when the written text is an absorbed
    ///   `Error in API response: …` payload
    fn on_file_complete(
        &self,
        file_name: &str,
        index: usize,
        total: usize,
        output_len: usize,
        api_error: bool,
    ) {
        let _ = (file_name, index, total, output_len, api_error);
    }

    /// Called when a file failed and no output was written.
    fn on_file_error(&self, file_name: &str, index: usize, total: usize, error: &str) {
        let _ = (file_name, index, total, error);
    }

    /// Called once after every file has been attempted.
    ///
    /// # Arguments
    /// * `total_files` — files in the batch
    /// * `written`     — files for which an output file was written
    fn on_batch_complete(&self, total_files: usize, written: usize) {
        let _ = (total_files, written);
    }
}

/// A no-op implementation for callers that don't need progress events.
#[derive(Debug)]
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
