//! # litscreen
//!
//! Screen a folder of PDF articles for a systematic literature review with an
//! LLM: one structured analysis per article, written as a `.txt` file.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ./PDFs/*.pdf   (sorted by name)
//!  │
//!  ├─ 1. Discover  list input dir, keep *.pdf, derive ./Texts/*.txt
//!  ├─ 2. Extract   concatenate page text via pdfium (spawn_blocking)
//!  ├─ 3. Analyze   framing + article text + review instructions → one LLM call
//!  └─ 4. Write     response (or "Error in API response: …") → .txt, atomically
//! ```
//!
//! A file that cannot be read is reported and skipped; the batch always runs
//! to the end. An LLM failure is not skipped: its error text becomes the
//! file's analysis, and the report marks it as [`FileStatus::ApiError`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use litscreen::{run_batch, BatchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / …
//!     let config = BatchConfig::builder()
//!         .input_dir("./PDFs")
//!         .output_dir("./Texts")
//!         .build()?;
//!     let report = run_batch(&config).await?;
//!     eprintln!("{} analysed, {} failed", report.analyzed(), report.failed());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `litscreen` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! litscreen = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! Text extraction needs the PDFium shared library at runtime. It is looked up
//! at [`BatchConfig::pdfium_lib_path`], then `PDFIUM_LIB_PATH`, then the
//! system library path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{list_batch, run_batch, run_batch_sync, BatchRunner};
pub use config::{BatchConfig, BatchConfigBuilder, DEFAULT_MODEL};
pub use error::{FileError, ScreenError};
pub use output::{BatchReport, FileReport, FileStatus};
pub use pipeline::analyze::{
    AnalysisClient, AnalysisOutcome, CompletionBackend, LlmBackend, API_ERROR_PREFIX,
};
pub use pipeline::discover::InputFile;
pub use pipeline::extract::{PdfiumExtractor, TextExtractor, NO_TEXT_PLACEHOLDER};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
