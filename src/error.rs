//! Error types for the litscreen library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ScreenError`] — **Fatal**: the batch cannot proceed at all (output
//!   directory cannot be created, input directory cannot be listed, no LLM
//!   provider configured). Returned as `Err(ScreenError)` from
//!   [`crate::batch::run_batch`] and [`crate::batch::BatchRunner::run`].
//!
//! * [`FileError`] — **Non-fatal**: a single article could not be read or
//!   its analysis could not be written. Stored inside
//!   [`crate::output::FileReport`]; the batch moves on to the next file.
//!
//! Remote-analysis failures are neither: they are absorbed by
//! [`crate::pipeline::analyze::AnalysisClient`] and written to the output file
//! as `Error in API response: …` text.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the litscreen library.
///
/// Per-file failures use [`FileError`] and are stored in
/// [`crate::output::FileReport`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ScreenError {
    // ── Directory errors ──────────────────────────────────────────────────
    /// The output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input directory could not be listed.
    #[error("Failed to read input directory '{path}': {source}\nCheck the path exists and is readable.")]
    InputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single input file.
///
/// No output file is written for a file that fails this way.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// Input file vanished or cannot be opened.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure while reading the file.
    #[error("Could not read '{path}': {detail}")]
    ReadFailed { path: PathBuf, detail: String },

    /// The file carries a `.pdf` name but has no `%PDF` header near its start.
    #[error("File is not a valid PDF: '{path}' (first bytes: {magic:?})")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// PDFium could not parse the document.
    #[error("PDF '{path}' could not be parsed: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// Text extraction failed for one page.
    #[error("Text extraction failed for page {page} of '{path}': {detail}")]
    PageText {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    /// Could not bind to a PDFium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or pass --pdfium-lib."
    )]
    PdfiumBindingFailed(String),

    /// Could not write the analysis file.
    #[error("Failed to write output file '{path}': {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },

    /// The extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    TaskFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_not_configured_display() {
        let e = ScreenError::ProviderNotConfigured {
            provider: "openai".into(),
            hint: "Set OPENAI_API_KEY".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("openai"), "got: {msg}");
        assert!(msg.contains("OPENAI_API_KEY"), "got: {msg}");
    }

    #[test]
    fn input_dir_display_keeps_source() {
        let e = ScreenError::InputDirFailed {
            path: PathBuf::from("./PDFs"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        };
        let msg = e.to_string();
        assert!(msg.contains("./PDFs"));
        assert!(msg.contains("no such directory"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = FileError::NotAPdf {
            path: PathBuf::from("notes.pdf"),
            magic: *b"PK\x03\x04",
        };
        assert!(e.to_string().contains("notes.pdf"));
    }

    #[test]
    fn page_text_display() {
        let e = FileError::PageText {
            path: PathBuf::from("a.pdf"),
            page: 3,
            detail: "bad stream".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"));
        assert!(msg.contains("bad stream"));
    }

    #[test]
    fn file_error_serialises() {
        let e = FileError::PdfiumBindingFailed("libpdfium.so missing".into());
        let json = serde_json::to_string(&e).expect("serialise");
        assert!(json.contains("libpdfium.so missing"));
    }
}
