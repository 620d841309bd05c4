//! Text extraction: PDF file → concatenated page text.
//!
//! Extraction is fail-fast: a missing, unreadable or unparsable file is an
//! `Err(FileError)` for the caller to record, never a silent empty string.
//! A document that parses but yields no text at all becomes
//! [`NO_TEXT_PLACEHOLDER`] and is still sent for analysis.
//!
//! PDFium is a blocking C library, so [`extract_text`] moves the work onto
//! the blocking pool with `spawn_blocking`. Each call binds a fresh `Pdfium`
//! handle; the OS caches the `dlopen`, so repeat binds are cheap.

use crate::error::FileError;
use pdfium_render::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Returned when every page yields no text, including zero-page documents.
pub const NO_TEXT_PLACEHOLDER: &str = "No text extracted.";

/// Anything that can turn a document on disk into plain text.
///
/// The runner only depends on this trait, so tests can swap PDFium out.
/// Implementations are called from the blocking thread pool.
pub trait TextExtractor: Send + Sync + 'static {
    /// Return the concatenated text of every page, or
    /// [`NO_TEXT_PLACEHOLDER`] when there is none.
    fn extract(&self, path: &Path) -> Result<String, FileError>;
}

/// Join per-page text in page order with no separator.
///
/// Empty pages are skipped. Whitespace-only pages are kept as-is.
pub fn join_page_texts<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for page in pages {
        text.push_str(page.as_ref());
    }
    if text.is_empty() {
        NO_TEXT_PLACEHOLDER.to_string()
    } else {
        text
    }
}

/// Run `extractor` on the blocking pool.
pub async fn extract_text<E: TextExtractor>(
    extractor: Arc<E>,
    path: PathBuf,
) -> Result<String, FileError> {
    tokio::task::spawn_blocking(move || extractor.extract(&path))
        .await
        .map_err(|e| FileError::TaskFailed(e.to_string()))?
}

/// How far into the file the `%PDF` header may start. Readers tolerate
/// junk (mail headers, BOMs, HTTP preambles) ahead of it within this window.
pub const HEADER_SEARCH_WINDOW: usize = 1024;

/// Check that `path` can be read and carries a `%PDF` header within the
/// first [`HEADER_SEARCH_WINDOW`] bytes.
pub fn validate_pdf(path: &Path) -> Result<(), FileError> {
    let io_err = |e: std::io::Error| match e.kind() {
        std::io::ErrorKind::NotFound => FileError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => FileError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => FileError::ReadFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        },
    };

    let file = std::fs::File::open(path).map_err(io_err)?;
    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    file.take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)
        .map_err(io_err)?;

    if head.windows(4).any(|w| w == b"%PDF") {
        return Ok(());
    }
    let mut magic = [0u8; 4];
    let n = head.len().min(4);
    magic[..n].copy_from_slice(&head[..n]);
    Err(FileError::NotAPdf {
        path: path.to_path_buf(),
        magic,
    })
}

/// [`TextExtractor`] backed by Google PDFium through `pdfium-render`.
#[derive(Debug, Clone, Default)]
pub struct PdfiumExtractor {
    lib_path: Option<PathBuf>,
}

impl PdfiumExtractor {
    /// Library discovery order:
    /// 1. `lib_path` (path to the shared library file)
    /// 2. `PDFIUM_LIB_PATH` env var
    /// 3. System library search paths
    pub fn new(lib_path: Option<PathBuf>) -> Self {
        Self { lib_path }
    }

    fn bind(&self) -> Result<Pdfium, FileError> {
        let explicit = self
            .lib_path
            .clone()
            .or_else(|| std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from));

        let bindings = match explicit {
            Some(path) => {
                let lib = path.to_string_lossy().to_string();
                debug!(path = %lib, "Loading PDFium from explicit path");
                Pdfium::bind_to_library(&lib)
                    .map_err(|e| FileError::PdfiumBindingFailed(format!("{lib}: {e:?}")))?
            }
            None => Pdfium::bind_to_system_library()
                .map_err(|e| FileError::PdfiumBindingFailed(format!("{:?}", e)))?,
        };
        Ok(Pdfium::new(bindings))
    }
}

impl TextExtractor for PdfiumExtractor {
    fn extract(&self, path: &Path) -> Result<String, FileError> {
        validate_pdf(path)?;
        let pdfium = self.bind()?;

        let document =
            pdfium
                .load_pdf_from_file(path, None)
                .map_err(|e| FileError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: format!("{:?}", e),
                })?;

        let mut page_texts = Vec::new();
        for (idx, page) in document.pages().iter().enumerate() {
            let text = page.text().map_err(|e| FileError::PageText {
                path: path.to_path_buf(),
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;
            page_texts.push(text.all());
        }

        debug!(
            "Extracted {} pages from {}",
            page_texts.len(),
            path.display()
        );
        Ok(join_page_texts(page_texts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn pages_concatenate_without_separator() {
        assert_eq!(join_page_texts(["Hello", "World"]), "HelloWorld");
    }

    #[test]
    fn empty_pages_are_skipped() {
        assert_eq!(join_page_texts(["", "Intro", "", "Methods"]), "IntroMethods");
    }

    #[test]
    fn no_text_yields_placeholder() {
        assert_eq!(join_page_texts(["", ""]), NO_TEXT_PLACEHOLDER);
        assert_eq!(join_page_texts(Vec::<String>::new()), "No text extracted.");
    }

    #[test]
    fn whitespace_page_counts_as_text() {
        assert_eq!(join_page_texts(["", " "]), " ");
    }

    #[test]
    fn validate_rejects_non_pdf() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"PK\x03\x04 zip archive").unwrap();
        let err = validate_pdf(f.path()).unwrap_err();
        assert!(matches!(err, FileError::NotAPdf { magic, .. } if &magic == b"PK\x03\x04"));
    }

    #[test]
    fn validate_accepts_pdf_magic() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7\n").unwrap();
        assert!(validate_pdf(f.path()).is_ok());
    }

    #[test]
    fn validate_missing_file() {
        let err = validate_pdf(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, FileError::FileNotFound { .. }));
    }

    #[test]
    fn validate_accepts_header_after_preamble() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"\xEF\xBB\xBFContent-Type: application/pdf\r\n\r\n%PDF-1.4\n")
            .unwrap();
        assert!(validate_pdf(f.path()).is_ok());
    }

    #[test]
    fn validate_rejects_header_past_window() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&vec![b' '; HEADER_SEARCH_WINDOW]).unwrap();
        f.write_all(b"%PDF-1.4\n").unwrap();
        let err = validate_pdf(f.path()).unwrap_err();
        assert!(matches!(err, FileError::NotAPdf { magic, .. } if &magic == b"    "));
    }

    #[test]
    fn validate_rejects_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let err = validate_pdf(f.path()).unwrap_err();
        assert!(matches!(err, FileError::NotAPdf { magic, .. } if magic == [0u8; 4]));
    }

    #[test]
    fn validate_directory_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_pdf(dir.path()).unwrap_err();
        assert!(matches!(err, FileError::ReadFailed { .. }), "got {err:?}");
    }

    #[test]
    fn pdfium_extractor_fails_fast_on_non_pdf() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"not a pdf at all").unwrap();
        let err = PdfiumExtractor::default().extract(f.path()).unwrap_err();
        assert!(matches!(err, FileError::NotAPdf { .. }));
    }

    struct FixedExtractor;

    impl TextExtractor for FixedExtractor {
        fn extract(&self, _path: &Path) -> Result<String, FileError> {
            Ok(join_page_texts(["a", "b"]))
        }
    }

    #[tokio::test]
    async fn extract_text_runs_on_blocking_pool() {
        let text = extract_text(Arc::new(FixedExtractor), PathBuf::from("x.pdf"))
            .await
            .unwrap();
        assert_eq!(text, "ab");
    }
}
