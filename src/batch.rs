//! Batch entry points: screen every article in a directory.
//!
//! For each matching input, in sorted order: extract text, analyse it, write
//! the analysis next to its siblings in the output directory. A failure on one
//! article is recorded and the batch moves on; only failing to create the
//! output directory or to list the input directory aborts the run.
//!
//! With the default `concurrency = 1` articles are handled strictly one after
//! another. Higher values overlap independent articles. Results and the
//! per-file done/error notices still follow sorted order; only
//! `on_file_start` may run ahead of earlier files finishing.

use crate::config::BatchConfig;
use crate::error::{FileError, ScreenError};
use crate::output::{BatchReport, FileReport, FileStatus};
use crate::pipeline::analyze::{
    resolve_provider, AnalysisClient, AnalysisOutcome, CompletionBackend, LlmBackend,
};
use crate::pipeline::discover::{list_inputs, InputFile};
use crate::pipeline::extract::{extract_text, PdfiumExtractor, TextExtractor};
use crate::progress::ProgressCallback;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Screen every `.pdf` in `config.input_dir` with the configured LLM.
///
/// This is the primary entry point for the library. It binds PDFium for
/// extraction and resolves the provider via
/// [`crate::pipeline::analyze::resolve_provider`].
///
/// # Returns
/// `Ok(BatchReport)` once every file has been attempted, even if some failed
/// (check `report.failed()` and `report.api_errors()`).
///
/// # Errors
/// Returns `Err(ScreenError)` only for fatal errors:
/// - No LLM provider configured
/// - Output directory cannot be created
/// - Input directory cannot be listed
pub async fn run_batch(config: &BatchConfig) -> Result<BatchReport, ScreenError> {
    let provider = resolve_provider(config)?;
    let client = AnalysisClient::from_config(LlmBackend::new(provider), config);
    let extractor = PdfiumExtractor::new(config.pdfium_lib_path.clone());
    BatchRunner::new(config, extractor, client).run().await
}

/// Synchronous wrapper around [`run_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_batch_sync(config: &BatchConfig) -> Result<BatchReport, ScreenError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ScreenError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(run_batch(config))
}

/// List the articles a run would process, without extracting or calling
/// the LLM. Needs no API key.
pub async fn list_batch(config: &BatchConfig) -> Result<Vec<InputFile>, ScreenError> {
    list_inputs(&config.input_dir, &config.output_dir).await
}

/// Drives one batch with a given extractor and completion backend.
pub struct BatchRunner<E, B> {
    input_dir: PathBuf,
    output_dir: PathBuf,
    concurrency: usize,
    progress: Option<ProgressCallback>,
    extractor: Arc<E>,
    client: AnalysisClient<B>,
}

impl<E: TextExtractor, B: CompletionBackend> BatchRunner<E, B> {
    pub fn new(config: &BatchConfig, extractor: E, client: AnalysisClient<B>) -> Self {
        Self {
            input_dir: config.input_dir.clone(),
            output_dir: config.output_dir.clone(),
            concurrency: config.concurrency.max(1),
            progress: config.progress_callback.clone(),
            extractor: Arc::new(extractor),
            client,
        }
    }

    /// Run the batch to completion.
    pub async fn run(&self) -> Result<BatchReport, ScreenError> {
        let start = Instant::now();
        info!(
            "Screening {} → {}",
            self.input_dir.display(),
            self.output_dir.display()
        );

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| ScreenError::OutputDirFailed {
                path: self.output_dir.clone(),
                source: e,
            })?;

        let files = list_inputs(&self.input_dir, &self.output_dir).await?;
        let total = files.len();
        info!("{} articles to screen", total);

        if let Some(ref cb) = self.progress {
            cb.on_batch_start(total);
        }

        // `buffered` yields in input order, so notices fired here follow the
        // sorted batch even when later files finish first.
        let reports: Vec<FileReport> = stream::iter(
            files
                .iter()
                .enumerate()
                .map(|(i, file)| self.process_file(file, i + 1, total)),
        )
        .buffered(self.concurrency)
        .enumerate()
        .map(|(i, report)| {
            self.notify_file_done(&report, i + 1, total);
            report
        })
        .collect()
        .await;

        let report = BatchReport {
            files: reports,
            total_duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Batch complete: {} analysed, {} API errors, {} failed, {}ms",
            report.analyzed(),
            report.api_errors(),
            report.failed(),
            report.total_duration_ms
        );

        if let Some(ref cb) = self.progress {
            cb.on_batch_complete(total, report.written());
        }

        Ok(report)
    }

    /// Extract, analyse and write one article. Never fails the batch.
    async fn process_file(&self, file: &InputFile, index: usize, total: usize) -> FileReport {
        let start = Instant::now();
        if let Some(ref cb) = self.progress {
            cb.on_file_start(&file.file_name, index, total);
        }

        let text = match extract_text(Arc::clone(&self.extractor), file.input_path.clone()).await {
            Ok(text) => text,
            Err(e) => return failed_report(file, e, 0, start),
        };
        let text_len = text.chars().count();
        debug!("{}: {} chars extracted", file.file_name, text_len);

        let outcome = self.client.analyze(&text).await;
        let status = match &outcome {
            AnalysisOutcome::Completed(_) => FileStatus::Analyzed,
            AnalysisOutcome::Failed(detail) => FileStatus::ApiError {
                detail: detail.clone(),
            },
        };
        let content = outcome.into_text();

        if let Err(e) = write_output(&file.output_path, &content).await {
            return failed_report(file, e, text_len, start);
        }

        FileReport {
            file_name: file.file_name.clone(),
            output_path: file.output_path.clone(),
            status,
            text_len,
            output_len: content.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn notify_file_done(&self, report: &FileReport, index: usize, total: usize) {
        match &report.status {
            FileStatus::Failed { error } => {
                warn!("Error processing {}: {}", report.file_name, error);
                if let Some(ref cb) = self.progress {
                    cb.on_file_error(&report.file_name, index, total, &error.to_string());
                }
            }
            status => {
                let api_error = matches!(status, FileStatus::ApiError { .. });
                if api_error {
                    warn!(
                        "{}: API error written to {}",
                        report.file_name,
                        report.output_path.display()
                    );
                } else {
                    info!("Successfully processed: {}", report.file_name);
                }
                if let Some(ref cb) = self.progress {
                    cb.on_file_complete(&report.file_name, index, total, report.output_len, api_error);
                }
            }
        }
    }
}

fn failed_report(file: &InputFile, error: FileError, text_len: usize, start: Instant) -> FileReport {
    FileReport {
        file_name: file.file_name.clone(),
        output_path: file.output_path.clone(),
        status: FileStatus::Failed { error },
        text_len,
        output_len: 0,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Write `content` as UTF-8, replacing any existing file.
///
/// Writes to `<name>.tmp` first and renames, so an interrupted run never
/// leaves a truncated analysis behind.
async fn write_output(path: &Path, content: &str) -> Result<(), FileError> {
    let write_err = |e: std::io::Error| FileError::OutputWriteFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    };

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, content.as_bytes())
        .await
        .map_err(write_err)?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_output_overwrites_and_cleans_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "old analysis").unwrap();

        write_output(&path, "ny analys – ünïcödé ✓").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ny analys – ünïcödé ✓");
        assert!(!dir.path().join("a.txt.tmp").exists());
    }

    #[tokio::test]
    async fn write_output_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("a.txt");
        let err = write_output(&path, "x").await.unwrap_err();
        assert!(matches!(err, FileError::OutputWriteFailed { .. }));
    }

    #[tokio::test]
    async fn list_batch_needs_no_provider() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("z.pdf"), b"%PDF").unwrap();
        let config = BatchConfig::builder()
            .input_dir(dir.path())
            .output_dir(dir.path().join("out"))
            .build()
            .unwrap();
        let files = list_batch(&config).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].output_path, dir.path().join("out").join("z.txt"));
        // Listing alone does not create the output directory.
        assert!(!dir.path().join("out").exists());
    }
}
