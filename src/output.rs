//! Result types describing what a batch run did.

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome for one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// The model's analysis was written.
    Analyzed,
    /// The LLM call failed; the `Error in API response: …` text was written.
    ApiError { detail: String },
    /// Extraction or writing failed; no output file exists for this input.
    Failed { error: FileError },
}

/// Per-file entry in a [`BatchReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Input file name (no directory).
    pub file_name: String,
    /// Path of the analysis file, derived by extension substitution.
    pub output_path: PathBuf,
    pub status: FileStatus,
    /// Characters of extracted article text (0 if extraction failed).
    pub text_len: usize,
    /// Bytes written to `output_path` (0 if nothing was written).
    pub output_len: usize,
    pub duration_ms: u64,
}

impl FileReport {
    /// Whether an output file was written for this input.
    pub fn is_written(&self) -> bool {
        !matches!(self.status, FileStatus::Failed { .. })
    }
}

/// Summary of a batch run, in sorted file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub total_duration_ms: u64,
}

impl BatchReport {
    /// Inputs whose analysis was written successfully.
    pub fn analyzed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Analyzed))
    }

    /// Inputs whose output holds an absorbed API error.
    pub fn api_errors(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::ApiError { .. }))
    }

    /// Inputs with no output file.
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    /// Inputs with an output file, whatever its content.
    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.is_written()).count()
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}
