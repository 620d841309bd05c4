//! Input discovery: list the input directory and pair each article with its
//! output path.
//!
//! Only names ending in `.pdf` (case-sensitive) are kept, sorted by name so
//! every run visits articles in the same order. Each output name is the
//! input name with the trailing `.pdf` swapped for `.txt`.

use crate::config::{INPUT_EXTENSION, OUTPUT_EXTENSION};
use crate::error::ScreenError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One article to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputFile {
    /// File name without directory, e.g. `smith2021.pdf`.
    pub file_name: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

/// `a.pdf` → `a.txt`. Returns `None` if `name` lacks the input extension.
pub fn output_file_name(name: &str) -> Option<String> {
    name.strip_suffix(INPUT_EXTENSION)
        .map(|stem| format!("{stem}{OUTPUT_EXTENSION}"))
}

/// Pick the matching names from a directory listing, sorted ascending.
pub fn select_inputs(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names.retain(|n| n.ends_with(INPUT_EXTENSION));
    names
}

/// List `input_dir` and build the sorted batch.
///
/// # Errors
/// [`ScreenError::InputDirFailed`] if the directory cannot be read. This
/// aborts the whole run.
pub async fn list_inputs(
    input_dir: &Path,
    output_dir: &Path,
) -> Result<Vec<InputFile>, ScreenError> {
    let dir_err = |source: std::io::Error| ScreenError::InputDirFailed {
        path: input_dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(input_dir).await.map_err(dir_err)?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(dir_err)? {
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!("Skipping non-UTF-8 file name: {:?}", raw),
        }
    }
    let total_entries = names.len();

    let files: Vec<InputFile> = select_inputs(names)
        .into_iter()
        .filter_map(|file_name| {
            let out_name = output_file_name(&file_name)?;
            Some(InputFile {
                input_path: input_dir.join(&file_name),
                output_path: output_dir.join(out_name),
                file_name,
            })
        })
        .collect();

    debug!(
        "{} of {} entries in {} match {}",
        files.len(),
        total_entries,
        input_dir.display(),
        INPUT_EXTENSION
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_swaps_extension() {
        assert_eq!(output_file_name("a.pdf").as_deref(), Some("a.txt"));
        assert_eq!(
            output_file_name("smith et al 2021.pdf").as_deref(),
            Some("smith et al 2021.txt")
        );
    }

    #[test]
    fn output_name_only_touches_suffix() {
        assert_eq!(output_file_name("a.pdf.pdf").as_deref(), Some("a.pdf.txt"));
        assert_eq!(
            output_file_name("my.pdf-notes.pdf").as_deref(),
            Some("my.pdf-notes.txt")
        );
    }

    #[test]
    fn output_name_rejects_other_extensions() {
        assert_eq!(output_file_name("a.PDF"), None);
        assert_eq!(output_file_name("a.docx"), None);
    }

    #[test]
    fn select_sorts_and_filters() {
        let names = vec![
            "c.pdf".to_string(),
            "notes.txt".to_string(),
            "B.pdf".to_string(),
            "a.pdf".to_string(),
            "upper.PDF".to_string(),
        ];
        assert_eq!(select_inputs(names), vec!["B.pdf", "a.pdf", "c.pdf"]);
    }

    #[tokio::test]
    async fn list_inputs_pairs_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("readme.md"), b"#").unwrap();
        let out = PathBuf::from("/tmp/out");

        let files = list_inputs(dir.path(), &out).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
        assert_eq!(files[0].input_path, dir.path().join("a.pdf"));
        assert_eq!(files[0].output_path, out.join("a.txt"));
    }

    #[tokio::test]
    async fn missing_input_dir_is_fatal() {
        let err = list_inputs(Path::new("/definitely/not/a/dir"), Path::new("out"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenError::InputDirFailed { .. }));
    }
}
