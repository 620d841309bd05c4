//! Configuration types for a screening batch.
//!
//! All run behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. The config is read once at startup and never
//! mutated afterwards; the runner and the analysis client each take what they
//! need from it at construction time instead of consulting global state.
//!
//! The defaults reproduce the fixed setup the tool has always used:
//! articles in `./PDFs`, analyses in `./Texts`, 4000 output tokens,
//! `gpt-4-1106-preview`, one file at a time.

use crate::error::ScreenError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Model used when neither the config nor `EDGEQUAKE_MODEL` names one.
pub const DEFAULT_MODEL: &str = "gpt-4-1106-preview";

/// Extension of the input documents. Matching is case-sensitive.
pub const INPUT_EXTENSION: &str = ".pdf";

/// Extension of the written analyses.
pub const OUTPUT_EXTENSION: &str = ".txt";

/// Configuration for a screening batch.
///
/// Built via [`BatchConfig::builder()`] or using [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use litscreen::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .input_dir("articles")
///     .output_dir("screening")
///     .max_tokens(2000)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Directory holding the articles. Default: `./PDFs`.
    pub input_dir: PathBuf,

    /// Directory receiving one `.txt` analysis per article. Default: `./Texts`.
    ///
    /// Created (with parents) before any file is processed.
    pub output_dir: PathBuf,

    /// LLM model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, the provider is auto-detected.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Maximum tokens the model may generate per article. Default: 4000.
    ///
    /// Only the response is bounded. The prompt carries the full article text
    /// and is never cut down to fit the model's context window.
    pub max_tokens: usize,

    /// Number of articles in flight at once. Default: 1 (strictly sequential).
    ///
    /// Reports and the per-file done/error notices stay in sorted file order
    /// for any value; `on_file_start` fires as each article is picked up.
    pub concurrency: usize,

    /// Client-side timeout per LLM call in seconds. Default: None.
    ///
    /// An elapsed timeout is handled like any other API failure: the error
    /// text is written as the article's analysis.
    pub api_timeout_secs: Option<u64>,

    /// Replacement for the built-in analysis instructions. If None, uses
    /// [`crate::prompts::DEFAULT_INSTRUCTIONS`].
    pub instructions: Option<String>,

    /// Explicit path to the PDFium shared library. If None, falls back to
    /// `PDFIUM_LIB_PATH` and then the system library search path.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Per-file progress events. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./PDFs"),
            output_dir: PathBuf::from("./Texts"),
            model: DEFAULT_MODEL.to_string(),
            provider_name: None,
            provider: None,
            max_tokens: 4000,
            concurrency: 1,
            api_timeout_secs: None,
            instructions: None,
            pdfium_lib_path: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("max_tokens", &self.max_tokens)
            .field("concurrency", &self.concurrency)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("instructions", &self.instructions.as_ref().map(|s| s.len()))
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }

    /// The instruction block to append after the article text.
    pub fn instructions(&self) -> &str {
        self.instructions
            .as_deref()
            .unwrap_or(crate::prompts::DEFAULT_INSTRUCTIONS)
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = Some(secs);
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.config.instructions = Some(instructions.into());
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, ScreenError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(ScreenError::InvalidConfig("Concurrency must be ≥ 1".into()));
        }
        if c.max_tokens == 0 {
            return Err(ScreenError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.model.trim().is_empty() {
            return Err(ScreenError::InvalidConfig("Model must not be empty".into()));
        }
        if c.api_timeout_secs == Some(0) {
            return Err(ScreenError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_setup() {
        let c = BatchConfig::default();
        assert_eq!(c.input_dir, PathBuf::from("./PDFs"));
        assert_eq!(c.output_dir, PathBuf::from("./Texts"));
        assert_eq!(c.model, "gpt-4-1106-preview");
        assert_eq!(c.max_tokens, 4000);
        assert_eq!(c.concurrency, 1);
        assert!(c.api_timeout_secs.is_none());
        assert_eq!(c.instructions(), crate::prompts::DEFAULT_INSTRUCTIONS);
    }

    #[test]
    fn builder_sets_fields() {
        let c = BatchConfig::builder()
            .input_dir("in")
            .output_dir("out")
            .model("gpt-4.1")
            .provider_name("openai")
            .max_tokens(1250)
            .concurrency(4)
            .api_timeout_secs(30)
            .instructions("Summarise.")
            .build()
            .expect("valid config");
        assert_eq!(c.input_dir, PathBuf::from("in"));
        assert_eq!(c.output_dir, PathBuf::from("out"));
        assert_eq!(c.model, "gpt-4.1");
        assert_eq!(c.provider_name.as_deref(), Some("openai"));
        assert_eq!(c.max_tokens, 1250);
        assert_eq!(c.concurrency, 4);
        assert_eq!(c.api_timeout_secs, Some(30));
        assert_eq!(c.instructions(), "Summarise.");
    }

    #[test]
    fn zero_concurrency_rejected() {
        let err = BatchConfig::builder().concurrency(0).build().unwrap_err();
        assert!(matches!(err, ScreenError::InvalidConfig(_)));
    }

    #[test]
    fn zero_max_tokens_rejected() {
        assert!(BatchConfig::builder().max_tokens(0).build().is_err());
    }

    #[test]
    fn empty_model_rejected() {
        assert!(BatchConfig::builder().model("  ").build().is_err());
    }

    #[test]
    fn debug_hides_instruction_text() {
        let c = BatchConfig::builder()
            .instructions("secret review protocol")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("secret review protocol"));
    }
}
