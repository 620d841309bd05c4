//! LLM interaction: assemble the screening prompt and call the provider.
//!
//! The client is intentionally thin. Prompt text lives in [`crate::prompts`];
//! provider selection lives in [`resolve_provider`]. What this module owns is
//! the failure contract: a failed call never becomes an `Err`. It comes back
//! as [`AnalysisOutcome::Failed`], whose text form (`Error in API response: …`)
//! is written to the output file like any other analysis.
//!
//! One request per article, one attempt, no streaming. The whole prompt is a
//! single system message, so the provider sees no other conversation turns.

use crate::config::BatchConfig;
use crate::error::ScreenError;
use crate::prompts::build_prompt;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Prefix of the text written when the LLM call fails.
pub const API_ERROR_PREFIX: &str = "Error in API response: ";

/// A remote text-completion service.
///
/// Takes the full prompt and an output-token cap and returns the first
/// completion's text, or a human-readable failure description.
pub trait CompletionBackend: Send + Sync + 'static {
    fn complete(
        &self,
        prompt: &str,
        max_tokens: usize,
    ) -> impl Future<Output = Result<String, String>> + Send;
}

/// [`CompletionBackend`] over any edgequake-llm provider.
#[derive(Clone)]
pub struct LlmBackend {
    provider: Arc<dyn LLMProvider>,
}

impl LlmBackend {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self { provider }
    }
}

impl std::fmt::Debug for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmBackend")
            .field("provider", &"<dyn LLMProvider>")
            .finish()
    }
}

impl CompletionBackend for LlmBackend {
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String, String> {
        let messages = vec![ChatMessage::system(prompt)];
        let options = CompletionOptions {
            max_tokens: Some(max_tokens),
            ..Default::default()
        };

        match self.provider.chat(&messages, Some(&options)).await {
            Ok(response) => {
                debug!(
                    "{} input tokens, {} output tokens",
                    response.prompt_tokens, response.completion_tokens
                );
                Ok(response.content)
            }
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Result of analysing one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// The model's response text, unmodified.
    Completed(String),
    /// The call failed; holds the failure detail.
    Failed(String),
}

impl AnalysisOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, AnalysisOutcome::Failed(_))
    }

    /// The text to persist: the response, or `Error in API response: {detail}`.
    pub fn into_text(self) -> String {
        match self {
            AnalysisOutcome::Completed(text) => text,
            AnalysisOutcome::Failed(detail) => format!("{API_ERROR_PREFIX}{detail}"),
        }
    }
}

/// Sends one article's text through the screening prompt.
#[derive(Debug)]
pub struct AnalysisClient<B> {
    backend: B,
    instructions: String,
    max_tokens: usize,
    timeout: Option<Duration>,
}

impl<B: CompletionBackend> AnalysisClient<B> {
    /// Client with the default instructions and no timeout.
    pub fn new(backend: B, max_tokens: usize) -> Self {
        Self {
            backend,
            instructions: crate::prompts::DEFAULT_INSTRUCTIONS.to_string(),
            max_tokens,
            timeout: None,
        }
    }

    /// Client configured from the batch's token limit, instructions and timeout.
    pub fn from_config(backend: B, config: &BatchConfig) -> Self {
        let client = Self::new(backend, config.max_tokens).with_instructions(config.instructions());
        match config.api_timeout_secs {
            Some(secs) => client.with_timeout(Duration::from_secs(secs)),
            None => client,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// The exact message that [`Self::analyze`] sends for `text`.
    pub fn build_prompt(&self, text: &str) -> String {
        build_prompt(text, &self.instructions)
    }

    /// Analyse `text`. Never fails: errors come back as [`AnalysisOutcome::Failed`].
    pub async fn analyze(&self, text: &str) -> AnalysisOutcome {
        let start = Instant::now();
        let prompt = self.build_prompt(text);
        debug!("Prompt assembled: {} bytes", prompt.len());

        let call = self.backend.complete(&prompt, self.max_tokens);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(r) => r,
                Err(_) => Err(format!("timed out after {}s", limit.as_secs_f64())),
            },
            None => call.await,
        };

        match result {
            Ok(content) => {
                debug!("Analysis received in {:?}", start.elapsed());
                AnalysisOutcome::Completed(content)
            }
            Err(detail) => {
                warn!("LLM call failed after {:?}: {}", start.elapsed(), detail);
                AnalysisOutcome::Failed(detail)
            }
        }
    }
}

/// Instantiate a named provider with the given model.
fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, ScreenError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        ScreenError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is.
/// 2. **Named provider** (`config.provider_name`) with `config.model`; the
///    factory reads the matching API key (`OPENAI_API_KEY`, …) from the
///    environment.
/// 3. **`EDGEQUAKE_LLM_PROVIDER`** with `config.model`. `EDGEQUAKE_MODEL`
///    only seeds `--model` in the CLI; it never overrides `config.model`.
/// 4. **OpenAI** when `OPENAI_API_KEY` is set, with `config.model`
///    (`gpt-4-1106-preview` unless overridden).
/// 5. **Full auto-detection** via `ProviderFactory::from_env`.
///
/// Credentials never pass through the config: they stay wherever the
/// provider factory looks for them.
pub fn resolve_provider(config: &BatchConfig) -> Result<Arc<dyn LLMProvider>, ScreenError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some((name, model)) = explicit_provider(config, |key| std::env::var(key).ok()) {
        return create_provider(&name, &model);
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| ScreenError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or pass --provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

/// Steps 2–4 of [`resolve_provider`]: the `(provider, model)` pair to build,
/// or `None` to fall through to auto-detection.
fn explicit_provider(
    config: &BatchConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Option<(String, String)> {
    let set = |key: &str| env(key).filter(|v| !v.is_empty());

    if let Some(ref name) = config.provider_name {
        return Some((name.clone(), config.model.clone()));
    }
    if let Some(name) = set("EDGEQUAKE_LLM_PROVIDER") {
        return Some((name, config.model.clone()));
    }
    if set("OPENAI_API_KEY").is_some() {
        return Some(("openai".to_string(), config.model.clone()));
    }
    None
}
