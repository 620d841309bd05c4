//! CLI binary for litscreen.
//!
//! A thin shim over the library crate that maps CLI flags to `BatchConfig`
//! and prints one line per article.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use litscreen::{
    list_batch, run_batch, BatchConfig, BatchProgressCallback, ProgressCallback, DEFAULT_MODEL,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Per-file console notices ─────────────────────────────────────────────────

/// Prints `Successfully processed: …` / `Error processing …: …` to stdout,
/// one line per article, optionally above a progress bar.
struct CliProgressCallback {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl CliProgressCallback {
    fn new(show_bar: bool, quiet: bool) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} {prefix:.bold}  \
                     [{bar:42.green/238}] {pos:>3}/{len} articles  \
                     ⏱ {elapsed_precise}  {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  ")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            bar.set_prefix("Screening");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Arc::new(Self { bar, quiet })
    }

    fn print(&self, line: String) {
        match self.bar {
            Some(ref bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_length(total_files as u64);
        }
    }

    fn on_file_start(&self, file_name: &str, _index: usize, _total: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_message(file_name.to_string());
        }
    }

    fn on_file_complete(
        &self,
        file_name: &str,
        _index: usize,
        _total: usize,
        _output_len: usize,
        api_error: bool,
    ) {
        if !self.quiet {
            // An absorbed API error still produced an output file.
            let mark = if api_error { yellow("⚠") } else { green("✓") };
            self.print(format!("{mark} Successfully processed: {file_name}"));
        }
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_file_error(&self, file_name: &str, _index: usize, _total: usize, error: &str) {
        self.print(format!("{} Error processing {file_name}: {}", red("✗"), error));
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_batch_complete(&self, _total_files: usize, _written: usize) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Screen ./PDFs into ./Texts with gpt-4-1106-preview
  litscreen

  # Other folders and a larger response budget
  litscreen --input-dir articles --output-dir screening --max-tokens 8000

  # Custom review instructions (replaces the built-in block)
  litscreen --instructions protocol.txt

  # See what would be processed (no API key needed)
  litscreen --list-only

  # Machine-readable run report
  litscreen --json > report.json

OUTPUT:
  One <name>.txt per <name>.pdf. If the LLM call fails, the file holds
  "Error in API response: <details>" instead of an analysis. Files that
  cannot be read get no output and an "Error processing" line. The exit
  code is 0 whenever the batch runs to the end.

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to libpdfium (otherwise the system library path)
"#;

/// Screen PDF articles for a systematic literature review with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "litscreen",
    version,
    about = "Screen PDF articles for a systematic literature review with an LLM",
    long_about = "Extracts the text of every PDF in a folder, sends it to an LLM together \
with the review context, research question and screening instructions, and writes the \
analysis to a .txt file per article.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder containing the PDF articles.
    #[arg(long, env = "LITSCREEN_INPUT_DIR", default_value = "./PDFs")]
    input_dir: PathBuf,

    /// Folder for the analyses (created if missing).
    #[arg(long, env = "LITSCREEN_OUTPUT_DIR", default_value = "./Texts")]
    output_dir: PathBuf,

    /// LLM model ID. `--model` beats `EDGEQUAKE_MODEL`, which beats the default;
    /// the chosen model is used whichever provider is selected.
    #[arg(long, env = "EDGEQUAKE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(
        long,
        env = "LITSCREEN_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set."
    )]
    provider: Option<String>,

    /// Max LLM output tokens per article.
    #[arg(long, env = "LITSCREEN_MAX_TOKENS", default_value_t = 4000,
          value_parser = clap::value_parser!(u64).range(1..))]
    max_tokens: u64,

    /// Articles processed at once (1 = strictly sequential).
    #[arg(short, long, env = "LITSCREEN_CONCURRENCY", default_value_t = 1,
          value_parser = clap::value_parser!(u64).range(1..=64))]
    concurrency: u64,

    /// Per-article LLM call timeout in seconds (default: none).
    #[arg(long, env = "LITSCREEN_API_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    api_timeout: Option<u64>,

    /// Text file replacing the built-in analysis instructions.
    #[arg(long, env = "LITSCREEN_INSTRUCTIONS")]
    instructions: Option<PathBuf>,

    /// Path to the PDFium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// List matched articles and their output paths, then exit.
    #[arg(long)]
    list_only: bool,

    /// Print the run report as JSON instead of per-article lines.
    #[arg(long, env = "LITSCREEN_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "LITSCREEN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LITSCREEN_VERBOSE")]
    verbose: bool,

    /// Only report failures.
    #[arg(short, long, env = "LITSCREEN_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The per-article lines carry the run's story; library INFO logs would
    // only duplicate them, so they are shown with --verbose alone.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.list_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if cli.json {
        None
    } else {
        let cb = CliProgressCallback::new(show_progress, cli.quiet);
        Some(cb as Arc<dyn BatchProgressCallback>)
    };

    let config = build_config(&cli, progress_cb).await?;

    // ── List-only mode ───────────────────────────────────────────────────
    if cli.list_only {
        let files = list_batch(&config).await.context("Failed to list input directory")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&files).context("Failed to serialise file list")?
            );
        } else {
            for f in &files {
                println!("{}  →  {}", f.file_name, f.output_path.display());
            }
            eprintln!("{} articles", files.len());
        }
        return Ok(());
    }

    // ── Run batch ────────────────────────────────────────────────────────
    let report = run_batch(&config).await.context("Screening failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else if !cli.quiet {
        let total = report.files.len();
        let mark = if report.failed() == 0 && report.api_errors() == 0 {
            green("✔")
        } else {
            yellow("⚠")
        };
        eprintln!(
            "{mark} {}/{} articles analysed  {}  →  {}",
            report.analyzed(),
            total,
            dim(&format!("{}ms", report.total_duration_ms)),
            bold(&config.output_dir.display().to_string()),
        );
        if report.api_errors() > 0 {
            eprintln!("   {} outputs contain an API error", yellow(&report.api_errors().to_string()));
        }
        if report.failed() > 0 {
            eprintln!("   {} articles could not be processed", red(&report.failed().to_string()));
        }
    }

    Ok(())
}

/// Map CLI args to `BatchConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BatchConfig> {
    let mut builder = BatchConfig::builder()
        .input_dir(&cli.input_dir)
        .output_dir(&cli.output_dir)
        .model(&cli.model)
        .max_tokens(cli.max_tokens as usize)
        .concurrency(cli.concurrency as usize);

    if let Some(ref name) = cli.provider {
        builder = builder.provider_name(name);
    }
    if let Some(secs) = cli.api_timeout {
        builder = builder.api_timeout_secs(secs);
    }
    if let Some(ref path) = cli.instructions {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read instructions from {:?}", path))?;
        builder = builder.instructions(text);
    }
    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(path);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_reproduce_fixed_setup() {
        let cli = Cli::try_parse_from(["litscreen"]).unwrap();
        assert_eq!(cli.input_dir, PathBuf::from("./PDFs"));
        assert_eq!(cli.output_dir, PathBuf::from("./Texts"));
        assert_eq!(cli.max_tokens, 4000);
        assert_eq!(cli.concurrency, 1);
        assert!(cli.api_timeout.is_none());
    }

    #[test]
    fn zero_concurrency_rejected_by_parser() {
        assert!(Cli::try_parse_from(["litscreen", "--concurrency", "0"]).is_err());
    }

    #[tokio::test]
    async fn build_config_maps_flags() {
        let cli = Cli::try_parse_from([
            "litscreen",
            "--input-dir",
            "in",
            "--output-dir",
            "out",
            "--max-tokens",
            "1250",
            "--provider",
            "anthropic",
            "--api-timeout",
            "90",
        ])
        .unwrap();
        let config = build_config(&cli, None).await.unwrap();
        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.max_tokens, 1250);
        assert_eq!(config.provider_name.as_deref(), Some("anthropic"));
        assert_eq!(config.api_timeout_secs, Some(90));
    }
}
