//! CLI binary for wanderlens.
//!
//! A thin shim over the library crate: maps flags to an `ItineraryRequest`,
//! `GenerationConfig` and `ExportOptions`, drives an `ItineraryGenerator`
//! and shows its notifications in the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wanderlens::generate::write_markdown;
use wanderlens::{
    build_prompt, normalize, ExportOptions, GeminiClient, GenerationConfig,
    ItineraryGenerator, ItineraryRequest, Lifestyle, Notifier, PdfiumWriter, StyleSheet, ToastId,
};

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Terminal notifier ────────────────────────────────────────────────────────

/// Loading toasts become spinners; success and error toasts become one
/// coloured line each on stderr.
struct TerminalNotifier {
    quiet: bool,
    next_id: Mutex<u64>,
    spinners: Mutex<HashMap<ToastId, ProgressBar>>,
}

impl TerminalNotifier {
    fn new(quiet: bool) -> Self {
        Self {
            quiet,
            next_id: Mutex::new(0),
            spinners: Mutex::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> ToastId {
        let mut id = self.next_id.lock().unwrap_or_else(|p| p.into_inner());
        *id += 1;
        ToastId(*id)
    }

    /// Print above any live spinner so lines don't interleave with it.
    fn print_line(&self, line: String) {
        let spinners = self.spinners.lock().unwrap_or_else(|p| p.into_inner());
        match spinners.values().next() {
            Some(bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn loading(&self, message: &str) -> ToastId {
        let id = self.next_id();
        if self.quiet {
            return id;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        self.spinners
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(id, bar);
        id
    }

    fn success(&self, message: &str) -> ToastId {
        if !self.quiet {
            self.print_line(format!("{} {}", green("✓"), message));
        }
        self.next_id()
    }

    fn error(&self, message: &str) -> ToastId {
        self.print_line(format!("{} {}", red("✗"), red(message)));
        self.next_id()
    }

    fn dismiss(&self, id: ToastId) {
        let bar = self
            .spinners
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&id);
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Print the itinerary as Markdown
  wanderlens --destination "Tokyo, Japan" --budget "¥150,000" --lifestyle budget --duration "5 days"

  # Save Markdown and a PDF (travel-itinerary.pdf in the current directory)
  wanderlens -d "Lisbon" -b "€800" -l backpacker -t "3 days" -o lisbon.md --pdf

  # Styled HTML page, vector PDF into ./out
  wanderlens -d "Cusco" -b "$1,200" -l comfort -t "1 week" --html cusco.html --pdf-dir out --vector-pdf

  # Inspect the prompt without calling the API
  wanderlens -d "Oslo" -b "NOK 20,000" -l luxury -t "4 days" --print-prompt

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (required)
  WANDERLENS_DESTINATION  Default for --destination (also _BUDGET, _LIFESTYLE, _DURATION)
  WANDERLENS_MODEL        Default for --model
  PDFIUM_LIB_PATH         Path to libpdfium for PDF export
  RUST_LOG                Log filter (overrides --verbose / --quiet)
"#;

/// Generate day-by-day travel itineraries with Google Gemini.
#[derive(Parser, Debug)]
#[command(
    name = "wanderlens",
    version,
    about = "Generate day-by-day travel itineraries with Google Gemini",
    long_about = "Generate a personalised day-by-day travel itinerary for a destination, budget, \
lifestyle and trip length. Prints Markdown, and can save styled HTML and a PDF copy.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Where to travel (e.g. "Tokyo, Japan").
    #[arg(short, long, env = "WANDERLENS_DESTINATION")]
    destination: String,

    /// Budget in the destination's currency (e.g. "¥150,000").
    #[arg(short, long, env = "WANDERLENS_BUDGET")]
    budget: String,

    /// Travel style.
    #[arg(short, long, env = "WANDERLENS_LIFESTYLE", value_enum)]
    lifestyle: LifestyleArg,

    /// Trip length (e.g. "5 days").
    #[arg(short = 't', long, env = "WANDERLENS_DURATION")]
    duration: String,

    /// Gemini model ID.
    #[arg(long, env = "WANDERLENS_MODEL", default_value = wanderlens::config::DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,

    /// Top-k sampling.
    #[arg(long, default_value_t = 40)]
    top_k: u32,

    /// Top-p (nucleus) sampling (0.0–1.0).
    #[arg(long, default_value_t = 0.95)]
    top_p: f32,

    /// Max output tokens for the itinerary.
    #[arg(long, default_value_t = 2048)]
    max_output_tokens: u32,

    /// Send no safety settings (use the service defaults).
    #[arg(long)]
    no_safety: bool,

    /// Request timeout in seconds (default: none).
    #[arg(long, env = "WANDERLENS_TIMEOUT")]
    timeout: Option<u64>,

    /// Write the itinerary Markdown to this file instead of stdout.
    #[arg(short, long, conflicts_with = "json")]
    output: Option<PathBuf>,

    /// Print a plain-text view instead of Markdown.
    #[arg(long, conflicts_with = "json")]
    plain: bool,

    /// Also write a styled, standalone HTML page.
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Export a PDF into the current directory.
    #[arg(long)]
    pdf: bool,

    /// Export a PDF into this directory.
    #[arg(long, value_name = "DIR")]
    pdf_dir: Option<PathBuf>,

    /// PDF file name.
    #[arg(long, default_value = wanderlens::config::DEFAULT_PDF_FILENAME)]
    pdf_filename: String,

    /// Keep PDF pages as vector text instead of captured JPEG images.
    #[arg(long)]
    vector_pdf: bool,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Output structured JSON (GenerationOutput) instead of Markdown.
    #[arg(long)]
    json: bool,

    /// Print the prompt and exit without calling the API.
    #[arg(long)]
    print_prompt: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors and the itinerary itself.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LifestyleArg {
    Luxury,
    Comfort,
    Budget,
    Backpacker,
}

impl From<LifestyleArg> for Lifestyle {
    fn from(v: LifestyleArg) -> Self {
        match v {
            LifestyleArg::Luxury => Lifestyle::Luxury,
            LifestyleArg::Comfort => Lifestyle::Comfort,
            LifestyleArg::Budget => Lifestyle::Budget,
            LifestyleArg::Backpacker => Lifestyle::Backpacker,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Spinners carry the interactive feedback; keep library logs at warn
    // unless asked.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
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

    let request = ItineraryRequest::new(
        &cli.destination,
        &cli.budget,
        cli.lifestyle.into(),
        &cli.duration,
    )
    .context("Invalid request")?;

    if cli.print_prompt {
        println!("{}", build_prompt(&request));
        return Ok(());
    }

    let config = build_config(&cli)?;
    let notifier = Arc::new(TerminalNotifier::new(cli.quiet));
    let mut generator =
        ItineraryGenerator::new(Arc::new(GeminiClient::new()), config, notifier.clone());

    // ── Generate ─────────────────────────────────────────────────────────
    let spinner = notifier.loading(&format!(
        "Planning {} in {} ({})…",
        request.duration(),
        request.destination(),
        request.lifestyle()
    ));
    let submitted = generator.submit(request).await;
    notifier.dismiss(spinner);
    submitted.context("Itinerary generation failed")?;

    let Some(region) = generator.display() else {
        anyhow::bail!("The model returned an empty itinerary");
    };

    // ── Itinerary output ─────────────────────────────────────────────────
    if cli.json {
        let output = generator
            .last_output()
            .context("No generation output recorded")?;
        let json = serde_json::to_string_pretty(output).context("Failed to serialise output")?;
        println!("{json}");
    } else if let Some(ref path) = cli.output {
        write_markdown(path, generator.itinerary())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !cli.quiet {
            eprintln!("{} Markdown  →  {}", green("✔"), bold(&path.display().to_string()));
        }
    } else {
        let text = if cli.plain {
            region.plain_text()
        } else {
            normalize(generator.itinerary())
        };
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
        if !text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if let Some(ref path) = cli.html {
        let html = region.to_html_document(&StyleSheet::default());
        tokio::fs::write(path, html)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !cli.quiet {
            eprintln!("{} HTML      →  {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    // ── PDF export ───────────────────────────────────────────────────────
    if cli.pdf || cli.pdf_dir.is_some() {
        let out_dir = cli.pdf_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let mut options = ExportOptions::builder().filename(&cli.pdf_filename);
        if cli.vector_pdf {
            options = options.vector();
        }
        let options = options.build().context("Invalid PDF options")?;

        let writer = match cli.pdfium_lib {
            Some(ref lib) => PdfiumWriter::with_library(lib),
            None => PdfiumWriter::new(),
        };
        let report = generator
            .export_pdf(&out_dir, &options, Arc::new(writer))
            .await
            .context("PDF export failed")?;
        if !cli.quiet {
            eprintln!(
                "{} PDF       →  {}  {}",
                green("✔"),
                bold(&report.path.display().to_string()),
                dim(&format!("{} pages, {} bytes", report.pages, report.bytes)),
            );
        }
    }

    // ── Summary ──────────────────────────────────────────────────────────
    if !cli.quiet && !cli.json {
        if let Some(output) = generator.last_output() {
            eprintln!(
                "   {} tokens in  /  {} tokens out  —  {}ms  ({})",
                dim(&output.stats.prompt_tokens.to_string()),
                dim(&output.stats.output_tokens.to_string()),
                output.stats.duration_ms,
                output.stats.model,
            );
        }
    }

    Ok(())
}

/// Map CLI args to `GenerationConfig`.
fn build_config(cli: &Cli) -> Result<GenerationConfig> {
    let mut builder = GenerationConfig::builder()
        .model(&cli.model)
        .temperature(cli.temperature)
        .top_k(cli.top_k)
        .top_p(cli.top_p)
        .max_output_tokens(cli.max_output_tokens);
    if cli.no_safety {
        builder = builder.without_safety_settings();
    }
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_map_to_config() {
        let cli = Cli::parse_from([
            "wanderlens",
            "-d",
            "Tokyo, Japan",
            "-b",
            "¥150,000",
            "-l",
            "budget",
            "-t",
            "5 days",
            "--temperature",
            "5.0",
            "--no-safety",
            "--timeout",
            "30",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.temperature, 2.0);
        assert!(config.safety_settings.is_empty());
        assert_eq!(config.request_timeout_secs, Some(30));
        assert!(matches!(cli.lifestyle, LifestyleArg::Budget));
    }

    #[test]
    fn output_file_conflicts_with_json() {
        let err = Cli::try_parse_from([
            "wanderlens", "-d", "Tokyo", "-b", "¥1", "-l", "budget", "-t", "1 day", "-o",
            "trip.md", "--json",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
