//! CLI parsing and orchestration for `url2epub`: fetch -> extract -> package. Maps errors to exit codes.

use crate::config::{self, Config, ConfigError};
use crate::epub::{write_epub, EpubError, Package};
use crate::extract::extract;
use crate::fetch::{fetch_page, parse_page_url, FetchError, HttpClient};
use crate::model::{Document, ExtractionMode};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Epub(#[from] EpubError),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) | CliRunError::Config(_) => 1,
            CliRunError::Fetch(_) => 2,
            CliRunError::Epub(_) => 3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "url2epub")]
#[command(about = "Fetch a web page and save its readable text as an EPUB")]
#[command(
    after_help = "Example: url2epub https://example.com mybook.epub\n\nConfig file keys (output_dir, user_agent, timeout_secs, mode) are read from ./url2epub.toml or ~/.config/url2epub/config.toml. CLI flags override config."
)]
pub struct Args {
    /// Page URL (http or https).
    pub url: String,

    /// Output path. Default: ./{title}.epub with the title cut to 50 characters.
    pub output: Option<PathBuf>,

    /// Output path (same as the second positional argument).
    #[arg(short = 'o', long = "output", value_name = "PATH", conflicts_with = "output")]
    pub output_flag: Option<PathBuf>,

    /// Extraction mode: auto, structured, or flattened.
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<ExtractionMode>,

    /// HTTP User-Agent (overrides config).
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds (overrides config; default 30).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Fetch and extract, print the summary and output path without writing.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output (summary and errors only).
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug logging and the full error chain.
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    fn explicit_output(&self) -> Option<&Path> {
        self.output.as_deref().or(self.output_flag.as_deref())
    }
}

fn parse_mode(s: &str) -> Result<ExtractionMode, String> {
    match s.to_lowercase().as_str() {
        "auto" => Ok(ExtractionMode::Auto),
        "structured" | "paragraphs" => Ok(ExtractionMode::Structured),
        "flattened" | "flat" => Ok(ExtractionMode::Flattened),
        _ => Err(format!(
            "Invalid --mode value: '{}'. Use auto, structured, or flattened.",
            s
        )),
    }
}

/// Explicit path if given, otherwise `{output_dir}/{default file name}`.
fn resolve_output_path(explicit: Option<&Path>, output_dir: &Path, doc: &Document) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => output_dir.join(doc.default_file_name()),
    }
}

/// Ensure output path parent exists.
fn validate_output_path(path: &Path) -> Result<(), CliRunError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(CliRunError::InvalidInput(format!(
                "Cannot write output: {}: parent directory does not exist.",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Progress lines on stderr: a spinner on a terminal, plain lines otherwise.
enum Progress {
    Quiet,
    Lines,
    Spinner(ProgressBar),
}

impl Progress {
    fn new(quiet: bool) -> Self {
        if quiet {
            return Progress::Quiet;
        }
        if !std::io::stderr().is_terminal() {
            return Progress::Lines;
        }
        let bar = ProgressBar::new_spinner();
        match ProgressStyle::default_spinner().template("{spinner} {msg} ({elapsed})") {
            Ok(style) => bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")),
            Err(e) => tracing::debug!(error = %e, "spinner template rejected"),
        }
        bar.enable_steady_tick(Duration::from_millis(80));
        Progress::Spinner(bar)
    }

    fn step(&self, msg: impl Into<String>) {
        let msg = msg.into();
        match self {
            Progress::Quiet => {}
            Progress::Lines => eprintln!("{}", msg),
            Progress::Spinner(bar) => bar.set_message(msg),
        }
    }

    fn finish(&self) {
        if let Progress::Spinner(bar) = self {
            bar.finish_and_clear();
        }
    }
}

/// What a run produced; printed to stdout by `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub title: String,
    pub blocks: usize,
    pub chars: usize,
    pub written: bool,
}

impl RunSummary {
    fn new(doc: &Document, output_path: PathBuf, written: bool) -> Self {
        RunSummary {
            output_path,
            title: doc.title.clone(),
            blocks: doc.blocks.len(),
            chars: doc.char_count(),
            written,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.written {
            writeln!(f, "Done! Saved: {}", self.output_path.display())?;
        } else {
            writeln!(f, "Dry run, would save: {}", self.output_path.display())?;
        }
        writeln!(f, "  Title: {}", self.title)?;
        writeln!(f, "  Blocks: {}", self.blocks)?;
        write!(f, "  Characters: {}", self.chars)
    }
}

fn build_client(args: &Args, config: &Config) -> Result<HttpClient, CliRunError> {
    let mut builder = HttpClient::builder();
    if let Some(secs) = args.timeout.or(config.timeout_secs) {
        builder = builder.timeout_secs(secs);
    }
    if let Some(ua) = args.user_agent.clone().or_else(|| config.user_agent.clone()) {
        builder = builder.user_agent(ua);
    }
    builder
        .build()
        .map_err(|e| CliRunError::Fetch(FetchError::ClientBuild { source: e }))
}

fn check_url(args: &Args) -> Result<reqwest::Url, CliRunError> {
    parse_page_url(&args.url).map_err(|e| {
        CliRunError::InvalidInput(format!(
            "Expected a page URL, e.g. https://example.com/article. {}",
            e
        ))
    })
}

/// Entry point for the CLI. Returns the run summary on success; Err with exit code and message on failure.
pub fn run(args: &Args) -> Result<RunSummary, CliRunError> {
    check_url(args)?;
    let config = config::load_config()?.unwrap_or_default();
    run_with_config(args, &config)
}

/// [run] with an already loaded config. Flags override config values.
pub fn run_with_config(args: &Args, config: &Config) -> Result<RunSummary, CliRunError> {
    let url = check_url(args)?;
    let client = build_client(args, config)?;
    let mode = args.mode.or(config.mode).unwrap_or_default();

    let progress = Progress::new(args.quiet);
    progress.step(format!("Processing: {}", url));
    progress.step("Fetching page...");
    let html = match fetch_page(&client, url.as_str()) {
        Ok(html) => html,
        Err(e) => {
            progress.finish();
            if e.is_timeout() {
                tracing::warn!(url = %url, "request timed out");
            }
            return Err(e.into());
        }
    };

    progress.step("Parsing content...");
    let doc = extract(&html, args.url.trim(), mode);
    progress.step(format!("Found {} blocks", doc.blocks.len()));

    let output_dir = config.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let output_path = resolve_output_path(args.explicit_output(), &output_dir, &doc);

    if args.dry_run {
        progress.finish();
        return Ok(RunSummary::new(&doc, output_path, false));
    }

    if let Err(e) = validate_output_path(&output_path) {
        progress.finish();
        return Err(e);
    }
    progress.step(format!("Creating EPUB: {}", output_path.display()));
    let package = Package::from_document(&doc);
    let written = write_epub(&package, &output_path);
    progress.finish();
    written?;

    Ok(RunSummary::new(&doc, output_path, true))
}
