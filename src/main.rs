// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load the configuration and set up logging
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = URLs rejected by `check`,
//    2 = error)
//
// Results go to stdout, logs go to stderr, so `--json` output can be piped.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use page_sieve::config::{LogFormat, LoggingConfig};
use page_sieve::links::canonicalize;
use page_sieve::policy::CrawlPolicy;
use page_sieve::text::{filter_stopwords, sorted_frequencies, tokenize};
use page_sieve::{crawl, FetchResult, PageOutcome, PageProcessor, PipelineConfig};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    init_logging(&config.logging, cli.log_format);

    match cli.command {
        Commands::Process { url, file, status, json } => {
            handle_process(&config, &url, &file, status, json).await
        }
        Commands::Check { urls } => handle_check(&config, &urls),
        Commands::Tokenize { file, no_stopwords, top } => {
            handle_tokenize(&file, no_stopwords, top).await
        }
        Commands::Replay { records, concurrency, report, json } => {
            handle_replay(&config, &records, concurrency, report.as_deref(), json).await
        }
    }
}

// RUST_LOG wins; otherwise the configured level
fn init_logging(config: &LoggingConfig, format_override: Option<LogFormat>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    match format_override.unwrap_or(config.format) {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

// Handles the 'process' subcommand
async fn handle_process(
    config: &PipelineConfig,
    url: &str,
    file: &Path,
    status: u16,
    json: bool,
) -> Result<i32> {
    let content = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read page '{}'", file.display()))?;

    let processor = PageProcessor::new(config)?;
    let fetch = FetchResult::new(url, status, content);
    let outcome = processor.process_page_detailed(url, &fetch);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(url, &outcome);
    }

    Ok(0)
}

fn print_outcome(url: &str, outcome: &PageOutcome) {
    println!("📄 {}", url);

    if let Some(reason) = &outcome.skipped {
        println!("   ⏭️  Skipped: {}", reason);
        return;
    }

    match outcome.token_count {
        Some(count) => println!("   📊 Recorded ({} words after stopwords)", count),
        None => println!("   📊 Not recorded (page URL is outside the crawl policy)"),
    }
    println!(
        "   🔗 {} of {} link(s) kept",
        outcome.links.len(),
        outcome.links_found
    );
    println!();

    for link in &outcome.links {
        println!("{}", link);
    }
}

// Handles the 'check' subcommand
fn handle_check(config: &PipelineConfig, urls: &[String]) -> Result<i32> {
    let policy = CrawlPolicy::new(&config.policy)?;
    let mut rejected = 0;

    println!("{:<70} {:<10} {}", "URL", "VERDICT", "REASON");
    println!("{}", "=".repeat(110));

    for url in urls {
        let verdict = canonicalize(url)
            .map_err(|e| e.to_string())
            .and_then(|canonical| {
                policy
                    .evaluate(canonical.as_url())
                    .map_err(|reason| reason.to_string())
            });

        let url_display = if url.chars().count() > 67 {
            format!("{}...", url.chars().take(67).collect::<String>())
        } else {
            url.clone()
        };

        match verdict {
            Ok(()) => println!("{:<70} {:<10}", url_display, "✅ CRAWL"),
            Err(reason) => {
                rejected += 1;
                println!("{:<70} {:<10} {}", url_display, "❌ SKIP", reason);
            }
        }
    }

    Ok(if rejected > 0 { 1 } else { 0 })
}

// Handles the 'tokenize' subcommand
async fn handle_tokenize(file: &Path, no_stopwords: bool, top: Option<usize>) -> Result<i32> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read '{}'", file.display()))?;

    let mut tokens = tokenize(&text);
    if no_stopwords {
        tokens = filter_stopwords(tokens);
    }

    let frequencies = sorted_frequencies(&tokens);
    let limit = top.unwrap_or(frequencies.len());
    for (word, count) in frequencies.iter().take(limit) {
        println!("{} - {}", word, count);
    }

    Ok(0)
}

// Handles the 'replay' subcommand
async fn handle_replay(
    config: &PipelineConfig,
    records_path: &Path,
    concurrency: usize,
    report_path: Option<&Path>,
    json: bool,
) -> Result<i32> {
    let (records, bad_records) = crawl::load_records(records_path).await?;
    if bad_records > 0 {
        info!(bad_records, "some records could not be parsed");
    }

    let processor = Arc::new(PageProcessor::new(config)?);
    let summary = crawl::replay(Arc::clone(&processor), records, concurrency).await?;
    let report = processor.report();

    eprintln!(
        "📊 {} page(s): {} recorded, {} skipped, {} link(s) returned",
        summary.pages.len(),
        summary.recorded(),
        summary.skipped(),
        summary.links_returned()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    match report_path {
        Some(path) => {
            report
                .save(path)
                .with_context(|| format!("Failed to write report '{}'", path.display()))?;
            eprintln!("📝 Report written to {}", path.display());
        }
        None if !json => report.write_text(&mut std::io::stdout().lock())?,
        None => {}
    }

    Ok(0)
}
