// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The CLI is a thin shell around the library. It doesn't crawl the web;
// it runs the page pipeline on pages you already have:
// - process: one saved HTML file
// - check: URLs against the crawl policy
// - tokenize: word frequencies of a text file
// - replay: a whole log of recorded fetches, producing the corpus report
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use page_sieve::config::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "page-sieve",
    version,
    about = "Run the crawl page pipeline on saved pages",
    long_about = "page-sieve filters crawled pages for quality, harvests and validates their links, \
                  and builds corpus statistics (unique pages, longest page, top words, subdomains)."
)]
pub struct Cli {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format, overrides the config file
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline on one saved page and print the links it yields
    ///
    /// Example: page-sieve process https://www.ics.uci.edu/ saved/index.html
    Process {
        /// URL the page was fetched from
        url: String,

        /// File holding the page body
        file: PathBuf,

        /// HTTP status the fetch returned
        #[arg(long, default_value_t = 200)]
        status: u16,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check URLs against the crawl policy
    ///
    /// Example: page-sieve check https://www.ics.uci.edu/paper.pdf
    Check {
        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Print word frequencies of a text file, most frequent first
    Tokenize {
        /// Text file to read
        file: PathBuf,

        /// Drop stopwords before counting
        #[arg(long)]
        no_stopwords: bool,

        /// Only print this many words
        #[arg(long)]
        top: Option<usize>,
    },

    /// Replay recorded fetches (JSON Lines) and build the corpus report
    ///
    /// Example: page-sieve replay crawl.jsonl --report report.txt
    Replay {
        /// JSON Lines file of {"url", "status", "content"} records
        records: PathBuf,

        /// Pages processed at the same time
        #[arg(long, default_value_t = 8)]
        concurrency: usize,

        /// Write the plain-text report here instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}
