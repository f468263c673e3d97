// src/lib.rs
// =============================================================================
// page-sieve: the per-page half of a web crawler.
//
// A crawl engine fetches pages; for each one it calls
// `PageProcessor::process_page` and gets back the links worth queuing next.
// Along the way the processor keeps corpus-wide statistics (unique pages,
// longest page, word frequencies, pages per subdomain) for the final report.
//
// Modules:
// - text: tokenizer, stopwords, word frequencies
// - markup: parsed page body and its visible text
// - links: URL identity and link extraction
// - policy: quality filter and URL validity policy
// - analytics: corpus statistics and the report
// - pipeline: the per-page entry point
// - crawl: a replay engine that drives the pipeline from recorded fetches
// - config: TOML configuration
// - error: error types
// =============================================================================

pub mod analytics;
pub mod config;
pub mod crawl;
pub mod error;
pub mod links;
pub mod markup;
pub mod pipeline;
pub mod policy;
pub mod text;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::{FetchResult, PageOutcome, PageProcessor};
