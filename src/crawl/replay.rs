// src/crawl/replay.rs
// =============================================================================
// Replays recorded fetches through the page pipeline.
//
// The real crawl engine (fetching, politeness, frontier) lives outside this
// crate. This module stands in for it: it reads fetch results that were
// saved earlier, one JSON object per line, and feeds them to
// `PageProcessor::process_page` concurrently, the way worker threads would.
//
// Record format (JSON Lines):
//   {"url": "https://www.ics.uci.edu/", "status": 200, "content": "<html>..."}
//   {"url": "https://www.ics.uci.edu/missing", "status": 404}
//
// How it runs:
// 1. Read and parse every line (bad lines are logged and skipped)
// 2. Turn each record into a blocking task; parsing HTML is CPU work and
//    never awaits, so it belongs on tokio's blocking pool
// 3. Run at most `concurrency` tasks at a time with buffer_unordered
// 4. Collect per-page outcomes; the aggregated statistics stay in the
//    processor for the report
//
// Rust concepts:
// - Arc: every task needs the same processor; Arc shares it without copying
// - spawn_blocking: runs synchronous code without stalling the async runtime
// - buffer_unordered: a concurrency limit over a stream of futures
// =============================================================================

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::pipeline::{FetchResult, PageOutcome, PageProcessor};

// One recorded fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRecord {
    /// URL the engine asked for
    pub url: String,
    /// HTTP status; a missing status means the fetch succeeded
    #[serde(default = "default_status")]
    pub status: u16,
    /// Body as text; missing for failed fetches
    #[serde(default)]
    pub content: String,
    /// Where the engine ended up, if it followed a redirect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
}

fn default_status() -> u16 {
    200
}

impl FetchRecord {
    fn into_fetch(self) -> (String, FetchResult) {
        let fetched_from = self.final_url.unwrap_or_else(|| self.url.clone());
        let fetch = FetchResult::new(fetched_from, self.status, self.content.into_bytes());
        (self.url, fetch)
    }
}

// The outcome for one replayed page
#[derive(Debug, Clone, Serialize)]
pub struct ReplayedPage {
    pub url: String,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplaySummary {
    /// One entry per record, in completion order
    pub pages: Vec<ReplayedPage>,
    /// Lines that could not be parsed as a record
    pub bad_records: usize,
}

impl ReplaySummary {
    pub fn recorded(&self) -> usize {
        self.pages.iter().filter(|p| p.outcome.recorded).count()
    }

    pub fn skipped(&self) -> usize {
        self.pages.iter().filter(|p| p.outcome.skipped.is_some()).count()
    }

    pub fn links_returned(&self) -> usize {
        self.pages.iter().map(|p| p.outcome.links.len()).sum()
    }
}

// Parses JSON Lines text into records
//
// Returns the records plus the number of lines that were skipped.
pub fn parse_records(text: &str) -> (Vec<FetchRecord>, usize) {
    let mut records = Vec::new();
    let mut bad = 0;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<FetchRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(line = index + 1, error = %e, "skipping bad fetch record");
                bad += 1;
            }
        }
    }

    (records, bad)
}

// Reads a JSON Lines file of fetch records
pub async fn load_records(path: &Path) -> Result<(Vec<FetchRecord>, usize)> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read fetch records from '{}'", path.display()))?;
    Ok(parse_records(&text))
}

// Runs every record through the processor, at most `concurrency` at a time
pub async fn replay(
    processor: Arc<PageProcessor>,
    records: Vec<FetchRecord>,
    concurrency: usize,
) -> Result<ReplaySummary> {
    let total = records.len();
    info!(pages = total, concurrency, "replaying fetch records");

    let tasks = records.into_iter().map(|record| {
        let processor = Arc::clone(&processor);
        tokio::task::spawn_blocking(move || {
            let (url, fetch) = record.into_fetch();
            let outcome = processor.process_page_detailed(&url, &fetch);
            ReplayedPage { url, outcome }
        })
    });

    let results: Vec<_> = stream::iter(tasks)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut summary = ReplaySummary::default();
    for result in results {
        // A panic inside the pipeline is a bug, not bad input: surface it
        summary
            .pages
            .push(result.context("page processing task panicked")?);
    }

    info!(
        pages = total,
        recorded = summary.recorded(),
        skipped = summary.skipped(),
        links = summary.links_returned(),
        "replay finished"
    );

    Ok(summary)
}
