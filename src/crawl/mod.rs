// src/crawl/mod.rs
// =============================================================================
// Drives the page pipeline the way a crawl engine would.
//
// The crate doesn't fetch anything. Fetching, politeness delays, robots.txt
// and the frontier all belong to the engine that embeds the pipeline. What
// lives here is a replay engine: it takes fetches recorded earlier and pushes
// them through `PageProcessor` concurrently. It's what the CLI's `replay`
// command uses, and it's a handy way to rebuild a report from a crawl log.
// =============================================================================

mod replay;

pub use replay::{
    load_records, parse_records, replay, FetchRecord, ReplaySummary, ReplayedPage,
};
