// src/pipeline/mod.rs
// =============================================================================
// Page in, links out.
//
// Submodules:
// - fetch: the fetched page as the crawl engine hands it over
// - processor: runs the quality filter, link extraction, crawl policy and
//   analytics for one page
// =============================================================================

mod fetch;
mod processor;

pub use fetch::FetchResult;
pub use processor::{PageOutcome, PageProcessor};
