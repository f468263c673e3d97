// src/analytics/mod.rs
//
// Corpus-wide statistics and the report built from them.

mod aggregator;
mod report;

pub use aggregator::{CorpusAggregator, LongestPage};
pub use report::{CorpusReport, SubdomainCount, WordCount};
