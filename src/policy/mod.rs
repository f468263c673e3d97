// src/policy/mod.rs
// =============================================================================
// The two gates a page and its links pass through.
//
// Submodules:
// - quality: is this fetched page worth processing?
// - validity: should this URL ever be crawled?
// =============================================================================

mod quality;
mod validity;

pub use quality::{text_ratio, QualityFilter, QualityRejection};
pub use validity::{host_in_domain, CrawlPolicy, Rejection};
