// src/links/mod.rs
// =============================================================================
// URLs in and out of a page.
//
// Submodules:
// - canonical: fragment-stripped URL identity (the dedup key)
// - extract: pulls <a href> targets out of markup and makes them absolute
// =============================================================================

mod canonical;
mod extract;

pub use canonical::{canonicalize, from_url, CanonicalUrl};
pub use extract::extract_links;
