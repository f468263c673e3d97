// src/links/extract.rs
// =============================================================================
// Extracts outbound links from a parsed page.
//
// Every <a href> is resolved against the page's own URL the way a browser
// would (RFC 3986):
//   page  = "https://www.ics.uci.edu/about/index.html"
//   "/people"           -> "https://www.ics.uci.edu/people"
//   "staff.html"        -> "https://www.ics.uci.edu/about/staff.html"
//   "//cs.uci.edu/"     -> "https://cs.uci.edu/"
//   "#top"              -> "https://www.ics.uci.edu/about/index.html#top"
//   "https://other.com" -> "https://other.com/"
//
// Fragments survive here; the validity policy doesn't care about them and
// the engine dedups its own frontier. Duplicate links are kept too.
// =============================================================================

use tracing::debug;
use url::Url;

use crate::markup::Markup;

// Returns the absolute URL of every anchor on the page, in document order
//
// An href that can't be resolved (e.g. "http://[broken") is skipped; the
// rest of the page's links are still returned.
pub fn extract_links(page_url: &Url, markup: &Markup) -> Vec<Url> {
    markup
        .anchor_hrefs()
        .into_iter()
        .filter_map(|href| resolve_href(page_url, href))
        .collect()
}

// Resolves a possibly-relative href
//
// `Url::join` already passes absolute hrefs through unchanged, so there is
// no need to try `Url::parse` first.
fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    match base.join(href.trim()) {
        Ok(url) => Some(url),
        Err(e) => {
            debug!(href, base = %base, error = %e, "skipping unresolvable href");
            None
        }
    }
}
