// src/pipeline/processor.rs
// =============================================================================
// The per-page entry point.
//
// The crawl engine calls `process_page` once for every page it fetched and
// gets back the links worth queuing. In order:
// 1. Quality filter. A failed or thin page stops here: no links, no stats.
// 2. Extract every link on the page, resolved to an absolute URL.
// 3. If the page's OWN URL passes the crawl policy, fold it into the
//    corpus statistics. A page can be fetched and mined for links while
//    still not counting as a unique page.
// 4. Keep only the links that pass the crawl policy, in page order.
//
// Nothing here returns an error to the engine. Bad URLs, bad markup and
// failed fetches all end up as "fewer links" and "no stats", so the crawl
// keeps moving.
//
// Rust concepts:
// - &self everywhere: the processor is shared between worker threads
//   (wrap it in an Arc), and the only mutable state is inside the
//   aggregator's lock
// =============================================================================

use tracing::{debug, warn};
use url::Url;

use crate::analytics::{CorpusAggregator, CorpusReport};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::links::{canonicalize, extract_links};
use crate::pipeline::FetchResult;
use crate::policy::{CrawlPolicy, QualityFilter};

pub struct PageProcessor {
    quality: QualityFilter,
    policy: CrawlPolicy,
    aggregator: CorpusAggregator,
    top_words: usize,
}

// What happened to one page, for logging and the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct PageOutcome {
    /// Links returned to the engine
    pub links: Vec<String>,
    /// Links found on the page before filtering
    pub links_found: usize,
    /// Whether the page made it into the corpus statistics
    pub recorded: bool,
    /// Non-stopword tokens on the page, when recorded
    pub token_count: Option<usize>,
    /// Why the page was skipped, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

impl PageProcessor {
    // Builds the processor from configuration
    //
    // Fails only if a crawler-trap pattern is not a valid regex.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            quality: QualityFilter::new(&config.quality),
            policy: CrawlPolicy::new(&config.policy)?,
            aggregator: CorpusAggregator::new(&config.analytics),
            top_words: config.analytics.top_words,
        })
    }

    // Processes one fetched page and returns the links to offer the frontier
    pub fn process_page(&self, requested_url: &str, fetch: &FetchResult) -> Vec<String> {
        self.process_page_detailed(requested_url, fetch).links
    }

    // Same as `process_page`, but also says what happened along the way
    pub fn process_page_detailed(&self, requested_url: &str, fetch: &FetchResult) -> PageOutcome {
        let markup = match self.quality.check(fetch) {
            Ok(markup) => markup,
            Err(reason) => {
                debug!(url = requested_url, %reason, "skipping page");
                return PageOutcome {
                    skipped: Some(reason.to_string()),
                    ..PageOutcome::default()
                };
            }
        };

        // Without a parseable page URL we can't resolve relative links or
        // record the page, so the page contributes nothing
        let page_url = match Url::parse(requested_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(url = requested_url, error = %e, "page URL is malformed");
                return PageOutcome {
                    skipped: Some(format!("malformed page URL: {}", e)),
                    ..PageOutcome::default()
                };
            }
        };

        let links = extract_links(&page_url, &markup);
        let links_found = links.len();

        let mut outcome = PageOutcome {
            links_found,
            ..PageOutcome::default()
        };

        match canonicalize(requested_url) {
            Ok(canonical) if self.policy.is_crawlable(canonical.as_url()) => {
                let token_count = self.aggregator.record_page(&canonical, &markup);
                outcome.recorded = true;
                outcome.token_count = Some(token_count);
            }
            Ok(_) => {}
            Err(e) => debug!(url = requested_url, error = %e, "not recording page"),
        }

        outcome.links = links
            .into_iter()
            .filter(|link| self.policy.is_crawlable(link))
            .map(String::from)
            .collect();

        debug!(
            url = requested_url,
            found = links_found,
            kept = outcome.links.len(),
            recorded = outcome.recorded,
            "processed page"
        );

        outcome
    }

    pub fn policy(&self) -> &CrawlPolicy {
        &self.policy
    }

    pub fn aggregator(&self) -> &CorpusAggregator {
        &self.aggregator
    }

    // Read-out for the report writer, using the configured top-N
    pub fn report(&self) -> CorpusReport {
        self.aggregator.snapshot(self.top_words)
    }
}
