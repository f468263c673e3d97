// src/analytics/aggregator.rs
// =============================================================================
// Corpus-wide statistics, accumulated one page at a time.
//
// State (all of it behind ONE lock, so it always changes together):
// - word histogram: token -> occurrences across every recorded page
// - longest page: the page with the most non-stopword tokens so far
// - unique pages: canonical URLs seen at least once
// - subdomain counts: unique pages per host under the parent domain
//
// The histogram counts every recorded visit, including repeat visits to
// the same URL. The unique-page set and the subdomain counts only count a
// URL the first time. The word report is about "what does the crawled
// content talk about", so repeats are allowed to weigh in.
//
// Tokenizing happens before the lock is taken; the critical section is
// just the merge.
// =============================================================================

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use crate::analytics::report::{CorpusReport, SubdomainCount, WordCount};
use crate::config::AnalyticsConfig;
use crate::links::CanonicalUrl;
use crate::markup::Markup;
use crate::policy::host_in_domain;
use crate::text::{filter_stopwords, tokenize};

/// The page with the most words seen so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongestPage {
    pub url: String,
    pub token_count: usize,
}

#[derive(Debug)]
struct HistogramEntry {
    count: u64,
    // Position of the word's first occurrence, used to break ties
    first_seen: u64,
}

#[derive(Debug, Default)]
struct CorpusState {
    words: HashMap<String, HistogramEntry>,
    next_word: u64,
    longest: Option<LongestPage>,
    unique_pages: HashSet<CanonicalUrl>,
    // BTreeMap keeps hosts sorted for the report
    subdomains: BTreeMap<String, u64>,
}

pub struct CorpusAggregator {
    parent_domain: String,
    state: Mutex<CorpusState>,
}

impl CorpusAggregator {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            parent_domain: config.parent_domain.trim_start_matches('.').to_ascii_lowercase(),
            state: Mutex::new(CorpusState::default()),
        }
    }

    // Folds one page into the corpus statistics
    //
    // Returns the page's token count after stopword removal.
    pub fn record_page(&self, url: &CanonicalUrl, markup: &Markup) -> usize {
        let tokens = filter_stopwords(tokenize(&markup.plain_text()));
        self.record_tokens(url, tokens)
    }

    // The locked half of `record_page`, for callers that already have tokens
    pub fn record_tokens(&self, url: &CanonicalUrl, tokens: Vec<String>) -> usize {
        let token_count = tokens.len();
        let mut state = self.state.lock();

        for token in tokens {
            let next = state.next_word;
            let entry = state.words.entry(token).or_insert_with(|| HistogramEntry {
                count: 0,
                first_seen: next,
            });
            entry.count += 1;
            if entry.first_seen == next {
                state.next_word += 1;
            }
        }

        // Strictly greater: a tie keeps the page that got there first
        if state.longest.as_ref().map_or(true, |l| token_count > l.token_count) {
            state.longest = Some(LongestPage {
                url: url.to_string(),
                token_count,
            });
        }

        if state.unique_pages.insert(url.clone()) {
            let host = url.host();
            if host_in_domain(host, &self.parent_domain) {
                *state.subdomains.entry(host.to_string()).or_insert(0) += 1;
            }
            debug!(url = %url, token_count, "new unique page");
        }

        token_count
    }

    pub fn unique_page_count(&self) -> usize {
        self.state.lock().unique_pages.len()
    }

    pub fn longest_page(&self) -> Option<LongestPage> {
        self.state.lock().longest.clone()
    }

    pub fn word_count(&self, word: &str) -> u64 {
        self.state.lock().words.get(word).map_or(0, |e| e.count)
    }

    // The `limit` most frequent words, highest count first.
    // Equal counts come out in the order the words were first seen.
    pub fn top_words(&self, limit: usize) -> Vec<WordCount> {
        self.state.lock().top_words(limit)
    }

    // Unique pages per host, sorted by host name
    pub fn subdomain_counts(&self) -> Vec<SubdomainCount> {
        self.state.lock().subdomain_counts()
    }

    // A consistent read-out of everything, taken under a single lock
    pub fn snapshot(&self, top_words: usize) -> CorpusReport {
        let state = self.state.lock();
        CorpusReport {
            unique_pages: state.unique_pages.len(),
            longest_page: state.longest.clone(),
            top_words: state.top_words(top_words),
            subdomains: state.subdomain_counts(),
        }
    }
}

impl CorpusState {
    fn top_words(&self, limit: usize) -> Vec<WordCount> {
        let mut words: Vec<(&String, &HistogramEntry)> = self.words.iter().collect();
        words.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });

        words
            .into_iter()
            .take(limit)
            .map(|(word, entry)| WordCount {
                word: word.clone(),
                count: entry.count,
            })
            .collect()
    }

    fn subdomain_counts(&self) -> Vec<SubdomainCount> {
        self.subdomains
            .iter()
            .map(|(host, count)| SubdomainCount {
                host: host.clone(),
                count: *count,
            })
            .collect()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why one Mutex around everything instead of one per map?
//    - A page updates four things; with separate locks another thread could
//      see the histogram updated but the unique-page set not yet
//    - One lock means every reader sees whole pages, never half of one
//
// 2. Why parking_lot::Mutex?
//    - lock() returns the guard directly, no Result to unwrap
//    - It never gets "poisoned" if a thread panics while holding it
//
// 3. Where does the lock get released?
//    - When the guard (`state`) goes out of scope, on every return path
//    - That's RAII: there is no unlock() call to forget
//
// 4. Why does record_page take &self and not &mut self?
//    - Many worker threads share one aggregator through an Arc
//    - The Mutex gives us "interior mutability": changing data behind &self
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::canonicalize;
    use std::sync::Arc;

    fn aggregator() -> CorpusAggregator {
        CorpusAggregator::new(&AnalyticsConfig::default())
    }

    fn page(body: &str) -> Markup {
        Markup::parse(body.as_bytes()).unwrap()
    }

    fn url(raw: &str) -> CanonicalUrl {
        canonicalize(raw).unwrap()
    }

    #[test]
    fn test_returns_filtered_token_count() {
        let agg = aggregator();
        let count = agg.record_page(
            &url("https://www.ics.uci.edu/a"),
            &page("<p>The crawler and the frontier</p>"),
        );
        // "the", "and", "the" are stopwords
        assert_eq!(count, 2);
    }

    #[test]
    fn test_same_page_twice_counts_unique_once_but_words_twice() {
        let agg = aggregator();
        let markup = page("<p>informatics informatics research</p>");

        agg.record_page(&url("https://www.ics.uci.edu/about"), &markup);
        agg.record_page(&url("https://www.ics.uci.edu/about#team"), &markup);

        assert_eq!(agg.unique_page_count(), 1);
        assert_eq!(
            agg.subdomain_counts(),
            vec![SubdomainCount {
                host: "www.ics.uci.edu".to_string(),
                count: 1
            }]
        );
        // The histogram saw both visits
        assert_eq!(agg.word_count("informatics"), 4);
        assert_eq!(agg.word_count("research"), 2);
    }

    #[test]
    fn test_longest_page_ignores_ties() {
        let agg = aggregator();
        agg.record_page(&url("https://www.ics.uci.edu/first"), &page("<p>alpha beta gamma</p>"));
        agg.record_page(&url("https://www.ics.uci.edu/tie"), &page("<p>delta epsilon zeta</p>"));

        let longest = agg.longest_page().unwrap();
        assert_eq!(longest.url, "https://www.ics.uci.edu/first");
        assert_eq!(longest.token_count, 3);

        agg.record_page(&url("https://www.ics.uci.edu/longer"), &page("<p>one two three four</p>"));
        assert_eq!(agg.longest_page().unwrap().url, "https://www.ics.uci.edu/longer");
    }

    #[test]
    fn test_subdomains_only_under_parent_domain() {
        let agg = aggregator();
        let markup = page("<p>words</p>");
        agg.record_page(&url("https://vision.ics.uci.edu/"), &markup);
        agg.record_page(&url("https://www.cs.uci.edu/"), &markup);
        agg.record_page(&url("https://www.ics.uci.edu/"), &markup);
        agg.record_page(&url("https://www.ics.uci.edu/people"), &markup);

        assert_eq!(agg.unique_page_count(), 4);
        let hosts: Vec<(String, u64)> = agg
            .subdomain_counts()
            .into_iter()
            .map(|s| (s.host, s.count))
            .collect();
        assert_eq!(
            hosts,
            vec![
                ("vision.ics.uci.edu".to_string(), 1),
                ("www.ics.uci.edu".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_top_words_breaks_ties_by_first_seen() {
        let agg = aggregator();
        agg.record_page(
            &url("https://www.ics.uci.edu/"),
            &page("<p>zebra apple zebra apple mango</p>"),
        );

        let top: Vec<(String, u64)> = agg
            .top_words(2)
            .into_iter()
            .map(|w| (w.word, w.count))
            .collect();
        assert_eq!(top, vec![("zebra".to_string(), 2), ("apple".to_string(), 2)]);
    }

    #[test]
    fn test_empty_corpus_snapshot() {
        let report = aggregator().snapshot(50);
        assert_eq!(report.unique_pages, 0);
        assert!(report.longest_page.is_none());
        assert!(report.top_words.is_empty());
        assert!(report.subdomains.is_empty());
    }

    #[test]
    fn test_concurrent_pages_never_double_count() {
        let agg = Arc::new(aggregator());
        let mut handles = Vec::new();

        // 8 threads each record the same 25 URLs
        for _ in 0..8 {
            let agg = Arc::clone(&agg);
            handles.push(std::thread::spawn(move || {
                for i in 0..25 {
                    let canonical = url(&format!("https://www.ics.uci.edu/page{}", i));
                    agg.record_tokens(&canonical, vec!["shared".to_string()]);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(agg.unique_page_count(), 25);
        assert_eq!(agg.subdomain_counts()[0].count, 25);
        assert_eq!(agg.word_count("shared"), 200);
    }
}
