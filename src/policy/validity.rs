// src/policy/validity.rs
// =============================================================================
// Decides whether a URL should ever be crawled.
//
// The checks run in a fixed order and stop at the first failure:
// 1. Scheme is http or https
// 2. Host is inside an allowed domain, or matches the one path exception
// 3. Path does not end in a disallowed file extension
// 4. Path (plus query) does not match a crawler-trap pattern
//
// Each failure has its own `Rejection` variant so callers and tests can see
// *why* a URL was turned away, not just that it was.
// =============================================================================

use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;
use url::Url;

use crate::config::{PathException, PolicyConfig};
use crate::error::{PipelineError, Result};

// Why a URL was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Not http/https
    Scheme(String),
    /// Host outside every allowed domain and not covered by the path exception
    Domain(String),
    /// Path ends with a disallowed extension (lowercased, no dot)
    Extension(String),
    /// Path or query matched this trap pattern
    Trap(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Scheme(scheme) => write!(f, "scheme '{}' is not http(s)", scheme),
            Rejection::Domain(host) => write!(f, "host '{}' is outside the allowed domains", host),
            Rejection::Extension(ext) => write!(f, "'.{}' files are not crawled", ext),
            Rejection::Trap(pattern) => write!(f, "matches trap pattern '{}'", pattern),
        }
    }
}

// The compiled form of a `PolicyConfig`
#[derive(Debug, Clone)]
pub struct CrawlPolicy {
    allowed_domains: Vec<String>,
    path_exception: Option<PathException>,
    disallowed_extensions: HashSet<String>,
    trap_patterns: Vec<Regex>,
}

impl CrawlPolicy {
    // Compiles the configured lists
    //
    // Domains and extensions are normalized (lowercase, no leading dot) so
    // the config can say ".ics.uci.edu" or "PDF" without surprises.
    pub fn new(config: &PolicyConfig) -> Result<Self> {
        let trap_patterns = config
            .trap_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| PipelineError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            allowed_domains: config
                .allowed_domains
                .iter()
                .map(|d| d.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            path_exception: config.path_exception.as_ref().map(|e| PathException {
                host: e.host.to_ascii_lowercase(),
                path_prefix: e.path_prefix.clone(),
            }),
            disallowed_extensions: config
                .disallowed_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            trap_patterns,
        })
    }

    // Runs every check and reports the first failure
    pub fn evaluate(&self, url: &Url) -> std::result::Result<(), Rejection> {
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(Rejection::Scheme(scheme.to_string()));
        }

        let host = url.host_str().unwrap_or_default();
        if !self.domain_allowed(host) && !self.path_exception_applies(host, url.path()) {
            return Err(Rejection::Domain(host.to_string()));
        }

        if let Some(ext) = self.disallowed_extension(url.path()) {
            return Err(Rejection::Extension(ext));
        }

        let target = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        if let Some(pattern) = self.trap_patterns.iter().find(|p| p.is_match(&target)) {
            return Err(Rejection::Trap(pattern.as_str().to_string()));
        }

        Ok(())
    }

    pub fn is_crawlable(&self, url: &Url) -> bool {
        match self.evaluate(url) {
            Ok(()) => true,
            Err(reason) => {
                debug!(url = %url, %reason, "rejected by crawl policy");
                false
            }
        }
    }

    // "ics.uci.edu" allows ics.uci.edu and www.ics.uci.edu,
    // but not "physics.uci.edu"
    fn domain_allowed(&self, host: &str) -> bool {
        self.allowed_domains.iter().any(|domain| host_in_domain(host, domain))
    }

    fn path_exception_applies(&self, host: &str, path: &str) -> bool {
        self.path_exception
            .as_ref()
            .is_some_and(|e| host == e.host && path.starts_with(&e.path_prefix))
    }

    fn disallowed_extension(&self, path: &str) -> Option<String> {
        let (_, ext) = path.rsplit_once('.')?;
        if ext.contains('/') {
            return None;
        }
        let ext = ext.to_ascii_lowercase();
        self.disallowed_extensions.contains(&ext).then_some(ext)
    }
}

// True when `host` is `domain` itself or one of its subdomains
pub fn host_in_domain(host: &str, domain: &str) -> bool {
    let domain = domain.trim_start_matches('.');
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CrawlPolicy {
        CrawlPolicy::new(&PolicyConfig::default()).unwrap()
    }

    fn verdict(url: &str) -> std::result::Result<(), Rejection> {
        policy().evaluate(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_department_page_is_accepted() {
        assert_eq!(verdict("https://www.ics.uci.edu/people"), Ok(()));
        assert_eq!(verdict("http://vision.ics.uci.edu/papers/"), Ok(()));
    }

    #[test]
    fn test_bare_domain_is_accepted() {
        assert_eq!(verdict("https://ics.uci.edu/"), Ok(()));
    }

    #[test]
    fn test_ftp_rejected_by_scheme() {
        assert_eq!(
            verdict("ftp://www.ics.uci.edu/x"),
            Err(Rejection::Scheme("ftp".to_string()))
        );
    }

    #[test]
    fn test_pdf_rejected_by_extension() {
        assert_eq!(
            verdict("https://www.ics.uci.edu/paper.pdf"),
            Err(Rejection::Extension("pdf".to_string()))
        );
    }

    #[test]
    fn test_extension_check_ignores_case() {
        assert_eq!(
            verdict("https://www.ics.uci.edu/slides/Lecture1.PPTX"),
            Err(Rejection::Extension("pptx".to_string()))
        );
    }

    #[test]
    fn test_dot_in_directory_is_not_an_extension() {
        assert_eq!(verdict("https://www.ics.uci.edu/v1.zip/readme"), Ok(()));
    }

    #[test]
    fn test_sort_query_rejected_as_trap() {
        let result = verdict("https://www.ics.uci.edu/events?sort=date");
        assert!(matches!(result, Err(Rejection::Trap(_))));
    }

    #[test]
    fn test_calendar_and_search_traps() {
        assert!(matches!(
            verdict("https://www.ics.uci.edu/events/2024-05-01/"),
            Err(Rejection::Trap(_))
        ));
        assert!(matches!(
            verdict("https://www.ics.uci.edu/search?q=faculty"),
            Err(Rejection::Trap(_))
        ));
        assert!(matches!(
            verdict("https://wiki.ics.uci.edu/doku.php/start?do=revisions"),
            Err(Rejection::Trap(_))
        ));
    }

    #[test]
    fn test_calendar_and_pagination_traps_survive_a_query() {
        for url in [
            "https://www.ics.uci.edu/events/month?x=1",
            "https://www.ics.uci.edu/events/2024-05-01?x=1",
            "https://www.ics.uci.edu/blog/page/12",
            "https://www.ics.uci.edu/blog/page/12?x=1",
        ] {
            assert!(matches!(verdict(url), Err(Rejection::Trap(_))), "{}", url);
        }
        // Shallow pages are still fine
        assert_eq!(verdict("https://www.ics.uci.edu/blog/page/2?x=1"), Ok(()));
    }

    #[test]
    fn test_path_exception_lets_one_section_in() {
        assert_eq!(
            verdict("https://today.uci.edu/department/information_computer_sciences/news"),
            Ok(())
        );
        assert_eq!(
            verdict("https://today.uci.edu/department/engineering/news"),
            Err(Rejection::Domain("today.uci.edu".to_string()))
        );
    }

    #[test]
    fn test_unrelated_host_rejected_by_domain() {
        assert_eq!(
            verdict("https://www.example.com/"),
            Err(Rejection::Domain("www.example.com".to_string()))
        );
    }

    #[test]
    fn test_lookalike_host_is_not_a_subdomain() {
        assert_eq!(
            verdict("https://physics.uci.edu/"),
            Err(Rejection::Domain("physics.uci.edu".to_string()))
        );
        assert!(!host_in_domain("evilics.uci.edu", "ics.uci.edu"));
    }

    #[test]
    fn test_checks_run_in_order() {
        // Both off-domain and a PDF: the domain check fires first
        assert_eq!(
            verdict("https://www.example.com/paper.pdf"),
            Err(Rejection::Domain("www.example.com".to_string()))
        );
    }

    #[test]
    fn test_legacy_policy_lets_traps_through() {
        let legacy = CrawlPolicy::new(&PolicyConfig::legacy()).unwrap();
        let url = Url::parse("https://www.ics.uci.edu/events?sort=date").unwrap();
        assert!(legacy.is_crawlable(&url));
    }

    #[test]
    fn test_invalid_trap_pattern_fails_to_compile() {
        let config = PolicyConfig {
            trap_patterns: vec!["[unclosed".to_string()],
            ..PolicyConfig::default()
        };
        let err = CrawlPolicy::new(&config).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPattern { .. }));
    }

    #[test]
    fn test_config_normalizes_dots_and_case() {
        let config = PolicyConfig {
            allowed_domains: vec![".Example.ORG".to_string()],
            disallowed_extensions: vec![".PDF".to_string()],
            trap_patterns: vec![],
            path_exception: None,
        };
        let policy = CrawlPolicy::new(&config).unwrap();
        assert!(policy.is_crawlable(&Url::parse("https://www.example.org/a").unwrap()));
        assert!(!policy.is_crawlable(&Url::parse("https://www.example.org/a.pdf").unwrap()));
    }
}
