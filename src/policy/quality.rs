// src/policy/quality.rs
// =============================================================================
// Decides whether a fetched page is worth processing at all.
//
// A page is skipped when:
// - the fetch didn't return 200
// - the body is empty
// - the body isn't markup (binary content)
// - visible text is too small a share of the body (text-to-markup ratio)
//
// The last rule catches pages that are mostly script, styling, or
// boilerplate: calendar grids, generated listings and similar traps.
// =============================================================================

use std::fmt;
use tracing::debug;

use crate::config::QualityConfig;
use crate::markup::Markup;
use crate::pipeline::FetchResult;

// Why a page was skipped
#[derive(Debug, Clone, PartialEq)]
pub enum QualityRejection {
    /// Fetch returned something other than 200
    Status(u16),
    /// 200 with no body
    Empty,
    /// Body is not markup
    Malformed,
    /// Visible text / raw bytes fell below the threshold
    LowTextRatio { ratio: f64, min: f64 },
}

impl fmt::Display for QualityRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityRejection::Status(code) => write!(f, "HTTP {}", code),
            QualityRejection::Empty => write!(f, "empty body"),
            QualityRejection::Malformed => write!(f, "body is not markup"),
            QualityRejection::LowTextRatio { ratio, min } => {
                write!(f, "text ratio {:.3} below {:.3}", ratio, min)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct QualityFilter {
    min_text_ratio: f64,
}

impl QualityFilter {
    pub fn new(config: &QualityConfig) -> Self {
        Self {
            min_text_ratio: config.min_text_ratio,
        }
    }

    // Checks a fetch and, when it passes, hands back the parsed page
    //
    // Returning the parsed markup saves the page processor a second parse.
    pub fn check(&self, fetch: &FetchResult) -> Result<Markup, QualityRejection> {
        if fetch.status != 200 {
            return Err(QualityRejection::Status(fetch.status));
        }
        if fetch.content.is_empty() {
            return Err(QualityRejection::Empty);
        }

        let markup = Markup::parse(&fetch.content).map_err(|e| {
            debug!(url = %fetch.url, error = %e, "treating page as empty");
            QualityRejection::Malformed
        })?;

        let ratio = text_ratio(&markup);
        if ratio < self.min_text_ratio {
            return Err(QualityRejection::LowTextRatio {
                ratio,
                min: self.min_text_ratio,
            });
        }

        Ok(markup)
    }

    pub fn is_substantive(&self, fetch: &FetchResult) -> bool {
        self.check(fetch).is_ok()
    }
}

// Visible text bytes divided by raw body bytes (0 for an empty body)
pub fn text_ratio(markup: &Markup) -> f64 {
    if markup.raw_len() == 0 {
        return 0.0;
    }
    markup.plain_text().len() as f64 / markup.raw_len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetch(status: u16, body: &str) -> FetchResult {
        FetchResult::new("https://www.ics.uci.edu/", status, body.as_bytes().to_vec())
    }

    fn filter() -> QualityFilter {
        QualityFilter::new(&QualityConfig::default())
    }

    #[test]
    fn test_404_rejected_regardless_of_content() {
        let page = fetch(404, &format!("<p>{}</p>", "words ".repeat(50)));
        assert_eq!(filter().check(&page).err(), Some(QualityRejection::Status(404)));
    }

    #[test]
    fn test_empty_body_rejected() {
        assert_eq!(filter().check(&fetch(200, "")).err(), Some(QualityRejection::Empty));
    }

    #[test]
    fn test_mostly_text_is_accepted() {
        // 100 text bytes in 107 bytes of body: ~93% text
        let page = fetch(200, &format!("<p>{}</p>", "a".repeat(100)));
        assert!(filter().is_substantive(&page));
    }

    #[test]
    fn test_mostly_script_is_rejected() {
        let body = format!(
            "<script>{}</script><p>hello world</p>",
            "x=1;".repeat(250)
        );
        let page = fetch(200, &body);
        assert!(matches!(
            filter().check(&page),
            Err(QualityRejection::LowTextRatio { .. })
        ));
    }

    #[test]
    fn test_threshold_comes_from_config() {
        // 10 text bytes in 21: fine by default, rejected at 0.6
        let page = fetch(200, "<b>tttttttttt</b><br>");
        assert!(filter().is_substantive(&page));

        let strict = QualityFilter::new(&QualityConfig { min_text_ratio: 0.6 });
        assert!(!strict.is_substantive(&page));
    }

    #[test]
    fn test_binary_body_rejected() {
        let page = FetchResult::new("https://www.ics.uci.edu/logo", 200, vec![0x89, 0x50, 0x00, 0x01]);
        assert_eq!(filter().check(&page).err(), Some(QualityRejection::Malformed));
    }
}
