// src/pipeline/fetch.rs
//
// What the crawl engine hands us for each page. We never build one from the
// network ourselves; the engine (or a replay file) does.

#[derive(Debug, Clone)]
pub struct FetchResult {
    /// URL the engine actually fetched (after redirects, if any)
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub content: Vec<u8>,
}

impl FetchResult {
    pub fn new(url: impl Into<String>, status: u16, content: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            status,
            content,
        }
    }
}
