// src/error.rs
// =============================================================================
// Error types for the page pipeline.
//
// None of these ever escape `process_page`: a bad URL, bad markup, or a
// failed fetch all degrade to "no links, no analytics". They exist so the
// pieces underneath can say *why* they gave up, and so tests can check it.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The string could not be parsed into scheme/host/path
    #[error("malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    /// The page body could not be treated as HTML at all
    #[error("malformed markup: {0}")]
    MalformedMarkup(String),

    /// A configured crawler-trap pattern is not a valid regex
    #[error("invalid trap pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
