// src/links/canonical.rs
// =============================================================================
// URL identity.
//
// Two URLs are the same page iff they are equal once the fragment is gone:
//   http://a.com/x#top  and  http://a.com/x#bottom  -> same page
//   http://a.com/x?p=1  and  http://a.com/x?p=2     -> different pages
//
// We lean on the `url` crate for parsing. It lowercases the scheme and host
// and fills in an empty path as "/"; we don't normalize anything beyond that.
// =============================================================================

use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

use crate::error::{PipelineError, Result};

// A parsed URL with its fragment removed
//
// This is the dedup key for the unique-page set, so it implements Eq + Hash
// and can only be built through `canonicalize`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Host name; always present, `canonicalize` rejects URLs without one
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CanonicalUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Parses a URL string and strips its fragment
//
// Fails for strings the parser rejects and for URLs with no host
// ("mailto:someone@example.com", "data:..."), since those have no
// scheme/host/path shape to reason about.
pub fn canonicalize(raw: &str) -> Result<CanonicalUrl> {
    let url = Url::parse(raw).map_err(|e| PipelineError::MalformedUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    from_url(url)
}

// Same as `canonicalize` for a URL that is already parsed
pub fn from_url(mut url: Url) -> Result<CanonicalUrl> {
    if url.host_str().map_or(true, str::is_empty) {
        return Err(PipelineError::MalformedUrl {
            url: url.to_string(),
            reason: "URL has no host".to_string(),
        });
    }

    url.set_fragment(None);
    Ok(CanonicalUrl(url))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a newtype?
//    - `struct CanonicalUrl(Url)` wraps a Url in a new type
//    - The compiler now knows the difference between "any URL" and "a URL
//      whose fragment was stripped", so you can't put a raw URL in the
//      unique-page set by accident
//
// 2. Why `mut url` in the parameter list?
//    - We own the Url (it was moved in), so we may change it in place with
//      set_fragment(None) instead of building a copy
//
// 3. What does map_err do?
//    - Converts the url crate's ParseError into our own PipelineError
//    - Then `?` can return it from a function that returns our Result type
// -----------------------------------------------------------------------------
