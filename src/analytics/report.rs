// src/analytics/report.rs
// =============================================================================
// The end-of-crawl report.
//
// `CorpusReport` is a frozen copy of the aggregator's state. It can be
// printed as JSON (it derives Serialize) or written as the plain-text
// report, which has four sections in a fixed order:
//
//   Unique pages: 1234
//
//   Longest page: https://www.ics.uci.edu/... (5678 words)
//
//   Top 50 words:
//   research: 900
//   ...
//
//   Subdomains:
//   vision.ics.uci.edu, 12
//   www.ics.uci.edu, 300
// =============================================================================

use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use crate::analytics::LongestPage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubdomainCount {
    pub host: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorpusReport {
    pub unique_pages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_page: Option<LongestPage>,
    pub top_words: Vec<WordCount>,
    pub subdomains: Vec<SubdomainCount>,
}

impl CorpusReport {
    // Writes the plain-text report
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Unique pages: {}", self.unique_pages)?;
        writeln!(out)?;

        match &self.longest_page {
            Some(page) => writeln!(out, "Longest page: {} ({} words)", page.url, page.token_count)?,
            None => writeln!(out, "Longest page: none")?,
        }
        writeln!(out)?;

        writeln!(out, "Top {} words:", self.top_words.len())?;
        for word in &self.top_words {
            writeln!(out, "{}: {}", word.word, word.count)?;
        }
        writeln!(out)?;

        writeln!(out, "Subdomains:")?;
        for subdomain in &self.subdomains {
            writeln!(out, "{}, {}", subdomain.host, subdomain.count)?;
        }

        Ok(())
    }

    // Writes the plain-text report to a file, replacing it if it exists
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut file = io::BufWriter::new(std::fs::File::create(path)?);
        self.write_text(&mut file)?;
        file.flush()
    }
}
