// src/text/mod.rs
// =============================================================================
// Everything that turns page text into words.
//
// Submodules:
// - tokenize: splits text into lowercase alphanumeric tokens
// - stopwords: drops common English words that carry no topic
// - frequency: counts how often each token occurs
// =============================================================================

mod frequency;
mod stopwords;
mod tokenize;

pub use frequency::{compute_word_frequencies, sorted_frequencies};
pub use stopwords::{filter_stopwords, is_stopword, STOPWORDS};
pub use tokenize::tokenize;
