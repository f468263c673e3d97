// src/text/frequency.rs
//
// Word counts for a single token stream. The corpus-wide histogram lives in
// analytics; this is the standalone version the `tokenize` subcommand uses.

use std::collections::HashMap;

// Counts occurrences of each token
pub fn compute_word_frequencies(tokens: &[String]) -> HashMap<String, u64> {
    let mut frequencies = HashMap::new();
    for token in tokens {
        *frequencies.entry(token.clone()).or_insert(0) += 1;
    }
    frequencies
}

// Counts and sorts tokens by descending count.
// Ties keep the order in which the words first appeared in `tokens`.
pub fn sorted_frequencies(tokens: &[String]) -> Vec<(String, u64)> {
    let counts = compute_word_frequencies(tokens);

    // Walk the tokens once more to get first-seen order, then a stable sort
    // by count keeps that order among equal counts
    let mut seen = std::collections::HashSet::new();
    let mut ordered: Vec<(String, u64)> = tokens
        .iter()
        .filter(|t| seen.insert(t.as_str()))
        .map(|t| (t.clone(), counts[t]))
        .collect();

    ordered.sort_by(|a, b| b.1.cmp(&a.1));
    ordered
}
