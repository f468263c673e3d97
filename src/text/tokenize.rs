// src/text/tokenize.rs
// =============================================================================
// Splits raw text into tokens.
//
// A token is a maximal run of ASCII letters or digits, lowercased. Anything
// else ends the current token: punctuation, whitespace, and also non-ASCII
// letters like 'é'. One pass over the characters, no state kept between calls.
// =============================================================================

// Tokenizes text, left to right
//
// Example:
//   tokenize("Hello, World! 123") -> ["hello", "world", "123"]
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    // Lowercase first: a few non-ASCII characters (the Kelvin sign, for one)
    // lowercase into ASCII letters and then count as part of a token
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }

    // Don't lose a run that reaches the end of the input
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
