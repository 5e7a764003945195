//! Question normalization ahead of template matching.
//!
//! Templates match whole words, so the question is reduced to a canonical
//! word sequence first: lowercased, split on whitespace, punctuation trimmed
//! off both ends of every word, and filler words dropped.
//!
//! ```text
//! "Can I   have  a bag, please?"  →  ["can", "i", "have", "bag"]
//! ```

/// Words that never carry meaning in a question.
const FILLER_WORDS: &[&str] = &["please", "a", "an", "the"];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split a question into normalized words.
///
/// Words made only of punctuation disappear entirely.
pub fn tokenize(question: &str) -> Vec<String> {
    question
        .to_lowercase()
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !is_word_char(c)))
        .filter(|word| !word.is_empty() && !FILLER_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Normalize a question into a single space-separated string.
pub fn preprocess(question: &str) -> String {
    tokenize(question).join(" ")
}
