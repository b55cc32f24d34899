//! Tokenization for feature hashing.

/// Tokenize text into lowercase words.
///
/// Filters out:
/// - Stop words (common English words)
/// - Single character tokens
/// - Numbers
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.chars().count() > 1)
        .filter(|s| !is_stop_word(s))
        .filter(|s| !s.chars().all(|c| c.is_numeric()))
        .map(String::from)
        .collect()
}

/// Check if a word is a stop word.
fn is_stop_word(word: &str) -> bool {
    const STOP_WORDS: &[&str] = &[
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "or", "that", "the", "to", "was", "were", "will", "with", "this",
        "they", "but", "have", "had", "what", "when", "where", "who", "which", "why", "how", "all",
        "each", "every", "both", "few", "more", "most", "other", "some", "such", "no", "nor",
        "not", "only", "own", "same", "so", "than", "too", "very", "can", "just", "should", "now",
        "also", "been", "being", "do", "does", "did", "doing", "would", "could", "might", "must",
        "shall", "about", "above", "after", "before", "into", "through", "out", "over", "under",
        "up", "down", "then", "once", "here", "there", "if", "else", "while", "because", "until",
        "we", "you", "your", "our", "their", "him", "her", "them", "me", "my", "those", "these",
        "his", "let", "please", "thanks", "ok", "okay",
    ];

    STOP_WORDS.contains(&word)
}
