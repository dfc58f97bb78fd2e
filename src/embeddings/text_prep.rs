// text_prep.rs — Embedding input preparation.
//
// Collapses whitespace and truncates on word boundaries so the tokenizer
// sees at most MAX_INPUT_WORDS words. Word-piece tokenization expands words
// into subwords, so the word budget keeps the input inside the model's
// 256-token context.

use crate::config;

/// Normalize a corpus fact or user question for embedding.
///
/// Returns the empty string for whitespace-only input; callers treat that as
/// a degenerate input and skip inference.
pub fn prepare_input(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    truncate_words(&collapsed, config::embedding::MAX_INPUT_WORDS)
}

/// Collapse runs of whitespace (including newlines) into single spaces.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_words` words, preserving word boundaries.
fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        text.trim().to_string()
    } else {
        words[..max_words].join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_input_collapses_whitespace() {
        assert_eq!(prepare_input("  crop \n rotation\t helps  "), "crop rotation helps");
    }

    #[test]
    fn test_prepare_input_empty() {
        assert_eq!(prepare_input(""), "");
        assert_eq!(prepare_input("   \n\t "), "");
    }

    #[test]
    fn test_truncate_words() {
        let text = "one two three four five six seven eight nine ten";
        assert_eq!(truncate_words(text, 5), "one two three four five");
        assert_eq!(truncate_words(text, 100), text);
        assert_eq!(truncate_words("", 5), "");
        assert_eq!(truncate_words(text, 0), "");
    }

    #[test]
    fn test_prepare_input_truncates_long_text() {
        let long = "word ".repeat(500);
        let prepared = prepare_input(&long);
        assert_eq!(
            prepared.split_whitespace().count(),
            crate::config::embedding::MAX_INPUT_WORDS
        );
    }
}
