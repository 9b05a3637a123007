//! Canned suggestion provider
//!
//! Completes a handful of known words and answers everything else with a
//! generic ellipsis. Used offline and in tests.

use super::{MIN_CONTEXT_CHARS, SuggestionContext, below_floor};

/// Fallback shown for words without a canned completion
pub const GENERIC_FILLER: &str = "…";

const CANNED: &[(&str, &str)] = &[
    ("hello", " world"),
    ("intro", "duction"),
    ("exam", "ple"),
    ("write", " more details"),
];

#[derive(Debug, Clone)]
pub struct CannedProvider {
    min_chars: usize,
}

impl CannedProvider {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    pub fn suggest(&self, context: &SuggestionContext) -> String {
        let text = &context.text_before_cursor;
        if below_floor(text, self.min_chars) {
            return String::new();
        }

        let last_word = text.split_whitespace().last().unwrap_or("");
        if last_word.chars().count() < self.min_chars {
            return String::new();
        }

        let key = last_word.to_lowercase();
        CANNED
            .iter()
            .find(|(word, _)| *word == key)
            .map(|(_, completion)| completion.to_string())
            .unwrap_or_else(|| GENERIC_FILLER.to_string())
    }
}

impl Default for CannedProvider {
    fn default() -> Self {
        Self::new(MIN_CONTEXT_CHARS)
    }
}
