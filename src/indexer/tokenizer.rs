//! Tokenization shared by documents and queries.
//!
//! Tokens are maximal runs of alphanumeric characters, lowercased. Tokens shorter
//! than [`MIN_TOKEN_CHARS`] characters and common English function words are dropped.

use std::str::CharIndices;

pub const MIN_TOKEN_CHARS: usize = 2;

/// Sorted for binary search.
const STOP_WORDS: &[&str] = &[
    "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be", "been",
    "before", "being", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had",
    "has", "have", "he", "her", "here", "him", "his", "how", "if", "in", "into", "is", "it",
    "its", "just", "me", "my", "no", "not", "of", "on", "or", "our", "out", "she", "so", "some",
    "such", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "those", "to", "too", "up", "us", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "why", "will", "with", "would", "you", "your",
];

pub fn is_stop_word(term: &str) -> bool {
    STOP_WORDS.binary_search(&term).is_ok()
}

/// A kept token and the byte range it came from in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    pub start: usize,
    pub end: usize,
}

/// Iterator over the kept tokens of a text.
pub struct Tokens<'a> {
    text: &'a str,
    chars: CharIndices<'a>,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, chars: text.char_indices() }
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let (start, first) = self.chars.by_ref().find(|(_, c)| c.is_alphanumeric())?;
            let mut end = self.text.len();
            let mut term: String = first.to_lowercase().collect();
            let mut char_count = 1;

            for (offset, c) in self.chars.by_ref() {
                if !c.is_alphanumeric() {
                    end = offset;
                    break;
                }
                term.extend(c.to_lowercase());
                char_count += 1;
            }

            if char_count >= MIN_TOKEN_CHARS && !is_stop_word(&term) {
                return Some(Token { term, start, end });
            }
        }
    }
}

/// Tokenize a text into its kept terms, in order.
pub fn tokenize(text: &str) -> Vec<String> {
    Tokens::new(text).map(|t| t.term).collect()
}
