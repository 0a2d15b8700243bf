// file: src/similarity/tokenizer.rs
// description: word extraction, stop-word filtering and suffix stemming
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Common English words that carry no weight in similarity.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "this", "that",
    "these", "those", "i", "you", "he", "she", "it", "we", "they", "what", "which", "who",
    "when", "where", "why", "how", "all", "each", "every", "other", "another", "some", "any",
    "no", "not", "only", "just", "more", "most", "very", "too", "so", "than", "then", "there",
    "their", "them", "about", "into", "through", "during", "including", "against", "among",
    "throughout", "despite", "towards", "upon", "concerning", "up",
];

/// Suffixes stripped from words longer than four characters, checked in order.
pub const SUFFIX_RULES: &[&str] = &[
    "ing", "ed", "ly", "er", "est", "tion", "sion", "ness", "ment", "able", "ible",
];

const MIN_SUFFIX_STEM_LEN: usize = 5;
const MIN_PLURAL_STEM_LEN: usize = 4;
const MIN_TOKEN_LEN: usize = 3;

lazy_static! {
    static ref MARKUP_TAG: Regex = Regex::new(r"<[^>]*>").expect("MARKUP_TAG regex is valid");

    // ASCII word boundaries: digits and underscores glue onto letters.
    static ref WORD: Regex = Regex::new(r"(?-u:\b)[a-z]+(?:-[a-z]+)*(?-u:\b)")
        .expect("WORD regex is valid");

    static ref DEFAULT_STOP_WORDS: HashSet<&'static str> = STOP_WORDS.iter().copied().collect();
}

/// Turns free text or markup into normalized tokens.
///
/// The stop-word set and suffix table are borrowed, read-only data; the
/// default tokenizer uses [`STOP_WORDS`] and [`SUFFIX_RULES`].
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    stop_words: &'a HashSet<&'static str>,
    suffixes: &'a [&'static str],
}

impl<'a> Tokenizer<'a> {
    pub fn new(stop_words: &'a HashSet<&'static str>, suffixes: &'a [&'static str]) -> Self {
        Self {
            stop_words,
            suffixes,
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let without_tags = MARKUP_TAG.replace_all(text, " ");
        let lowered = without_tags.to_lowercase();

        WORD.find_iter(&lowered)
            .map(|word| word.as_str())
            .filter(|word| word.len() >= MIN_TOKEN_LEN && !self.stop_words.contains(word))
            .map(|word| self.stem(word))
            .collect()
    }

    /// Applies at most one rule: the first matching suffix, else the plural `s`.
    pub fn stem(&self, word: &str) -> String {
        if word.len() >= MIN_SUFFIX_STEM_LEN
            && let Some(suffix) = self.suffixes.iter().find(|suffix| word.ends_with(*suffix))
        {
            return word[..word.len() - suffix.len()].to_string();
        }

        if word.len() >= MIN_PLURAL_STEM_LEN && word.ends_with('s') && !word.ends_with("ss") {
            return word[..word.len() - 1].to_string();
        }

        word.to_string()
    }
}

impl Default for Tokenizer<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_STOP_WORDS, SUFFIX_RULES)
    }
}

/// Tokenizes with the default stop words and suffix rules.
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::default().tokenize(text)
}

pub fn stem(word: &str) -> String {
    Tokenizer::default().stem(word)
}
