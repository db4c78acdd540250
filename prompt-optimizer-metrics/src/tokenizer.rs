//! Lexical helpers shared by the metric calculators.
//!
//! Everything here operates on whitespace-separated words; there is no
//! language-aware segmentation.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Words ignored when measuring how much of a prompt a response covers.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "should", "could", "can", "may", "might", "must", "to",
    "of", "in", "on", "at", "for", "with", "about", "as", "by", "from", "and", "or", "but", "not",
    "me", "my", "i", "you", "your", "it", "its", "this", "that", "please",
];

static SENTENCE_TERMINATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence terminator pattern is valid"));

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\r?\n").expect("paragraph break pattern is valid"));

/// Lowercased words with leading and trailing punctuation removed.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

pub fn word_count(text: &str) -> usize {
    tokenize(text).len()
}

pub fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

/// Distinct tokens of `text` that are not stopwords.
pub fn content_tokens(text: &str) -> BTreeSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| !is_stopword(token))
        .collect()
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Whether `phrase` (one or more words) occurs as a contiguous run of tokens.
pub fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
    let needle = tokenize(phrase);
    if needle.is_empty() || needle.len() > tokens.len() {
        return false;
    }

    tokens
        .windows(needle.len())
        .any(|window| window == needle.as_slice())
}

/// A sentence-like segment of text, split on runs of `.`, `!` or `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub terminated: bool,
}

impl Sentence<'_> {
    /// First alphabetic character, if the segment has one.
    pub fn initial_letter(&self) -> Option<char> {
        self.text.chars().find(|c| c.is_alphabetic())
    }
}

/// Segments containing at least one letter. The final segment is
/// unterminated unless the text ends with punctuation.
pub fn sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut result = Vec::new();
    let mut start = 0;

    for terminator in SENTENCE_TERMINATOR.find_iter(text) {
        push_sentence(&mut result, &text[start..terminator.start()], true);
        start = terminator.end();
    }
    push_sentence(&mut result, &text[start..], false);

    result
}

fn push_sentence<'a>(sentences: &mut Vec<Sentence<'a>>, segment: &'a str, terminated: bool) {
    let trimmed = segment.trim();
    if trimmed.chars().any(|c| c.is_alphabetic()) {
        sentences.push(Sentence {
            text: trimmed,
            terminated,
        });
    }
}

/// Non-empty blocks separated by at least one blank line.
pub fn paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}
