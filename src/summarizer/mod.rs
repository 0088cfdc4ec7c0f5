//! Extractive summarization by word-frequency sentence ranking.
//!
//! The algorithm is deliberately simple and fully deterministic: score each
//! sentence by the summed corpus frequency of its words, keep the highest
//! scoring sentences, and emit them in rank order. Determinism matters
//! because summaries feed a conversational layer that may re-request the
//! same page.

pub mod stopwords;

pub use stopwords::{BundledStopwords, StopwordLoader};

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use thiserror::Error;

/// Sentences with this many whitespace-separated tokens or more are
/// excluded from scoring entirely, not truncated.
pub const MAX_SENTENCE_TOKENS: usize = 30;

/// Sentence cap for the default (non-full-text) summary.
pub const SUMMARY_SENTENCES: usize = 50;

/// Sentence cap when the caller asks for full text.
pub const FULL_TEXT_SENTENCES: usize = 150;

static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Alphabetic}+").unwrap());

static SENTENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]*").unwrap());

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("sentence cap must be at least 1, got {0}")]
    InvalidCap(usize),
}

/// Produce an extractive summary of at most `max_sentences` sentences.
///
/// Scoring: case-folded alphabetic tokens not in `stopwords` build a
/// frequency map; each sentence scores the sum of map values for its words
/// (occurrences count every time, unknown words count zero). Overlong
/// sentences are dropped from consideration. Ties keep original sentence
/// order. Empty input yields an empty summary.
pub fn rank(
    text: &str,
    stopwords: &HashSet<String>,
    max_sentences: usize,
) -> Result<String, SummarizeError> {
    if max_sentences == 0 {
        return Err(SummarizeError::InvalidCap(max_sentences));
    }
    if text.trim().is_empty() {
        return Ok(String::new());
    }

    let frequencies = word_frequencies(text, stopwords);
    let sentences = split_sentences(text);

    let mut scored: Vec<(usize, &str)> = Vec::new();
    for sentence in &sentences {
        if sentence.split_whitespace().count() >= MAX_SENTENCE_TOKENS {
            continue;
        }
        let score: usize = words(sentence)
            .map(|word| frequencies.get(&word).copied().unwrap_or(0))
            .sum();
        scored.push((score, sentence.as_str()));
    }

    // sort_by is stable, so equal scores keep first-encountered order
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let summary: Vec<String> = scored
        .into_iter()
        .take(max_sentences)
        .map(|(_, sentence)| {
            if sentence.ends_with('.') {
                sentence.to_string()
            } else {
                format!("{sentence}.")
            }
        })
        .collect();

    Ok(summary.join(" "))
}

fn word_frequencies(text: &str, stopwords: &HashSet<String>) -> HashMap<String, usize> {
    let mut frequencies = HashMap::new();
    for word in words(text) {
        if stopwords.contains(&word) {
            continue;
        }
        *frequencies.entry(word).or_insert(0) += 1;
    }
    frequencies
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
}

fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_REGEX
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
