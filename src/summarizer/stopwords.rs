//! Stopword loading.
//!
//! The loader is a boundary trait: production deployments back it with a
//! key-value store, tests and the CLI use the bundled English list. The set
//! is loaded once before any pipeline starts and shared read-only.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Loads the stopword set for a language. A load failure is batch-fatal:
/// ranking quality depends on the set, so we refuse to silently proceed
/// without it.
#[async_trait]
pub trait StopwordLoader: Send + Sync {
    async fn load(&self, language: &str) -> anyhow::Result<HashSet<String>>;
}

/// English stopword list compiled into the binary.
const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cannot", "could", "couldn", "did", "didn", "do", "does", "doesn",
    "doing", "don", "down", "during", "each", "few", "for", "from", "further", "had", "hadn",
    "has", "hasn", "have", "haven", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "isn", "it", "its", "itself", "just",
    "me", "more", "most", "mustn", "my", "myself", "no", "nor", "not", "now", "of", "off", "on",
    "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own",
    "same", "shan", "she", "should", "shouldn", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "wasn", "we", "were", "weren",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "won",
    "would", "wouldn", "you", "your", "yours", "yourself", "yourselves",
];

static ENGLISH_SET: Lazy<HashSet<String>> =
    Lazy::new(|| ENGLISH_STOPWORDS.iter().map(|s| s.to_string()).collect());

/// Loader backed by the compiled-in lists. Only English today.
#[derive(Debug, Default, Clone)]
pub struct BundledStopwords;

#[async_trait]
impl StopwordLoader for BundledStopwords {
    async fn load(&self, language: &str) -> anyhow::Result<HashSet<String>> {
        match language {
            "en" | "english" => Ok(ENGLISH_SET.clone()),
            other => anyhow::bail!("no bundled stopword list for language '{other}'"),
        }
    }
}
