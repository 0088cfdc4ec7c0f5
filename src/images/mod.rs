//! Image harvesting: discover candidate images in article-like containers,
//! probe each for existence and size, and keep only substantial ones.
//!
//! Probes are best-effort. Any probe failure silently drops the candidate;
//! nothing here can fail the enclosing page pipeline.

use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, instrument};
use url::Url;

/// Accept only images whose declared length is strictly greater than this
/// (bytes). Anything smaller is treated as chrome, not content.
pub const MIN_IMAGE_BYTES: u64 = 10240;

/// Only images nested in article-like containers are candidates; naked
/// `<img>` tags are usually chrome (logos, trackers, ads).
const IMAGE_SELECTOR: &str = "article img, figure img, section img";

/// Candidate image URL discovered in a parsed page. Transient; discarded
/// after the accept/reject decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub url: Url,
}

/// Collect candidate image URLs from the document: scoped to article-like
/// containers, `data:` URIs rejected outright, relative sources resolved
/// against the base URL, deduplicated in document order.
pub fn discover_candidates(document: &Html, base_url: &Url) -> Vec<ImageCandidate> {
    let Ok(selector) = Selector::parse(IMAGE_SELECTOR) else {
        return Vec::new();
    };

    let mut candidates: Vec<ImageCandidate> = Vec::new();
    for element in document.select(&selector) {
        let Some(src) = element.value().attr("src") else {
            continue;
        };
        let src = src.trim();
        if src.is_empty() || src.starts_with("data:") {
            continue;
        }
        let Ok(resolved) = base_url.join(src) else {
            continue;
        };
        if candidates.iter().all(|c| c.url != resolved) {
            candidates.push(ImageCandidate { url: resolved });
        }
    }
    candidates
}

/// Probe candidates with bounded concurrency and return the accepted image
/// URLs in discovery order.
///
/// A candidate is accepted when a HEAD request succeeds and declares a
/// content length strictly greater than [`MIN_IMAGE_BYTES`]. Everything
/// else (timeouts, error statuses, missing lengths) is dropped without an
/// error item: this is a filter, not a failure path.
#[instrument(skip_all, fields(candidates = candidates.len()))]
pub async fn probe_candidates(
    client: &Client,
    candidates: Vec<ImageCandidate>,
    probe_concurrency: usize,
) -> Vec<Url> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let semaphore = Arc::new(Semaphore::new(probe_concurrency.max(1)));
    let mut join_set = JoinSet::new();

    for (index, candidate) in candidates.into_iter().enumerate() {
        let client = client.clone();
        let semaphore = semaphore.clone();
        join_set.spawn(async move {
            // closed only if the semaphore is dropped, which cannot happen
            // while this task holds a clone
            let Ok(_permit) = semaphore.acquire().await else {
                return (index, None);
            };
            let accepted = probe_one(&client, &candidate.url).await;
            (index, accepted.then_some(candidate.url))
        });
    }

    let mut accepted: Vec<(usize, Url)> = Vec::new();
    while let Some(result) = join_set.join_next().await {
        if let Ok((index, Some(url))) = result {
            accepted.push((index, url));
        }
    }

    // probes complete in arbitrary order; restore discovery order
    accepted.sort_by_key(|(index, _)| *index);
    accepted.into_iter().map(|(_, url)| url).collect()
}

async fn probe_one(client: &Client, url: &Url) -> bool {
    let response = match client.head(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(url = %url, error = %e, "image probe failed");
            return false;
        }
    };

    if !response.status().is_success() {
        return false;
    }

    // Declared length from the header; HEAD responses carry no body, so
    // the header is the only honest signal.
    let declared_length = response
        .headers()
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok());

    match declared_length {
        Some(length) => length > MIN_IMAGE_BYTES,
        None => false,
    }
}
