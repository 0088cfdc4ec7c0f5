//! Batch orchestration: run the per-URL pipeline over many URLs under a
//! concurrency cap, tolerating per-URL failure.

use crate::fetcher;
use crate::pipeline::{ContentItem, ErrorKind, PipelineContext, process};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{Instrument, error, info_span, instrument};
use url::Url;

/// One unit of batch work: a URL plus the summary-depth flag. Built per
/// input URL and consumed once by its pipeline task.
#[derive(Debug, Clone)]
pub struct FetchJob {
    pub url: String,
    pub want_full_text: bool,
}

/// Per-host connection limiter, created fresh for each batch. Keeps a batch
/// full of same-origin URLs from hammering that origin even when the
/// top-level cap would allow it.
struct HostLimiter {
    semaphores: DashMap<String, Arc<Semaphore>>,
    per_host: usize,
}

impl HostLimiter {
    fn new(per_host: usize) -> Self {
        Self {
            semaphores: DashMap::new(),
            per_host,
        }
    }

    fn for_host(&self, host: &str) -> Arc<Semaphore> {
        self.semaphores
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_host)))
            .clone()
    }
}

/// Fetch and summarize every URL in the batch.
///
/// At most `config.max_concurrency()` pipelines run at once, with a
/// secondary per-host cap. Every URL contributes at least one item;
/// malformed URLs and per-URL failures become error items and never cancel
/// sibling pipelines. Items belonging to one URL stay contiguous; cross-URL
/// order follows completion, not submission.
#[instrument(skip_all, fields(urls = urls.len(), full_text = want_full_text))]
pub async fn run_batch(
    ctx: Arc<PipelineContext>,
    urls: &[String],
    want_full_text: bool,
) -> Vec<ContentItem> {
    let semaphore = Arc::new(Semaphore::new(ctx.config.max_concurrency()));
    let host_limiter = Arc::new(HostLimiter::new(ctx.config.per_host_concurrency()));

    let mut join_set = JoinSet::new();
    let mut task_urls: HashMap<tokio::task::Id, String> = HashMap::new();

    for url in urls {
        let job = FetchJob {
            url: url.clone(),
            want_full_text,
        };
        let ctx = ctx.clone();
        let semaphore = semaphore.clone();
        let host_limiter = host_limiter.clone();

        let span = info_span!("url_pipeline", url = %job.url);
        let handle = join_set.spawn(
            async move {
                // acquire fails only if the semaphore is closed, which
                // never happens while tasks hold clones
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return vec![ContentItem::error(
                        job.url,
                        ErrorKind::Unexpected,
                        "concurrency limiter closed",
                    )];
                };

                // Malformed URLs never reach the host limiter or the
                // network; fetch reports them as typed errors.
                let _host_permit = match Url::parse(&job.url) {
                    Ok(parsed) => match parsed.host_str() {
                        Some(host) => {
                            let host_semaphore = host_limiter.for_host(host);
                            host_semaphore.acquire_owned().await.ok()
                        }
                        None => None,
                    },
                    Err(_) => None,
                };

                let fetched = fetcher::fetch(&ctx.page_client, &job.url).await;
                process(&ctx, &job.url, fetched, job.want_full_text).await
            }
            .instrument(span),
        );
        task_urls.insert(handle.id(), url.clone());
    }

    let mut items = Vec::new();
    while let Some(result) = join_set.join_next().await {
        match result {
            Ok(url_items) => items.extend(url_items),
            Err(join_err) => {
                // A panicked pipeline still owes its URL an item.
                let url = task_urls
                    .get(&join_err.id())
                    .cloned()
                    .unwrap_or_default();
                error!(url = %url, error = %join_err, "url pipeline task failed");
                items.push(ContentItem::error(
                    url,
                    ErrorKind::Unexpected,
                    join_err.to_string(),
                ));
            }
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_limiter_reuses_semaphore_per_host() {
        let limiter = HostLimiter::new(2);
        let a1 = limiter.for_host("example.com");
        let a2 = limiter.for_host("example.com");
        let b = limiter.for_host("other.com");
        assert!(Arc::ptr_eq(&a1, &a2));
        assert!(!Arc::ptr_eq(&a1, &b));
        assert_eq!(a1.available_permits(), 2);
    }
}
