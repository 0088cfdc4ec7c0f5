pub mod model;
pub mod processor;

pub use model::{ContentItem, ErrorKind};
pub use processor::process;

use crate::config::Config;
use crate::fetcher::{build_page_client, build_probe_client};
use crate::sink::{BlobStore, DocumentSink};
use crate::summarizer::StopwordLoader;
use std::collections::HashSet;
use std::sync::Arc;

/// Shared, read-only state for every pipeline in a batch.
///
/// Construction is the only batch-fatal path: a stopword set that fails to
/// load or an HTTP client that cannot be built refuses the whole batch up
/// front. After construction nothing here is mutated, so the context is
/// safe to share across all concurrent pipelines without locking.
pub struct PipelineContext {
    pub config: Config,
    pub page_client: reqwest::Client,
    pub probe_client: reqwest::Client,
    pub stopwords: Arc<HashSet<String>>,
    pub sink: DocumentSink,
}

impl PipelineContext {
    pub async fn new(
        config: Config,
        blob_store: Arc<dyn BlobStore>,
        stopword_loader: &dyn StopwordLoader,
        language: &str,
    ) -> anyhow::Result<Self> {
        let stopwords = stopword_loader.load(language).await?;

        let page_client = build_page_client(&config)?;
        let probe_client = build_probe_client(&config)?;

        Ok(Self {
            config,
            page_client,
            probe_client,
            stopwords: Arc::new(stopwords),
            sink: DocumentSink::new(blob_store),
        })
    }
}
