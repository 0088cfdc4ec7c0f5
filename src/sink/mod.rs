//! Persistence for non-text payloads (PDF / Word documents).
//!
//! The actual object store lives behind the `BlobStore` trait; the sink
//! only derives a key and forwards the bytes. `MemoryBlobStore` backs the
//! CLI and tests.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

/// Object storage boundary. Implementations must be safe for concurrent
/// use; the sink is shared by all pipelines in a batch.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store the bytes under the suggested key and return a publicly
    /// addressable URL.
    async fn put(
        &self,
        content: Bytes,
        suggested_key: &str,
        content_type: &str,
    ) -> anyhow::Result<String>;
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("blob store write failed: {0}")]
    Store(#[from] anyhow::Error),
}

/// Derives object keys and writes documents through a `BlobStore`.
pub struct DocumentSink {
    store: Arc<dyn BlobStore>,
}

impl DocumentSink {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Persist a binary document and return its stored URL. The key embeds
    /// a timestamp and a random component so concurrent stores of the same
    /// document never collide.
    #[instrument(skip_all, fields(content_type = %content_type, bytes = content.len()))]
    pub async fn store(&self, content: Bytes, content_type: &str) -> Result<String, SinkError> {
        let key = object_key(content_type);
        let url = self.store.put(content, &key, content_type).await?;
        Ok(url)
    }
}

fn object_key(content_type: &str) -> String {
    let timestamp = Utc::now().format("%Y%m%dT%H%M%S");
    let id = Uuid::new_v4();
    format!("documents/{timestamp}-{id}.{}", extension_for(content_type))
}

fn extension_for(content_type: &str) -> &'static str {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    match mime {
        "application/pdf" => "pdf",
        "application/msword" => "doc",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        _ => "bin",
    }
}

/// In-memory blob store for tests and the demo CLI. Keys map to the bytes
/// written; URLs are `{base_url}/{key}`.
pub struct MemoryBlobStore {
    base_url: String,
    objects: DashMap<String, Bytes>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        content: Bytes,
        suggested_key: &str,
        _content_type: &str,
    ) -> anyhow::Result<String> {
        self.objects.insert(suggested_key.to_string(), content);
        Ok(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            suggested_key
        ))
    }
}

/// Blob store that always fails. Lets tests exercise the storage-failure
/// path of the page processor.
pub struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn put(&self, _: Bytes, _: &str, _: &str) -> anyhow::Result<String> {
        anyhow::bail!("blob store unavailable")
    }
}
