//! Concurrent web-content retrieval and extractive summarization.
//!
//! Given a batch of URLs, fetch each under a concurrency cap, classify the
//! payload, extract and clean text, produce a deterministic extractive
//! summary or a stored-document pointer, harvest qualifying images, and
//! return a uniform list of content items. Per-URL failures become error
//! items; they never abort the batch.

pub mod batch;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod images;
pub mod pipeline;
pub mod sink;
pub mod summarizer;

pub use batch::{FetchJob, run_batch};
pub use config::Config;
pub use pipeline::{ContentItem, ErrorKind, PipelineContext};
pub use sink::{BlobStore, DocumentSink, MemoryBlobStore};
pub use summarizer::{BundledStopwords, StopwordLoader};
