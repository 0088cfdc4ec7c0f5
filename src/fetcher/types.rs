use bytes::Bytes;
use chrono::{DateTime, Utc};
use url::Url;

/// Payload of a successfully fetched response, classified by content type.
///
/// `Unsupported` carries no body; the surrounding `RawPage` keeps the
/// declared content type so the caller can report what was refused.
#[derive(Debug)]
pub enum PageBody {
    Text(String),
    Binary(Bytes),
    Unsupported,
}

/// Result of one page fetch. Owned by a single pipeline; never shared
/// across tasks.
#[derive(Debug)]
pub struct RawPage {
    pub url_final: Url,
    pub content_type: String,
    pub body: PageBody,
    pub fetched_at: DateTime<Utc>,
}

impl RawPage {
    pub fn is_text(&self) -> bool {
        matches!(self.body, PageBody::Text(_))
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.body, PageBody::Binary(_))
    }
}
