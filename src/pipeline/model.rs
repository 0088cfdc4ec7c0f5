use serde::{Deserialize, Serialize};

/// Coarse failure taxonomy carried by error content items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    #[serde(rename = "tls_error")]
    Tls,
    #[serde(rename = "client_error")]
    Client,
    UnsupportedContent,
    #[serde(rename = "storage_failure")]
    Storage,
    Unexpected,
}

/// Uniform unit of pipeline output.
///
/// Every input URL produces at least one item; failures become `Error`
/// items rather than aborting the batch, so callers always see the full
/// picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Text {
        summary: String,
        author: String,
        date_published: String,
        internal_links: Vec<String>,
    },
    Image {
        url: String,
    },
    Document {
        url: String,
        stored_url: String,
        note: String,
    },
    Error {
        url: String,
        kind: ErrorKind,
        message: String,
    },
}

impl ContentItem {
    pub fn error(url: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Error {
            url: url.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_serialize_with_type_tag() {
        let item = ContentItem::Image {
            url: "https://example.com/a.png".to_string(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["url"], "https://example.com/a.png");
    }

    #[test]
    fn error_kinds_use_source_taxonomy_names() {
        let json = serde_json::to_value(ErrorKind::Tls).unwrap();
        assert_eq!(json, "tls_error");
        let json = serde_json::to_value(ErrorKind::Storage).unwrap();
        assert_eq!(json, "storage_failure");
        let json = serde_json::to_value(ErrorKind::UnsupportedContent).unwrap();
        assert_eq!(json, "unsupported_content");
    }
}
