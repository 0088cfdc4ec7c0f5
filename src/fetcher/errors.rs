use crate::pipeline::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("dns failure: {0}")]
    Dns(String),

    #[error("tls error: {0}")]
    Tls(String),

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("request timeout")]
    RequestTimeout,

    #[error("too many redirects")]
    RedirectLoop,

    #[error("http error {status}")]
    Http { status: reqwest::StatusCode },

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("charset error: {0}")]
    Charset(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl FetchError {
    /// Collapse the detailed fetch failure into the coarse taxonomy carried
    /// by error content items.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectTimeout | Self::RequestTimeout => ErrorKind::Timeout,
            Self::Tls(_) => ErrorKind::Tls,
            Self::InvalidUrl(_)
            | Self::Dns(_)
            | Self::RedirectLoop
            | Self::Http { .. }
            | Self::BodyTooLarge(_)
            | Self::Io(_) => ErrorKind::Client,
            Self::Charset(_) | Self::Unknown(_) => ErrorKind::Unexpected,
        }
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        let is_tls = source_chain_mentions_tls(&err);

        if err.is_timeout() {
            if err.is_connect() {
                Self::ConnectTimeout
            } else {
                Self::RequestTimeout
            }
        } else if is_tls {
            Self::Tls(err.to_string())
        } else if err.is_redirect() {
            Self::RedirectLoop
        } else if let Some(status) = err.status() {
            Self::Http { status }
        } else if err.is_request() || err.is_connect() {
            // DNS and connection-refused class failures
            Self::Dns(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }
}

/// TLS failures surface at arbitrary depth in the error chain (reqwest
/// wraps hyper, which wraps the TLS backend), so every level must be
/// inspected, not just the first.
fn source_chain_mentions_tls(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = err.source();
    while let Some(source) = current {
        let msg = source.to_string().to_lowercase();
        if msg.contains("tls") || msg.contains("certificate") || msg.contains("handshake") {
            return true;
        }
        current = source.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Layered {
        msg: &'static str,
        source: Option<Box<Layered>>,
    }

    impl Layered {
        fn new(msg: &'static str, source: Option<Layered>) -> Self {
            Self {
                msg,
                source: source.map(Box::new),
            }
        }
    }

    impl fmt::Display for Layered {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.msg)
        }
    }

    impl std::error::Error for Layered {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.source
                .as_deref()
                .map(|s| s as &(dyn std::error::Error + 'static))
        }
    }

    #[test]
    fn tls_is_found_deep_in_the_source_chain() {
        // Mirrors a real rustls failure: the certificate error sits two
        // levels below the client error, behind a plain connect wrapper.
        let err = Layered::new(
            "error sending request",
            Some(Layered::new(
                "client error (Connect)",
                Some(Layered::new(
                    "invalid peer certificate: UnknownIssuer",
                    None,
                )),
            )),
        );
        assert!(source_chain_mentions_tls(&err));
    }

    #[test]
    fn non_tls_chains_are_not_misclassified() {
        let err = Layered::new(
            "error sending request",
            Some(Layered::new(
                "client error (Connect)",
                Some(Layered::new("dns error: no such host", None)),
            )),
        );
        assert!(!source_chain_mentions_tls(&err));
    }

    #[test]
    fn timeout_maps_to_timeout_kind() {
        assert_eq!(FetchError::ConnectTimeout.kind(), ErrorKind::Timeout);
        assert_eq!(FetchError::RequestTimeout.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn transport_failures_map_to_client_kind() {
        assert_eq!(
            FetchError::InvalidUrl(url::ParseError::EmptyHost).kind(),
            ErrorKind::Client
        );
        assert_eq!(FetchError::Dns("no such host".into()).kind(), ErrorKind::Client);
        assert_eq!(
            FetchError::Http {
                status: reqwest::StatusCode::NOT_FOUND
            }
            .kind(),
            ErrorKind::Client
        );
        assert_eq!(FetchError::BodyTooLarge(1 << 24).kind(), ErrorKind::Client);
    }

    #[test]
    fn tls_and_unknown_have_their_own_kinds() {
        assert_eq!(
            FetchError::Tls("handshake failed".into()).kind(),
            ErrorKind::Tls
        );
        assert_eq!(
            FetchError::Unknown("something odd".into()).kind(),
            ErrorKind::Unexpected
        );
    }
}
