//! Charset detection and decoding for text responses.
//!
//! Detection order: Content-Type header, `<meta charset>`, `<meta
//! http-equiv>`, then a chardetng guess over the first 4KB. Decoding
//! failures surface as `FetchError::Charset` rather than lossy output.

use crate::fetcher::errors::FetchError;
use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Decode a text response body to UTF-8 using the declared or sniffed
/// charset, falling back to UTF-8 when nothing is declared.
pub fn decode_text(content_type: &str, body_bytes: &[u8]) -> Result<String, FetchError> {
    let encoding = detect_encoding(content_type, body_bytes);

    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);
    if had_errors {
        return Err(FetchError::Charset(format!(
            "failed to decode content with encoding: {}",
            encoding.name()
        )));
    }

    Ok(decoded.into_owned())
}

fn detect_encoding(content_type: &str, body_bytes: &[u8]) -> &'static Encoding {
    // 1. Content-Type header charset parameter
    if let Some(encoding) = encoding_from_capture(&CHARSET_REGEX, content_type) {
        return encoding;
    }

    // 2. <meta> declarations in the first 4KB
    let search_bytes = &body_bytes[..body_bytes.len().min(4096)];
    let search_str = String::from_utf8_lossy(search_bytes);

    if let Some(encoding) = encoding_from_capture(&META_CHARSET_REGEX, &search_str) {
        return encoding;
    }
    if let Some(encoding) = encoding_from_capture(&META_HTTP_EQUIV_REGEX, &search_str) {
        return encoding;
    }

    // 3. Heuristic detection; chardetng defaults toward UTF-8 for ASCII
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, false);
    detector.guess(None, true)
}

fn encoding_from_capture(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let captures = regex.captures(haystack)?;
    let label = captures.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}
