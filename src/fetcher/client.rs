use crate::config::Config;
use crate::fetcher::{
    charset::decode_text,
    errors::FetchError,
    types::{PageBody, RawPage},
};
use chrono::Utc;
use rand::seq::SliceRandom;
use reqwest::{Client, ClientBuilder, header};
use tracing::{debug, instrument};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB

/// Rotated per request to look like ordinary browser traffic. This is basic
/// bot-detection avoidance, not a security measure.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:126.0) Gecko/20100101 Firefox/126.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:126.0) Gecko/20100101 Firefox/126.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
];

const ACCEPT_HEADER: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,application/pdf;q=0.8,*/*;q=0.7";

const WORD_OOXML_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Build the HTTP client used for page fetches. Timeouts and the optional
/// upstream proxy come from config; the pool is shared by all concurrent
/// pipelines in a batch.
pub fn build_page_client(config: &Config) -> Result<Client, FetchError> {
    let mut builder = ClientBuilder::new()
        .connect_timeout(config.connect_timeout())
        .read_timeout(config.read_timeout())
        .timeout(config.total_timeout())
        .redirect(reqwest::redirect::Policy::limited(10))
        .default_headers({
            let mut headers = header::HeaderMap::new();
            headers.insert(header::ACCEPT, ACCEPT_HEADER.parse().unwrap());
            headers
        });

    if let Some(proxy_url) = config.proxy_url() {
        let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| FetchError::Io(e.to_string()))?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(|e| FetchError::Io(e.to_string()))
}

/// Build the client used for image existence probes. Much tighter budget
/// than page fetches so a slow image host cannot stall a page pipeline.
pub fn build_probe_client(config: &Config) -> Result<Client, FetchError> {
    let mut builder = ClientBuilder::new()
        .connect_timeout(config.probe_connect_timeout())
        .timeout(config.probe_total_timeout())
        .redirect(reqwest::redirect::Policy::limited(5));

    if let Some(proxy_url) = config.proxy_url() {
        let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| FetchError::Io(e.to_string()))?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(|e| FetchError::Io(e.to_string()))
}

fn pick_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Fetch a single URL and classify the payload by content type.
///
/// `text/*` bodies are decoded to UTF-8 using the declared or sniffed
/// charset; PDF and Word documents come back as raw bytes; anything else
/// returns `PageBody::Unsupported` with the content type preserved so the
/// caller can report it. The response body is fully consumed or dropped on
/// every path, so the connection always returns to the pool.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(client: &Client, url: &str) -> Result<RawPage, FetchError> {
    let parsed_url = url::Url::parse(url)?;

    let response = client
        .get(parsed_url)
        .header(header::USER_AGENT, pick_user_agent())
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    // Check content length before downloading
    if let Some(content_length) = response.content_length()
        && content_length > MAX_BODY_SIZE
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let final_url = response.url().clone();
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Http { status });
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or(&content_type)
        .trim()
        .to_ascii_lowercase();

    // Unsupported types: drop the response without reading the body.
    if !is_text(&mime) && !is_binary_document(&mime) {
        debug!(content_type = %content_type, "unsupported content type");
        return Ok(RawPage {
            url_final: final_url,
            content_type,
            body: PageBody::Unsupported,
            fetched_at: Utc::now(),
        });
    }

    let body_bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Io(e.to_string()))?;

    // Re-check size after download in case Content-Length was missing
    if body_bytes.len() as u64 > MAX_BODY_SIZE {
        return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
    }

    let body = if is_binary_document(&mime) {
        PageBody::Binary(body_bytes)
    } else {
        PageBody::Text(decode_text(&content_type, &body_bytes)?)
    };

    Ok(RawPage {
        url_final: final_url,
        content_type,
        body,
        fetched_at: Utc::now(),
    })
}

fn is_text(mime: &str) -> bool {
    mime.starts_with("text/") || mime == "application/xhtml+xml"
}

fn is_binary_document(mime: &str) -> bool {
    matches!(mime, "application/pdf" | "application/msword") || mime == WORD_OOXML_MIME
}
