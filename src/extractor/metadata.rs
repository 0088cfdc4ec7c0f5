//! Page metadata: author, publication date, and same-host links.

use scraper::{Html, Selector};
use url::Url;

const UNKNOWN: &str = "Unknown";

/// Author from known metadata fields, `"Unknown"` when absent.
pub fn extract_author(document: &Html) -> String {
    meta_content(
        document,
        &[
            "meta[name='author']",
            "meta[property='article:author']",
            "meta[name='twitter:creator']",
        ],
    )
    .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Publication date from known metadata fields, `"Unknown"` when absent.
pub fn extract_date_published(document: &Html) -> String {
    meta_content(
        document,
        &[
            "meta[property='article:published_time']",
            "meta[name='date']",
            "meta[name='dc.date']",
            "meta[itemprop='datePublished']",
        ],
    )
    .unwrap_or_else(|| UNKNOWN.to_string())
}

fn meta_content(document: &Html, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next()
            && let Some(content) = element.value().attr("content")
        {
            let content = content.trim();
            if !content.is_empty() {
                return Some(content.to_string());
            }
        }
    }
    None
}

/// Anchor hrefs resolved against the base URL and filtered to the same
/// host, deduplicated in document order. Fragments are stripped, and links
/// that resolve back to the page itself (fragment-only hrefs like `#top`)
/// are dropped.
pub fn extract_internal_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut self_url = base_url.clone();
    self_url.set_fragment(None);

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(mut resolved) = base_url.join(href) else {
            continue;
        };
        resolved.set_fragment(None);
        if resolved.host_str() != base_url.host_str() || resolved == self_url {
            continue;
        }
        let link = resolved.to_string();
        if !links.contains(&link) {
            links.push(link);
        }
    }
    links
}
