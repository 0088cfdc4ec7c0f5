//! Per-page composition: turn one fetch result into content items.

use crate::extractor::{self, metadata};
use crate::fetcher::{FetchError, PageBody, RawPage};
use crate::images::{self, ImageCandidate};
use crate::pipeline::{ContentItem, ErrorKind, PipelineContext};
use crate::summarizer::{self, FULL_TEXT_SENTENCES, SUMMARY_SENTENCES};
use scraper::Html;
use tracing::{instrument, warn};
use url::Url;

/// Everything the page processor needs from the parsed document, owned.
///
/// `scraper::Html` is not `Send`, so all document work happens in one
/// synchronous pass and only owned data crosses await points.
struct ParsedPage {
    text: String,
    author: String,
    date_published: String,
    internal_links: Vec<String>,
    image_candidates: Vec<ImageCandidate>,
}

fn parse_page(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);
    ParsedPage {
        text: extractor::extract_text(&document, extractor::DEFAULT_CONTENT_SELECTORS),
        author: metadata::extract_author(&document),
        date_published: metadata::extract_date_published(&document),
        internal_links: metadata::extract_internal_links(&document, base_url),
        image_candidates: images::discover_candidates(&document, base_url),
    }
}

/// Process one fetched page into its content items.
///
/// A fetch error becomes exactly one error item. A binary document goes to
/// the sink. A text page yields one text item followed by zero or more
/// image items. An unsupported content type yields one error item. This
/// function never returns an empty list.
#[instrument(skip_all, fields(url = %url))]
pub async fn process(
    ctx: &PipelineContext,
    url: &str,
    fetched: Result<RawPage, FetchError>,
    want_full_text: bool,
) -> Vec<ContentItem> {
    let page = match fetched {
        Ok(page) => page,
        Err(e) => {
            return vec![ContentItem::error(url, e.kind(), e.to_string())];
        }
    };

    match page.body {
        PageBody::Unsupported => {
            vec![ContentItem::error(
                url,
                ErrorKind::UnsupportedContent,
                format!("unsupported content type: {}", page.content_type),
            )]
        }
        PageBody::Binary(bytes) => {
            match ctx.sink.store(bytes, &page.content_type).await {
                Ok(stored_url) => vec![ContentItem::Document {
                    url: url.to_string(),
                    stored_url,
                    note: format!("stored document ({})", page.content_type),
                }],
                Err(e) => {
                    warn!(error = %e, "document storage failed");
                    vec![ContentItem::error(url, ErrorKind::Storage, e.to_string())]
                }
            }
        }
        PageBody::Text(html) => {
            let parsed = parse_page(&html, &page.url_final);
            let normalized = extractor::clean(&parsed.text);

            let cap = if want_full_text {
                FULL_TEXT_SENTENCES
            } else {
                SUMMARY_SENTENCES
            };
            // Ranking failure degrades to the unsummarized text rather than
            // losing the page.
            let summary = match summarizer::rank(&normalized, &ctx.stopwords, cap) {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(error = %e, "summarization failed, returning unsummarized text");
                    normalized.clone()
                }
            };

            let mut items = vec![ContentItem::Text {
                summary,
                author: parsed.author,
                date_published: parsed.date_published,
                internal_links: parsed.internal_links,
            }];

            let accepted = images::probe_candidates(
                &ctx.probe_client,
                parsed.image_candidates,
                ctx.config.probe_concurrency(),
            )
            .await;
            items.extend(accepted.into_iter().map(|image_url| ContentItem::Image {
                url: image_url.to_string(),
            }));

            items
        }
    }
}
