//! Visible-text extraction over a configurable list of content-bearing
//! elements.

use scraper::{ElementRef, Html, Selector};

/// Elements treated as content-bearing. This is a configuration list, not a
/// parser detail: swapping it changes what counts as visible text.
pub const DEFAULT_CONTENT_SELECTORS: &str =
    "p, li, h1, h2, h3, h4, h5, h6, blockquote, pre, td, th, summary, details, div, span, a";

/// Elements whose text is never visible, even when nested inside a
/// content-bearing element.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Concatenate the visible text of all content-bearing elements in document
/// order, one chunk per element, separated by spaces.
///
/// Each matched element contributes its own text nodes plus the text of
/// unmatched inline descendants (`em`, `strong`, `code`, ...). Descendants
/// that match the selector list themselves are skipped here and contribute
/// their own chunk, so nested containers never multiply their text.
pub fn extract_text(document: &Html, selectors: &str) -> String {
    let Ok(selector) = Selector::parse(selectors) else {
        return String::new();
    };

    let mut chunks: Vec<String> = Vec::new();
    for element in document.select(&selector) {
        let mut parts: Vec<String> = Vec::new();
        collect_visible_text(element, &selector, &mut parts);
        if !parts.is_empty() {
            chunks.push(parts.join(" "));
        }
    }

    chunks.join(" ")
}

fn collect_visible_text(element: ElementRef<'_>, selector: &Selector, parts: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
            continue;
        }
        let Some(child_element) = ElementRef::wrap(child) else {
            continue;
        };
        if INVISIBLE_TAGS.contains(&child_element.value().name()) {
            continue;
        }
        if selector.matches(&child_element) {
            continue;
        }
        collect_visible_text(child_element, selector, parts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_paragraphs_and_headings_in_order() {
        let html = Html::parse_document(
            "<html><body><h1>Title</h1><p>First paragraph.</p><p>Second paragraph.</p></body></html>",
        );
        let text = extract_text(&html, DEFAULT_CONTENT_SELECTORS);
        assert_eq!(text, "Title First paragraph. Second paragraph.");
    }

    #[test]
    fn inline_markup_text_is_kept() {
        let html = Html::parse_document(
            "<html><body><p>Hello <em>brave</em> world!</p><p>Read the <strong>bold</strong> and <code>plain</code> parts.</p></body></html>",
        );
        let text = extract_text(&html, DEFAULT_CONTENT_SELECTORS);
        assert_eq!(text, "Hello brave world! Read the bold and plain parts.");
    }

    #[test]
    fn skips_script_and_style_content() {
        let html = Html::parse_document(
            "<html><body><p>Visible</p><script>var hidden = 1;</script><style>p{}</style></body></html>",
        );
        let text = extract_text(&html, DEFAULT_CONTENT_SELECTORS);
        assert_eq!(text, "Visible");
    }

    #[test]
    fn scripts_inside_containers_stay_invisible() {
        let html = Html::parse_document(
            "<html><body><div>Before <script>var x = 1;</script> after</div></body></html>",
        );
        let text = extract_text(&html, DEFAULT_CONTENT_SELECTORS);
        assert_eq!(text, "Before after");
    }

    #[test]
    fn nested_containers_do_not_duplicate_text() {
        let html = Html::parse_document(
            "<html><body><div><p>Once only.</p></div></body></html>",
        );
        let text = extract_text(&html, DEFAULT_CONTENT_SELECTORS);
        assert_eq!(text, "Once only.");
    }

    #[test]
    fn anchors_inside_paragraphs_count_once() {
        let html = Html::parse_document(
            r#"<html><body><p>See the <a href="/docs">documentation</a> for details.</p></body></html>"#,
        );
        let text = extract_text(&html, DEFAULT_CONTENT_SELECTORS);
        assert_eq!(text, "See the for details. documentation");
    }

    #[test]
    fn table_cells_and_list_items_are_content() {
        let html = Html::parse_document(
            "<html><body><table><tr><th>Name</th><td>Value</td></tr></table><ul><li>Item</li></ul></body></html>",
        );
        let text = extract_text(&html, DEFAULT_CONTENT_SELECTORS);
        assert!(text.contains("Name"));
        assert!(text.contains("Value"));
        assert!(text.contains("Item"));
    }
}
