//! HTML content extraction
//!
//! This module turns a fetched page body into a [`PageRecord`]:
//! - Title (text of the first `<h1>`)
//! - Summary paragraph (first `<p>`, preferring one inside `<main>`)
//! - Outgoing links (from `<a href>` tags)
//! - Image URLs (root-relative `<img src>` only)

use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, HashSet};
use url::Url;

/// Extracted data for one successfully fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRecord {
    /// The URL the page was fetched from
    pub page_url: String,

    /// Text of the first `<h1>`, empty if absent
    pub title: String,

    /// Text of the first paragraph, empty if absent
    pub first_paragraph: String,

    /// Absolute outgoing link URLs, unique, in document order
    pub outgoing_links: Vec<String>,

    /// Absolute image URLs, unique, in document order
    pub image_urls: Vec<String>,
}

/// Recorded pages keyed by normalized URL
pub type PageResults = BTreeMap<String, PageRecord>;

/// Extracts all page data from an HTML body
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the content was fetched from, used to resolve links
///
/// # Example
///
/// ```
/// use scrappy::crawler::extract_page_data;
///
/// let html = r#"<html><body><h1>Test</h1><a href="/page">Link</a></body></html>"#;
/// let page = extract_page_data(html, "https://example.com");
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.outgoing_links, vec!["https://example.com/page"]);
/// ```
pub fn extract_page_data(html: &str, page_url: &str) -> PageRecord {
    let document = Html::parse_document(html);
    let base_url = Url::parse(page_url).ok();

    PageRecord {
        page_url: page_url.to_string(),
        title: extract_h1(&document),
        first_paragraph: extract_first_paragraph(&document),
        outgoing_links: base_url
            .as_ref()
            .map(|base| extract_links(&document, base))
            .unwrap_or_default(),
        image_urls: base_url
            .as_ref()
            .map(|base| extract_images(&document, base))
            .unwrap_or_default(),
    }
}

/// Returns the text of the first `<h1>`, including nested elements
pub fn get_h1_from_html(html: &str) -> String {
    extract_h1(&Html::parse_document(html))
}

/// Returns the text of the first paragraph
///
/// When the document has a `<main>` element only paragraphs inside it are
/// considered, so a `<main>` without any `<p>` yields an empty string.
pub fn get_first_paragraph_from_html(html: &str) -> String {
    extract_first_paragraph(&Html::parse_document(html))
}

/// Returns the outgoing link URLs of a page
///
/// Returns an empty list if `page_url` cannot be parsed.
pub fn get_urls_from_html(html: &str, page_url: &str) -> Vec<String> {
    match Url::parse(page_url) {
        Ok(base) => extract_links(&Html::parse_document(html), &base),
        Err(_) => Vec::new(),
    }
}

/// Returns the root-relative image URLs of a page, resolved against `page_url`
pub fn get_images_from_html(html: &str, page_url: &str) -> Vec<String> {
    match Url::parse(page_url) {
        Ok(base) => extract_images(&Html::parse_document(html), &base),
        Err(_) => Vec::new(),
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn extract_h1(document: &Html) -> String {
    selector("h1")
        .and_then(|h1| document.select(&h1).next().map(element_text))
        .unwrap_or_default()
}

fn extract_first_paragraph(document: &Html) -> String {
    let (Some(main), Some(p)) = (selector("main"), selector("p")) else {
        return String::new();
    };

    let first = match document.select(&main).next() {
        Some(main_element) => main_element.select(&p).next(),
        None => document.select(&p).next(),
    };

    first.map(element_text).unwrap_or_default()
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Some(a_selector) = selector("a[href]") else {
        return Vec::new();
    };

    let hrefs = document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url));

    dedupe(hrefs)
}

fn extract_images(document: &Html, base_url: &Url) -> Vec<String> {
    let Some(img_selector) = selector("img[src]") else {
        return Vec::new();
    };

    let sources = document
        .select(&img_selector)
        .filter_map(|element| element.value().attr("src"))
        .map(str::trim)
        .filter(|src| src.starts_with('/') && !src.starts_with("//"))
        .filter_map(|src| base_url.join(src).ok())
        .map(String::from);

    dedupe(sources)
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs and fragment-only anchors
/// - javascript:, mailto:, tel: and data: schemes
/// - hrefs that do not resolve to an HTTP(S) URL
///
/// Absolute hrefs are kept as written; relative ones are joined to the page URL.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    match Url::parse(href) {
        Ok(absolute) => is_http(&absolute).then(|| href.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => base_url
            .join(href)
            .ok()
            .filter(is_http)
            .map(String::from),
        Err(_) => None,
    }
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

fn dedupe(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h1_basic() {
        let html = "<html><body><h1>Test Title</h1></body></html>";
        assert_eq!(get_h1_from_html(html), "Test Title");
    }

    #[test]
    fn test_h1_first_of_many() {
        let html = "<html><body><h1>First Title</h1><h1>Second Title</h1></body></html>";
        assert_eq!(get_h1_from_html(html), "First Title");
    }

    #[test]
    fn test_h1_nested() {
        let html = "<html><body><h1>Title <span>with nested</span> elements</h1></body></html>";
        assert_eq!(get_h1_from_html(html), "Title with nested elements");
    }

    #[test]
    fn test_h1_missing() {
        assert_eq!(get_h1_from_html("<html><body><p>x</p></body></html>"), "");
    }

    #[test]
    fn test_first_paragraph_main_priority() {
        let html = r#"<html><body>
            <p>Outside paragraph.</p>
            <main>
                <p>Main paragraph.</p>
            </main>
        </body></html>"#;
        assert_eq!(get_first_paragraph_from_html(html), "Main paragraph.");
    }

    #[test]
    fn test_first_paragraph_no_main() {
        let html = "<html><body><p>Only paragraph</p></body></html>";
        assert_eq!(get_first_paragraph_from_html(html), "Only paragraph");
    }

    #[test]
    fn test_first_paragraph_nested_in_main() {
        let html = r#"<html><body>
            <main>
                <div><p>Nested paragraph</p></div>
                <p>Second paragraph</p>
            </main>
        </body></html>"#;
        assert_eq!(get_first_paragraph_from_html(html), "Nested paragraph");
    }

    #[test]
    fn test_first_paragraph_main_without_p() {
        let html = "<html><body><p>Outside</p><main><div>No paragraphs</div></main></body></html>";
        assert_eq!(get_first_paragraph_from_html(html), "");
    }

    #[test]
    fn test_urls_absolute_kept_as_written() {
        let html = r#"<html><body><a href="https://blog.boot.dev"><span>Boot.dev</span></a></body></html>"#;
        assert_eq!(
            get_urls_from_html(html, "https://blog.boot.dev"),
            vec!["https://blog.boot.dev"]
        );
    }

    #[test]
    fn test_urls_root_relative() {
        let html = r#"<html><body><a href="/path"><span>Path</span></a></body></html>"#;
        assert_eq!(
            get_urls_from_html(html, "https://blog.boot.dev"),
            vec!["https://blog.boot.dev/path"]
        );
    }

    #[test]
    fn test_urls_mixed_order_preserved() {
        let html = r#"<html><body>
            <a href="/path1">Path1</a>
            <a href="https://example.com">External</a>
            <a href="/path2">Path2</a>
        </body></html>"#;
        assert_eq!(
            get_urls_from_html(html, "https://blog.boot.dev"),
            vec![
                "https://blog.boot.dev/path1",
                "https://example.com",
                "https://blog.boot.dev/path2",
            ]
        );
    }

    #[test]
    fn test_urls_deduplicated() {
        let html = r#"<a href="/a">1</a><a href="/b">2</a><a href="/a">3</a>"#;
        assert_eq!(
            get_urls_from_html(html, "https://a.test"),
            vec!["https://a.test/a", "https://a.test/b"]
        );
    }

    #[test]
    fn test_urls_skip_special_schemes() {
        let html = r##"
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+1234567890">Phone</a>
            <a href="data:text/plain,hi">Data</a>
            <a href="#top">Anchor</a>
            <a href="">Empty</a>
            <a href="/valid">Valid</a>
        "##;
        assert_eq!(
            get_urls_from_html(html, "https://a.test/"),
            vec!["https://a.test/valid"]
        );
    }

    #[test]
    fn test_urls_relative_path_and_port() {
        let html = r#"<a href="sibling">S</a><a href="/root">R</a>"#;
        assert_eq!(
            get_urls_from_html(html, "http://127.0.0.1:8080/dir/page"),
            vec!["http://127.0.0.1:8080/dir/sibling", "http://127.0.0.1:8080/root"]
        );
    }

    #[test]
    fn test_urls_unparsable_page_url() {
        assert!(get_urls_from_html(r#"<a href="/x">x</a>"#, "not a url").is_empty());
    }

    #[test]
    fn test_images_relative() {
        let html = r#"<html><body><img src="/logo.png" alt="Logo"></body></html>"#;
        assert_eq!(
            get_images_from_html(html, "https://blog.boot.dev"),
            vec!["https://blog.boot.dev/logo.png"]
        );
    }

    #[test]
    fn test_images_external_excluded() {
        let html = r#"<html><body><img src="https://example.com/image.jpg" alt="External"></body></html>"#;
        assert!(get_images_from_html(html, "https://blog.boot.dev").is_empty());
    }

    #[test]
    fn test_images_mixed() {
        let html = r#"<html><body>
            <img src="/local1.jpg" alt="Local1">
            <img src="https://example.com/external.jpg" alt="External">
            <img src="//cdn.example.com/proto.jpg" alt="Protocol relative">
            <img src="/local2.jpg" alt="Local2">
            <img src="/local1.jpg" alt="Again">
        </body></html>"#;
        assert_eq!(
            get_images_from_html(html, "https://blog.boot.dev"),
            vec![
                "https://blog.boot.dev/local1.jpg",
                "https://blog.boot.dev/local2.jpg",
            ]
        );
    }

    #[test]
    fn test_extract_page_data_basic() {
        let html = r#"<html><body>
            <h1>Test Title</h1>
            <p>This is the first paragraph.</p>
            <a href="/link1">Link 1</a>
            <img src="/image1.jpg" alt="Image 1">
        </body></html>"#;

        let page = extract_page_data(html, "https://blog.boot.dev");
        assert_eq!(
            page,
            PageRecord {
                page_url: "https://blog.boot.dev".to_string(),
                title: "Test Title".to_string(),
                first_paragraph: "This is the first paragraph.".to_string(),
                outgoing_links: vec!["https://blog.boot.dev/link1".to_string()],
                image_urls: vec!["https://blog.boot.dev/image1.jpg".to_string()],
            }
        );
    }

    #[test]
    fn test_extract_page_data_empty_document() {
        let page = extract_page_data("", "https://a.test/");
        assert_eq!(page.page_url, "https://a.test/");
        assert!(page.title.is_empty());
        assert!(page.first_paragraph.is_empty());
        assert!(page.outgoing_links.is_empty());
        assert!(page.image_urls.is_empty());
    }
}
