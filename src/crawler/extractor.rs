//! HTML extraction of links and keywords
//!
//! The document is walked once in document order with an explicit stack, so
//! deeply nested markup cannot exhaust the call stack.
//!
//! - `<a href>`: the href, resolved against the page URL unless it is
//!   already an absolute http(s) URL. Anchors without `href` contribute nothing.
//! - `<h1>`: the heading's first child, if it is text, split on spaces.
//!   Text nested inside inline children of the heading is not read.

use scraper::{Html, Node};
use url::Url;

/// Links and keywords found on one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Absolute link URLs in document order
    pub links: Vec<String>,

    /// Heading keywords in document order
    pub keywords: Vec<String>,
}

/// Extracts links and keywords from an HTML document
///
/// Malformed markup never fails: the HTML5 parser recovers, and whatever it
/// recovers is walked.
///
/// # Example
///
/// ```
/// use squid::crawler::extract;
/// use url::Url;
///
/// let base = Url::parse("http://x/").unwrap();
/// let page = extract("<h1>These are all keywords</h1><a href=\"/a\">a</a>", &base);
/// assert_eq!(page.keywords, vec!["These", "are", "all", "keywords"]);
/// assert_eq!(page.links, vec!["http://x/a"]);
/// ```
pub fn extract(markup: &str, base_url: &Url) -> ExtractedPage {
    let document = Html::parse_document(markup);
    let mut page = ExtractedPage::default();

    let mut stack = vec![document.tree.root()];
    while let Some(node) = stack.pop() {
        if let Node::Element(element) = node.value() {
            match element.name() {
                "a" => {
                    if let Some(href) = element.attr("href") {
                        if let Some(link) = resolve_link(href, base_url) {
                            page.links.push(link);
                        }
                    }
                }
                "h1" => {
                    if let Some(Node::Text(text)) = node.first_child().map(|c| c.value()) {
                        page.keywords.extend(split_keywords(text));
                    }
                }
                _ => {}
            }
        }

        // Reverse so the first child is popped next
        stack.extend(node.children().rev());
    }

    page
}

/// Resolves an href to an absolute URL string
///
/// Absolute http(s) hrefs are returned verbatim; everything else is resolved
/// as a URL reference against `base_url`. Returns None if resolution fails.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    if is_absolute_http(href) {
        return Some(href.to_string());
    }

    match base_url.join(href) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            tracing::debug!("Dropping unresolvable href {:?} on {}: {}", href, base_url, e);
            None
        }
    }
}

/// Literal `http://` or `https://` prefix, ignoring case
///
/// `http:foo` has the scheme but no authority, so it is still resolved.
fn is_absolute_http(href: &str) -> bool {
    let starts_with = |prefix: &str| {
        href.get(..prefix.len())
            .map(|head| head.eq_ignore_ascii_case(prefix))
            .unwrap_or(false)
    };
    starts_with("http://") || starts_with("https://")
}

/// Splits heading text on single spaces, dropping empty tokens
fn split_keywords(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(' ')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("http://x/").unwrap()
    }

    #[test]
    fn test_links_and_keywords() {
        let html = r#"<html>
            <head></head>
            <body>
                <h1>These are all keywords</h1>
                <a href="/this/is/an/internal/link">link</a>
                <p>this is a <a href="http://google.com">link</a></p>
            </body>
        </html>"#;
        let page = extract(html, &base_url());
        assert_eq!(
            page.links,
            vec!["http://x/this/is/an/internal/link", "http://google.com"]
        );
        assert_eq!(page.keywords, vec!["These", "are", "all", "keywords"]);
    }

    #[test]
    fn test_anchor_inside_heading() {
        let html = r#"<html><body><h1>Hello <a href="TEST">world</a></h1></body></html>"#;
        let page = extract(html, &base_url());
        assert_eq!(page.links, vec!["http://x/TEST"]);
        assert_eq!(page.keywords, vec!["Hello"]);
    }

    #[test]
    fn test_heading_inside_anchor() {
        let html = r#"<html><body><a href="/not/a/test"><h1>hi there</h1></a></body></html>"#;
        let page = extract(html, &base_url());
        assert_eq!(page.links, vec!["http://x/not/a/test"]);
        assert_eq!(page.keywords, vec!["hi", "there"]);
    }

    #[test]
    fn test_heading_with_only_inline_child_yields_nothing() {
        let html = r#"<h1><em>Hidden words</em></h1><h1>Shown</h1>"#;
        let page = extract(html, &base_url());
        assert_eq!(page.keywords, vec!["Shown"]);
    }

    #[test]
    fn test_multiple_headings_flatten_in_order() {
        let html = "<h1>  first   heading </h1><div><h1>second\nline</h1></div>";
        let page = extract(html, &base_url());
        assert_eq!(page.keywords, vec!["first", "heading", "second\nline"]);
    }

    #[test]
    fn test_no_dedup_of_keywords_or_links() {
        let html = r#"<h1>a a</h1><a href="/p">1</a><a href="/p">2</a>"#;
        let page = extract(html, &base_url());
        assert_eq!(page.keywords, vec!["a", "a"]);
        assert_eq!(page.links, vec!["http://x/p", "http://x/p"]);
    }

    #[test]
    fn test_other_headings_ignored() {
        let html = "<h2>not me</h2><title>nor me</title>";
        let page = extract(html, &base_url());
        assert!(page.keywords.is_empty());
    }

    #[test]
    fn test_anchor_without_href_omitted() {
        let html = r#"<a name="top">top</a><a href="/real">real</a>"#;
        let page = extract(html, &base_url());
        assert_eq!(page.links, vec!["http://x/real"]);
    }

    #[test]
    fn test_absolute_links_kept_verbatim() {
        let base = Url::parse("https://example.com/dir/page.html").unwrap();
        let html = r#"<a href="http://Other.COM/A?b=c#d">1</a><a href="https://secure.example.org">2</a>"#;
        let page = extract(html, &base);
        assert_eq!(
            page.links,
            vec!["http://Other.COM/A?b=c#d", "https://secure.example.org"]
        );
    }

    #[test]
    fn test_absolute_prefix_is_literal() {
        let html = r#"<a href="HTTP://A.com/x">upper</a>
            <a href="hTtPs://b.com">mixed</a>
            <a href="http:foo">no authority</a>
            <a href="https:/bar">one slash</a>"#;
        let page = extract(html, &base_url());
        assert_eq!(
            page.links,
            vec!["HTTP://A.com/x", "hTtPs://b.com", "http://x/foo", "https://bar/"]
        );

        assert!(is_absolute_http("http://x"));
        assert!(!is_absolute_http("http:/x"));
        assert!(!is_absolute_http("http"));
        assert!(!is_absolute_http("ftp://x"));
    }

    #[test]
    fn test_relative_resolution() {
        let base = Url::parse("https://example.com/dir/page.html?q=1").unwrap();
        let cases = [
            ("other.html", "https://example.com/dir/other.html"),
            ("../up.html", "https://example.com/up.html"),
            ("/root", "https://example.com/root"),
            ("//cdn.example.net/lib.js", "https://cdn.example.net/lib.js"),
            ("#section", "https://example.com/dir/page.html?q=1#section"),
            ("?page=2", "https://example.com/dir/page.html?page=2"),
            ("", "https://example.com/dir/page.html?q=1"),
        ];

        for (href, expected) in cases {
            let html = format!(r#"<a href="{}">x</a>"#, href);
            let page = extract(&html, &base);
            assert_eq!(page.links, vec![expected], "href {:?}", href);
        }
    }

    #[test]
    fn test_non_http_schemes_pass_through_resolution() {
        let html = r#"<a href="mailto:someone@example.com">m</a>"#;
        let page = extract(html, &base_url());
        assert_eq!(page.links, vec!["mailto:someone@example.com"]);
    }

    #[test]
    fn test_deeply_nested_markup() {
        let depth = 3000;
        let mut html = String::new();
        for _ in 0..depth {
            html.push_str("<div>");
        }
        html.push_str(r#"<a href="/deep">deep</a>"#);
        for _ in 0..depth {
            html.push_str("</div>");
        }

        let page = extract(&html, &base_url());
        assert_eq!(page.links, vec!["http://x/deep"]);
    }

    #[test]
    fn test_malformed_markup_degrades() {
        let html = r#"<h1>Broken <<< heading<a href="/still/found">x</p></div></h1>"#;
        let page = extract(html, &base_url());
        assert_eq!(page.links, vec!["http://x/still/found"]);
        assert_eq!(page.keywords.first().map(String::as_str), Some("Broken"));
    }

    #[test]
    fn test_empty_document() {
        let page = extract("", &base_url());
        assert_eq!(page, ExtractedPage::default());
    }
}
