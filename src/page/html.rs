// src/page/html.rs
// =============================================================================
// This module pulls crawl inputs out of an HTML page:
// - outbound links (<a href>), resolved to absolute http(s) URLs
// - external script references (<script src>)
// - the number of inline <script> blocks (no src attribute)
//
// We use the `scraper` crate (html5ever underneath) for parsing and the
// `url` crate to resolve relative links against the page URL.
//
// scraper's Html is not Send, so everything here is synchronous and returns
// owned data; the crawler never holds a parsed document across an .await.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Everything the crawler needs from one page, from a single parse
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageScan {
    pub links: Vec<String>,
    pub script_urls: Vec<String>,
    pub inline_scripts: usize,
}

// Parses `html` once and runs all three extractors on it.
// Script URLs are left unresolved, same as extract_script_urls().
pub fn scan_page(html: &str, base_url: &str) -> PageScan {
    let document = Html::parse_document(html);

    PageScan {
        links: links_in(&document, base_url),
        script_urls: script_urls_in(&document),
        inline_scripts: inline_scripts_in(&document),
    }
}

// Extracts all links from HTML content
//
// Parameters:
//   html: the HTML content to parse
//   base_url: the URL of the page (for resolving relative links)
//
// Returns: absolute http(s) URLs in document order, without duplicates
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base_url = "https://example.com"
//   result = ["https://example.com/docs"]
pub fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    links_in(&Html::parse_document(html), base_url)
}

// Returns the src attribute of every <script src=...>, as written
pub fn extract_script_urls(html: &str) -> Vec<String> {
    script_urls_in(&Html::parse_document(html))
}

// Counts <script> elements without a src attribute
pub fn count_inline_scripts(html: &str) -> usize {
    inline_scripts_in(&Html::parse_document(html))
}

fn links_in(document: &Html, base_url: &str) -> Vec<String> {
    let mut links = Vec::new();

    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(base_url, "invalid base URL, links not resolved");
            return links;
        }
    };

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    // Same link twice on a page is one outbound edge
    let mut seen = HashSet::new();

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_url(&base, href) {
                if is_crawlable_link(&absolute_url) && seen.insert(absolute_url.clone()) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

fn script_urls_in(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("script[src]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string)
        .collect()
}

fn inline_scripts_in(document: &Html) -> usize {
    match Selector::parse("script:not([src])") {
        Ok(selector) => document.select(&selector).count(),
        Err(_) => 0,
    }
}

// Resolves a possibly-relative URL to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other" -> Some("https://example.com/other")
//   href = "#top" -> None (same page)
//   href = "javascript:void(0)" -> None
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
        || href.starts_with("data:")
    {
        return None;
    }

    // join() handles both absolute and relative hrefs
    base.join(href).ok().map(|url| url.to_string())
}

fn is_crawlable_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        let links = extract_links(html, "https://example.com");
        assert_eq!(links, vec!["https://www.rust-lang.org/"]);
    }

    #[test]
    fn test_resolve_relative_link() {
        let html = r#"<a href="/docs">Docs</a>"#;
        let links = extract_links(html, "https://example.com/page");
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_skip_mailto_and_anchor() {
        let html = r##"
            <a href="mailto:test@example.com">Email</a>
            <a href="#section">Jump</a>
            <a href="javascript:void(0)">Nothing</a>
        "##;
        let links = extract_links(html, "https://example.com");
        assert!(links.is_empty());
    }

    #[test]
    fn test_links_keep_order_and_drop_duplicates() {
        let html = r#"
            <a href="/b">B</a>
            <a href="https://rust-lang.org">Rust</a>
            <a href="/b">B again</a>
            <a href="../about">About</a>
        "#;
        let links = extract_links(html, "https://example.com/page/");
        assert_eq!(
            links,
            vec![
                "https://example.com/b",
                "https://rust-lang.org/",
                "https://example.com/about",
            ]
        );
    }

    #[test]
    fn test_query_and_fragment_urls_stay_distinct() {
        let html = r#"<a href="/p?x=1">1</a><a href="/p?x=2">2</a><a href="/p#frag">3</a>"#;
        let links = extract_links(html, "https://example.com/");
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn test_script_urls_and_inline_count() {
        let html = r#"
            <script src="/static/app.js"></script>
            <script>var inline = 1;</script>
            <script type="module" src="https://cdn.example.com/lib.js"></script>
            <SCRIPT>console.log("two")</SCRIPT>
        "#;
        assert_eq!(
            extract_script_urls(html),
            vec!["/static/app.js", "https://cdn.example.com/lib.js"]
        );
        assert_eq!(count_inline_scripts(html), 2);
    }

    #[test]
    fn test_scan_page_matches_individual_extractors() {
        let html = r#"<a href="/x">x</a><script src="a.js"></script><script>1</script>"#;
        let scan = scan_page(html, "https://example.com/");
        assert_eq!(scan.links, extract_links(html, "https://example.com/"));
        assert_eq!(scan.script_urls, vec!["a.js"]);
        assert_eq!(scan.inline_scripts, 1);
    }
}
