// src/crawl/result.rs
// =============================================================================
// Result records produced by the crawler.
//
// Records are created once per visited page (or fetched script) and never
// modified afterwards. They serialize "untagged": a success record and an
// error record are told apart by their fields (an error record has `error`).
// =============================================================================

use serde::Serialize;

use crate::fetch::{Headers, Method};
use crate::page::HeaderIssue;

// Ordered pages of one top-level crawl: root first, then every child
// subtree in link discovery order
pub type CrawlOutcome = Vec<PageResult>;

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PageResult {
    Page(PageReport),
    Failed(PageFailure),
}

#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub url: String,
    /// None when the page was rendered by the headless browser
    pub status_code: Option<u16>,
    pub method: Method,
    pub depth: usize,
    pub links: Vec<String>,
    pub headers: Headers,
    pub header_issues: Vec<HeaderIssue>,
    #[serde(rename = "js_files")]
    pub script_urls: Vec<String>,
    #[serde(rename = "js_analysis")]
    pub script_analyses: Vec<ScriptResult>,
    #[serde(rename = "inline_script_tag_count")]
    pub inline_script_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageFailure {
    pub url: String,
    pub method: Method,
    pub depth: usize,
    /// Set when the server answered with a non-success status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub error: String,
}

impl PageResult {
    pub fn failed(
        url: &str,
        method: Method,
        depth: usize,
        status_code: Option<u16>,
        error: impl Into<String>,
    ) -> Self {
        PageResult::Failed(PageFailure {
            url: url.to_string(),
            method,
            depth,
            status_code,
            error: error.into(),
        })
    }

    pub fn url(&self) -> &str {
        match self {
            PageResult::Page(page) => &page.url,
            PageResult::Failed(failure) => &failure.url,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            PageResult::Page(page) => page.depth,
            PageResult::Failed(failure) => failure.depth,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            PageResult::Page(page) => page.status_code,
            PageResult::Failed(failure) => failure.status_code,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageResult::Page(_) => None,
            PageResult::Failed(failure) => Some(&failure.error),
        }
    }

    pub fn as_page(&self) -> Option<&PageReport> {
        match self {
            PageResult::Page(page) => Some(page),
            PageResult::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScriptResult {
    Analyzed(ScriptReport),
    Failed(ScriptFailure),
}

#[derive(Debug, Clone, Serialize)]
pub struct ScriptReport {
    pub url: String,
    pub status_code: Option<u16>,
    pub total_comments: usize,
    /// First few comments, each truncated
    pub comments: Vec<String>,
    pub keywords_found: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScriptFailure {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub error: String,
}

// Wraps one seed's outcome for the JSON report
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub seed: String,
    pub pages: CrawlOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_serializes_flat_without_missing_status() {
        let result = PageResult::failed("https://example.com", Method::Get, 1, None, "request timed out");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "url": "https://example.com",
                "method": "GET",
                "depth": 1,
                "error": "request timed out"
            })
        );
    }

    #[test]
    fn test_page_uses_report_field_names() {
        let result = PageResult::Page(PageReport {
            url: "https://example.com".to_string(),
            status_code: Some(200),
            method: Method::Post,
            depth: 2,
            links: vec!["https://example.com/a".to_string()],
            headers: Headers::new(),
            header_issues: Vec::new(),
            script_urls: Vec::new(),
            script_analyses: vec![ScriptResult::Failed(ScriptFailure {
                url: "https://example.com/app.js".to_string(),
                status_code: Some(404),
                error: "Failed to fetch".to_string(),
            })],
            inline_script_count: 3,
        });
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["status_code"], 200);
        assert_eq!(value["method"], "POST");
        assert_eq!(value["inline_script_tag_count"], 3);
        assert_eq!(value["js_files"], json!([]));
        assert_eq!(value["js_analysis"][0]["status_code"], 404);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_accessors() {
        let result = PageResult::failed("https://x.test", Method::Get, 3, Some(500), "Failed to fetch (HTTP 500)");
        assert_eq!(result.url(), "https://x.test");
        assert_eq!(result.depth(), 3);
        assert_eq!(result.status_code(), Some(500));
        assert!(result.error().is_some());
        assert!(result.as_page().is_none());
    }
}
