// src/page/script.rs
// =============================================================================
// JavaScript body analysis: developer comments and sensitive keywords.
//
// Comments often leak internal endpoints, credentials or TODOs. We keep a
// short sample of them (trimmed and truncated) plus the total count, and
// report which of the user's keywords occur anywhere in the file.
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;

// Longest comment kept in reports, in characters
pub const MAX_COMMENT_LEN: usize = 50;

// How many comments a script report shows
pub const COMMENT_SAMPLE_SIZE: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptFindings {
    pub total_comments: usize,
    pub comments: Vec<String>,
    pub keywords_found: Vec<String>,
}

// Runs both analyzers on a fetched script body
pub fn analyze_script(js: &str, keywords: &[String]) -> ScriptFindings {
    let mut comments = extract_comments(js, MAX_COMMENT_LEN);
    let total_comments = comments.len();
    comments.truncate(COMMENT_SAMPLE_SIZE);

    ScriptFindings {
        total_comments,
        comments,
        keywords_found: find_keywords(js, keywords),
    }
}

fn line_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"//[^\n]*").expect("line comment pattern is valid"))
}

fn block_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern is valid"))
}

// Extracts `//` and `/* */` comments from JavaScript source.
//
// - `//` right after a ':' is a URL scheme ("https://"), not a comment
// - line comments come first, then block comments, each in source order
// - comments of 2 chars or less and comments holding URLs are dropped
// - longer comments are cut to `max_len` chars and get a "..." suffix
pub fn extract_comments(js: &str, max_len: usize) -> Vec<String> {
    let mut raw = Vec::new();

    let mut pos = 0;
    while let Some(found) = line_comment().find_at(js, pos) {
        if js[..found.start()].ends_with(':') {
            // Retry one byte later so a real comment later on the line is found
            pos = found.start() + 1;
            continue;
        }
        raw.push(found.as_str());
        pos = found.end();
    }
    raw.extend(block_comment().find_iter(js).map(|found| found.as_str()));

    raw.into_iter()
        .map(str::trim)
        .filter(|comment| comment.chars().count() > 2)
        .filter(|comment| !comment.contains("http://") && !comment.contains("https://"))
        .map(|comment| truncate(comment, max_len))
        .collect()
}

fn truncate(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// Case-insensitive search for keywords; returns the matches in keyword order
pub fn find_keywords(js: &str, keywords: &[String]) -> Vec<String> {
    let haystack = js.to_lowercase();

    keywords
        .iter()
        .filter(|keyword| !keyword.is_empty())
        .filter(|keyword| haystack.contains(&keyword.to_lowercase()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_line_and_block_comments() {
        let js = "var a = 1; // set the counter\n/* admin endpoint: /internal */\nvar b;";
        assert_eq!(
            extract_comments(js, MAX_COMMENT_LEN),
            vec!["// set the counter", "/* admin endpoint: /internal */"]
        );
    }

    #[test]
    fn test_url_scheme_is_not_a_comment() {
        let js = "var api = 'https://api.example.com'; // real comment\n";
        assert_eq!(extract_comments(js, MAX_COMMENT_LEN), vec!["// real comment"]);
    }

    #[test]
    fn test_short_and_url_comments_are_dropped() {
        let js = "//\n// see http://docs.example.com\n/* https://cdn.example.com */\n// ok!";
        assert_eq!(extract_comments(js, MAX_COMMENT_LEN), vec!["// ok!"]);
    }

    #[test]
    fn test_long_comment_is_truncated() {
        let js = format!("// {}", "x".repeat(80));
        let comments = extract_comments(&js, MAX_COMMENT_LEN);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].chars().count(), MAX_COMMENT_LEN + 3);
        assert!(comments[0].ends_with("..."));
    }

    #[test]
    fn test_truncation_respects_multibyte_chars() {
        let js = format!("// {}", "é".repeat(60));
        let comments = extract_comments(&js, 10);
        assert_eq!(comments[0], format!("// {}...", "é".repeat(7)));
    }

    #[test]
    fn test_keywords_case_insensitive_in_keyword_order() {
        let js = "const API_KEY = 'x'; let Password;";
        let found = find_keywords(js, &words(&["token", "password", "api_key"]));
        assert_eq!(found, words(&["password", "api_key"]));
    }

    #[test]
    fn test_analyze_keeps_sample_and_total() {
        let js = (1..=8)
            .map(|i| format!("// comment number {}\n", i))
            .collect::<String>();
        let findings = analyze_script(&js, &words(&["number"]));
        assert_eq!(findings.total_comments, 8);
        assert_eq!(findings.comments.len(), COMMENT_SAMPLE_SIZE);
        assert_eq!(findings.comments[0], "// comment number 1");
        assert_eq!(findings.keywords_found, words(&["number"]));
    }
}
