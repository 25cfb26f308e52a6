// src/page/headers.rs
// =============================================================================
// Response header audit: CORS and same-origin policy headers.
//
// Header names are matched case-insensitively; reqwest hands us lower-case
// names while user-facing reports use the canonical spelling.
// =============================================================================

use serde::Serialize;

use crate::fetch::Headers;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderIssue {
    pub header: String,
    pub problem: String,
    pub recommendation: String,
}

impl HeaderIssue {
    fn new(header: &str, problem: &str, recommendation: &str) -> Self {
        HeaderIssue {
            header: header.to_string(),
            problem: problem.to_string(),
            recommendation: recommendation.to_string(),
        }
    }
}

const MISSING: &str = "Missing header.";

// Checks response headers for weak or missing security policies.
// Issues come back in a fixed order: CORS first, then framing, CSP, referrer.
pub fn audit_headers(headers: &Headers) -> Vec<HeaderIssue> {
    let mut issues = Vec::new();

    let allow_origin = lookup(headers, "Access-Control-Allow-Origin");
    match allow_origin {
        Some("*") => issues.push(HeaderIssue::new(
            "Access-Control-Allow-Origin",
            "Wildcard '*' allows access from any domain.",
            "Specify a trusted domain instead of '*'.",
        )),
        Some(_) => {}
        None => issues.push(HeaderIssue::new(
            "Access-Control-Allow-Origin",
            MISSING,
            "Add 'Access-Control-Allow-Origin' with a specific domain.",
        )),
    }

    let credentials = lookup(headers, "Access-Control-Allow-Credentials")
        .is_some_and(|value| value.eq_ignore_ascii_case("true"));
    if credentials && allow_origin == Some("*") {
        issues.push(HeaderIssue::new(
            "Access-Control-Allow-Credentials",
            "Used with wildcard '*'.",
            "Ensure 'Access-Control-Allow-Origin' specifies a trusted domain.",
        ));
    }

    let required = [
        ("X-Frame-Options", "Add 'X-Frame-Options' to prevent clickjacking."),
        (
            "Content-Security-Policy",
            "Add 'Content-Security-Policy' to restrict resources and mitigate XSS.",
        ),
        ("Referrer-Policy", "Add 'Referrer-Policy' to control referrer information."),
    ];
    for (header, recommendation) in required {
        if lookup(headers, header).is_none() {
            issues.push(HeaderIssue::new(header, MISSING, recommendation));
        }
    }

    issues
}

fn lookup<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn flagged(issues: &[HeaderIssue]) -> Vec<&str> {
        issues.iter().map(|issue| issue.header.as_str()).collect()
    }

    #[test]
    fn test_no_headers_reports_everything_missing() {
        let issues = audit_headers(&Headers::new());
        assert_eq!(
            flagged(&issues),
            vec![
                "Access-Control-Allow-Origin",
                "X-Frame-Options",
                "Content-Security-Policy",
                "Referrer-Policy",
            ]
        );
        assert!(issues.iter().all(|issue| issue.problem == MISSING));
    }

    #[test]
    fn test_hardened_response_is_clean() {
        let issues = audit_headers(&headers(&[
            ("access-control-allow-origin", "https://app.example.com"),
            ("x-frame-options", "DENY"),
            ("content-security-policy", "default-src 'self'"),
            ("referrer-policy", "no-referrer"),
        ]));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_wildcard_origin_with_credentials() {
        let issues = audit_headers(&headers(&[
            ("Access-Control-Allow-Origin", "*"),
            ("Access-Control-Allow-Credentials", "TRUE"),
            ("X-Frame-Options", "SAMEORIGIN"),
            ("Content-Security-Policy", "default-src 'self'"),
            ("Referrer-Policy", "strict-origin"),
        ]));
        assert_eq!(
            flagged(&issues),
            vec!["Access-Control-Allow-Origin", "Access-Control-Allow-Credentials"]
        );
        assert_eq!(issues[0].problem, "Wildcard '*' allows access from any domain.");
        assert_eq!(issues[1].problem, "Used with wildcard '*'.");
    }

    #[test]
    fn test_credentials_without_wildcard_are_fine() {
        let issues = audit_headers(&headers(&[
            ("access-control-allow-origin", "https://a.example"),
            ("access-control-allow-credentials", "true"),
        ]));
        assert!(!flagged(&issues).contains(&"Access-Control-Allow-Credentials"));
    }
}
