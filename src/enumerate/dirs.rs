// src/enumerate/dirs.rs
// Directory enumeration: probe <base>/<word> for every wordlist entry.

use super::{probe_sequentially, DelayRange, ProbeResult};
use crate::fetch::{Fetcher, Headers};

pub const DEFAULT_DIRECTORIES: [&str; 16] = [
    "admin",
    "login",
    "dashboard",
    "config",
    "api",
    "robots.txt",
    "sitemap.xml",
    "env",
    "private",
    "uploads",
    "tmp",
    "health",
    "metrics",
    "status",
    "graphql",
    "graphiql",
];

// Joins base and path with exactly one slash between them
pub fn directory_urls(base_url: &str, wordlist: &[String]) -> Vec<String> {
    let base = base_url.trim_end_matches('/');

    wordlist
        .iter()
        .map(|path| format!("{}/{}", base, path.trim_start_matches('/')))
        .collect()
}

pub async fn enumerate_directories(
    fetcher: &dyn Fetcher,
    base_url: &str,
    wordlist: &[String],
    headers: &Headers,
    delay: DelayRange,
) -> Vec<ProbeResult> {
    tracing::info!(base_url, words = wordlist.len(), "enumerating directories");
    probe_sequentially(fetcher, directory_urls(base_url, wordlist), headers, delay).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::StubFetcher;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_directory_urls_single_slash() {
        let urls = directory_urls("https://example.com/", &words(&["/admin", "api/v1", "robots.txt"]));
        assert_eq!(
            urls,
            vec![
                "https://example.com/admin",
                "https://example.com/api/v1",
                "https://example.com/robots.txt",
            ]
        );
    }

    #[tokio::test]
    async fn test_enumerate_directories() {
        let stub = StubFetcher::new()
            .response("https://example.com/admin", 302, Headers::new(), "")
            .response("https://example.com/.git", 200, Headers::new(), "");

        let results = enumerate_directories(
            &stub,
            "https://example.com",
            &words(&["admin", ".git", "missing"]),
            &Headers::new(),
            DelayRange::NONE,
        )
        .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].url(), "https://example.com/.git");
        assert_eq!(results[1].status_code(), Some(302));
        assert!(matches!(results[2], ProbeResult::Failed { .. }));
    }
}
