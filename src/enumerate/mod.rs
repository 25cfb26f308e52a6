// src/enumerate/mod.rs
// =============================================================================
// Brute-force enumeration of directories and subdomains.
//
// Unlike the crawler this is a flat, sequential loop: one request at a time,
// with a random pause after each probe to keep the request rate low.
// A failed probe is recorded and the loop moves on.
// =============================================================================

mod dirs;
mod subdomains;

use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::fetch::{with_user_agent, FetchRequest, Fetcher, Headers};

pub use dirs::{directory_urls, enumerate_directories, DEFAULT_DIRECTORIES};
pub use subdomains::{enumerate_subdomains, subdomain_urls, Scheme, DEFAULT_SUBDOMAINS};

// Sort key for probes that never got a status
const NO_STATUS: u16 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProbeResult {
    Responded { url: String, status_code: u16 },
    Failed { url: String, error: String },
}

impl ProbeResult {
    pub fn url(&self) -> &str {
        match self {
            ProbeResult::Responded { url, .. } | ProbeResult::Failed { url, .. } => url,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProbeResult::Responded { status_code, .. } => Some(*status_code),
            ProbeResult::Failed { .. } => None,
        }
    }
}

// Pause after each probe, drawn uniformly from [min, max]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub const NONE: DelayRange = DelayRange {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    pub fn from_millis(min: u64, max: u64) -> Self {
        // A reversed range is taken as meant the other way round
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        DelayRange {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        }
    }

    fn sample(&self) -> Duration {
        if self.max.is_zero() {
            return Duration::ZERO;
        }
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

impl Default for DelayRange {
    // One to five seconds between requests
    fn default() -> Self {
        DelayRange::from_millis(1_000, 5_000)
    }
}

// Probes `urls` one after another with GET and returns the results sorted
// by status code, failed probes last
async fn probe_sequentially(
    fetcher: &dyn Fetcher,
    urls: Vec<String>,
    headers: &Headers,
    delay: DelayRange,
) -> Vec<ProbeResult> {
    // One User-Agent for the whole run
    let headers = with_user_agent(headers);
    let mut results = Vec::with_capacity(urls.len());

    for url in urls {
        let request = FetchRequest::get(url.clone(), headers.clone());

        match fetcher.fetch(&request).await {
            Ok(response) => {
                let status_code = response.status.unwrap_or(NO_STATUS);
                info!(url = %url, status = status_code, "probed");
                results.push(ProbeResult::Responded { url, status_code });
            }
            Err(e) => {
                debug!(url = %url, error = %e, "probe failed");
                results.push(ProbeResult::Failed {
                    url,
                    error: e.to_string(),
                });
            }
        }

        let pause = delay.sample();
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    sort_by_status(&mut results);
    results
}

// Stable: equal statuses keep wordlist order
fn sort_by_status(results: &mut [ProbeResult]) {
    results.sort_by_key(|result| result.status_code().unwrap_or(NO_STATUS));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::StubFetcher;
    use crate::fetch::USER_AGENTS;

    #[tokio::test]
    async fn test_results_sorted_with_failures_last() {
        let stub = StubFetcher::new()
            .response("https://a.test/admin", 403, Headers::new(), "")
            .response("https://a.test/api", 200, Headers::new(), "")
            .timeout("https://a.test/slow")
            .response("https://a.test/login", 200, Headers::new(), "");
        let urls = ["admin", "slow", "api", "login"]
            .iter()
            .map(|p| format!("https://a.test/{}", p))
            .collect();

        let results = probe_sequentially(&stub, urls, &Headers::new(), DelayRange::NONE).await;

        assert_eq!(
            results.iter().map(ProbeResult::url).collect::<Vec<_>>(),
            vec![
                "https://a.test/api",
                "https://a.test/login",
                "https://a.test/admin",
                "https://a.test/slow",
            ]
        );
        assert_eq!(results[3].status_code(), None);
    }

    #[tokio::test]
    async fn test_probes_share_one_user_agent() {
        let stub = StubFetcher::new();
        let urls = vec!["https://a.test/x".to_string(), "https://a.test/y".to_string()];

        probe_sequentially(&stub, urls, &Headers::new(), DelayRange::NONE).await;

        let requests = stub.requests();
        let first = requests[0].headers.get("User-Agent").unwrap();
        assert!(USER_AGENTS.contains(&first.as_str()));
        assert_eq!(requests[1].headers.get("User-Agent"), Some(first));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_probes() {
        let stub = StubFetcher::new();
        let urls = vec!["https://a.test/x".to_string(), "https://a.test/y".to_string()];

        let started = tokio::time::Instant::now();
        probe_sequentially(&stub, urls, &Headers::new(), DelayRange::from_millis(1_000, 1_000)).await;

        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[test]
    fn test_delay_range() {
        let range = DelayRange::from_millis(5_000, 1_000);
        assert_eq!(range.min, Duration::from_millis(1_000));
        assert_eq!(range.max, Duration::from_millis(5_000));
        for _ in 0..50 {
            let pause = range.sample();
            assert!(pause >= range.min && pause <= range.max);
        }
        assert_eq!(DelayRange::NONE.sample(), Duration::ZERO);
    }

    #[test]
    fn test_probe_serialization() {
        let found = ProbeResult::Responded {
            url: "https://a.test/admin".to_string(),
            status_code: 401,
        };
        let value = serde_json::to_value(&found).unwrap();
        assert_eq!(value, serde_json::json!({"url": "https://a.test/admin", "status_code": 401}));
    }
}
