// src/enumerate/subdomains.rs
// Subdomain enumeration: probe <scheme>://<word>.<domain>.

use std::fmt;

use super::{probe_sequentially, DelayRange, ProbeResult};
use crate::fetch::{Fetcher, Headers};

pub const DEFAULT_SUBDOMAINS: [&str; 12] = [
    "dev",
    "test",
    "staging",
    "qa",
    "admin",
    "dashboard",
    "api",
    "auth",
    "mail",
    "ftp",
    "vpn",
    "status",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

pub fn subdomain_urls(domain: &str, wordlist: &[String], scheme: Scheme) -> Vec<String> {
    let domain = domain.trim_matches('.');

    wordlist
        .iter()
        .map(|sub| format!("{}://{}.{}", scheme, sub.trim_matches('.'), domain))
        .collect()
}

pub async fn enumerate_subdomains(
    fetcher: &dyn Fetcher,
    domain: &str,
    wordlist: &[String],
    scheme: Scheme,
    headers: &Headers,
    delay: DelayRange,
) -> Vec<ProbeResult> {
    tracing::info!(domain, words = wordlist.len(), %scheme, "enumerating subdomains");
    probe_sequentially(fetcher, subdomain_urls(domain, wordlist, scheme), headers, delay).await
}
