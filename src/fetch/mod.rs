// src/fetch/mod.rs
// =============================================================================
// This module gets page content for a URL.
//
// Two strategies share one trait:
// - http: a plain HTTP request with reqwest (status, headers and body)
// - headless: a Chromium render (body only, behind the `headless` feature)
//
// The crawler only sees `dyn Fetcher`, so it never branches on the strategy.
// =============================================================================

mod http;
#[cfg(feature = "headless")]
mod headless;
mod user_agent;

#[cfg(test)]
pub mod stub;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::FetchError;

pub use http::HttpFetcher;
#[cfg(feature = "headless")]
pub use headless::HeadlessFetcher;
pub use user_agent::{with_user_agent, USER_AGENTS};

// Request headers as supplied by the user (name -> value).
// A BTreeMap keeps the JSON output and logs in a stable order.
pub type Headers = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

// Everything a fetcher needs to issue one request
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub method: Method,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

impl FetchRequest {
    // A plain GET, used for scripts and enumeration probes
    pub fn get(url: impl Into<String>, headers: Headers) -> Self {
        FetchRequest {
            url: url.into(),
            method: Method::Get,
            headers,
            body: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FetchResponse {
    /// HTTP status; None when the page was rendered by a browser
    pub status: Option<u16>,
    /// Response headers with lower-case names; empty for rendered pages
    pub headers: Headers,
    pub body: String,
}

impl FetchResponse {
    // A rendered page has no status, and counts as a usable body
    pub fn is_success(&self) -> bool {
        self.status.map_or(true, |code| (200..300).contains(&code))
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;
}
