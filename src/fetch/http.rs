// src/fetch/http.rs
// =============================================================================
// Direct HTTP fetching with reqwest.
//
// Key functionality:
// - One shared Client (connection pooling) with a per-request timeout
// - Sends the caller's method, headers and body as-is
// - Collects response headers into a plain map for the header audit
// - Sorts reqwest failures into FetchError categories (timeout, DNS, TLS...)
// =============================================================================

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::error::Error as _;
use std::time::Duration;

use super::{FetchRequest, FetchResponse, Fetcher, Headers, Method};
use crate::error::FetchError;

// Redirect chains longer than this are reported as TooManyRedirects
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::Request(format!("failed to build HTTP client: {}", e)))?;

        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(categorize_error)?;

        // Grab status and headers before text() consumes the response
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.text().await.map_err(categorize_error)?;

        Ok(FetchResponse {
            status: Some(status),
            headers,
            body,
        })
    }
}

// Flattens a HeaderMap; repeated headers are joined with ", "
fn collect_headers(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();

    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    headers
}

// Categorizes reqwest errors.
//
// reqwest only exposes a few kind checks (timeout, redirect, connect), so
// DNS and TLS failures are recognised from the error chain text.
fn categorize_error(error: reqwest::Error) -> FetchError {
    let chain = error_chain(&error);
    // Only look at the causes: the top-level message embeds the URL
    let lowered = error
        .source()
        .map(error_chain)
        .unwrap_or_default()
        .to_lowercase();

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if lowered.contains("dns") || lowered.contains("failed to lookup address") {
        FetchError::Dns(chain)
    } else if lowered.contains("certificate") || lowered.contains("tls") || lowered.contains("ssl") {
        FetchError::Tls(chain)
    } else if error.is_connect() {
        FetchError::Connect(chain)
    } else {
        FetchError::Request(chain)
    }
}

// Joins an error with all of its sources: "outer: inner: root cause"
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}
