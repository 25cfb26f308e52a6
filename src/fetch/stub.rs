// src/fetch/stub.rs
// In-memory Fetcher for tests: canned responses keyed by URL, plus a log
// of every URL that was requested.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{FetchRequest, FetchResponse, Fetcher, Headers};
use crate::error::FetchError;

enum Canned {
    Page(FetchResponse),
    Timeout,
}

#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, Canned>,
    latency: HashMap<String, Duration>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    // 200 response with the given HTML
    pub fn page(self, url: &str, html: &str) -> Self {
        self.response(url, 200, Headers::new(), html)
    }

    pub fn response(mut self, url: &str, status: u16, headers: Headers, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Canned::Page(FetchResponse {
                status: Some(status),
                headers,
                body: body.to_string(),
            }),
        );
        self
    }

    // Rendered page: no status, no headers
    pub fn rendered(mut self, url: &str, html: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Canned::Page(FetchResponse {
                status: None,
                headers: Headers::new(),
                body: html.to_string(),
            }),
        );
        self
    }

    pub fn timeout(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), Canned::Timeout);
        self
    }

    // Delays the answer for `url`, so sibling branches interleave
    pub fn slow(mut self, url: &str, delay: Duration) -> Self {
        self.latency.insert(url.to_string(), delay);
        self
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, url: &str) -> usize {
        self.requested_urls().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        self.requests.lock().unwrap().push(request.clone());

        match self.latency.get(&request.url) {
            Some(delay) => tokio::time::sleep(*delay).await,
            None => tokio::task::yield_now().await,
        }

        match self.responses.get(&request.url) {
            Some(Canned::Page(response)) => Ok(response.clone()),
            Some(Canned::Timeout) => Err(FetchError::Timeout),
            None => Err(FetchError::Connect(format!("no route to {}", request.url))),
        }
    }
}
