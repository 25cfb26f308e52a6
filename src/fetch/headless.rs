// src/fetch/headless.rs
// =============================================================================
// Page rendering in headless Chromium (cargo feature `headless`).
//
// Used for JavaScript-built pages or when a WAF rejects plain clients.
// A rendered page has no HTTP status and no response headers, so the
// FetchResponse comes back with `status: None` and an empty header map.
// =============================================================================

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{FetchRequest, FetchResponse, Fetcher, Headers};
use crate::error::FetchError;

pub struct HeadlessFetcher {
    browser: Browser,
    // Drives the CDP websocket; the browser stalls if this stops
    handler: JoinHandle<()>,
    timeout: Duration,
}

impl HeadlessFetcher {
    pub async fn launch(timeout: Duration) -> Result<Self, FetchError> {
        let config = BrowserConfig::builder().build().map_err(FetchError::Render)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Render(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!(error = %e, "headless browser handler stopped");
                    break;
                }
            }
        });

        Ok(HeadlessFetcher {
            browser,
            handler,
            timeout,
        })
    }

    async fn render(&self, url: &str, headers: &Headers) -> Result<String, chromiumoxide::error::CdpError> {
        let page = self.browser.new_page("about:blank").await?;

        let agent = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("user-agent"))
            .map(|(_, value)| value.clone());
        if let Some(agent) = agent {
            page.set_user_agent(SetUserAgentOverrideParams::new(agent)).await?;
        }

        page.goto(url).await?;
        page.wait_for_navigation().await?;
        let html = page.content().await?;

        if let Err(e) = page.close().await {
            debug!(url, error = %e, "failed to close tab");
        }
        Ok(html)
    }
}

#[async_trait]
impl Fetcher for HeadlessFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        // The renderer always navigates with GET; method and body are not replayed
        match tokio::time::timeout(self.timeout, self.render(&request.url, &request.headers)).await {
            Ok(Ok(body)) => Ok(FetchResponse {
                status: None,
                headers: Headers::new(),
                body,
            }),
            Ok(Err(e)) => Err(FetchError::Render(e.to_string())),
            Err(_) => Err(FetchError::Timeout),
        }
    }
}

impl Drop for HeadlessFetcher {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
