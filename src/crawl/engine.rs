// src/crawl/engine.rs
// =============================================================================
// This module implements the recursive, concurrent crawl.
//
// How it works, for every page:
// 1. Claim the URL in the shared visited set (skip it if someone else did)
// 2. Fetch the page (direct HTTP or headless render)
// 3. Extract links, scripts and inline script count, audit the headers,
//    fetch and analyze every referenced script
// 4. Decide whether to go deeper (depth limit, or ask the operator)
// 5. Crawl all new links at depth + 1 at the same time and wait for them
// 6. Return this page followed by each child's results, in link order
//
// Failures stay local: a page that cannot be fetched (or whose processing
// panics) becomes an error record and its siblings carry on.
// =============================================================================

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::confirm::{Confirm, StdinConfirm};
use super::result::{CrawlOutcome, PageReport, PageResult, ScriptFailure, ScriptReport, ScriptResult};
use super::visited::VisitedSet;
use crate::fetch::{with_user_agent, FetchRequest, Fetcher, Headers, Method};
use crate::page::{self, audit_headers, resolve_url, scan_page};

// How far the crawl may go from the seed (the seed is depth 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthLimit {
    /// Stop expanding at this depth
    Bounded(usize),
    /// No limit, but ask the operator before expanding each page
    AskToContinue,
}

// Which discovered links are followed. Every link is still reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlScope {
    #[default]
    AnyHost,
    SameHost,
}

// Settings for one top-level crawl, shared read-only by all its branches
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub url: String,
    pub method: Method,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
    pub depth_limit: DepthLimit,
    pub skip_js_analysis: bool,
    pub skip_header_analysis: bool,
    pub keywords: Vec<String>,
    pub scope: CrawlScope,
}

impl CrawlRequest {
    // GET the seed only, with full analysis and no keywords
    pub fn new(url: impl Into<String>) -> Self {
        CrawlRequest {
            url: url.into(),
            method: Method::Get,
            headers: Headers::new(),
            body: None,
            depth_limit: DepthLimit::Bounded(1),
            skip_js_analysis: false,
            skip_header_analysis: false,
            keywords: Vec::new(),
            scope: CrawlScope::AnyHost,
        }
    }
}

// State of one top-level crawl. Lives as long as its recursion tree.
struct CrawlRun {
    request: CrawlRequest,
    visited: VisitedSet,
    seed_host: Option<String>,
}

impl CrawlRun {
    fn in_scope(&self, link: &str) -> bool {
        match self.request.scope {
            CrawlScope::AnyHost => true,
            CrawlScope::SameHost => {
                let host = Url::parse(link).ok().and_then(|url| url.host_str().map(str::to_string));
                host.is_some() && host == self.seed_host
            }
        }
    }
}

// What happens after a page has been fetched and analyzed
enum Continuation {
    Stop,
    Expand(Vec<String>),
}

pub struct Crawler {
    pages: Arc<dyn Fetcher>,
    scripts: Arc<dyn Fetcher>,
    confirm: Arc<dyn Confirm>,
    sibling_delay: Duration,
}

impl Crawler {
    // `pages` fetches crawled pages (direct or headless),
    // `scripts` fetches JavaScript bodies and is always a direct fetcher
    pub fn new(pages: Arc<dyn Fetcher>, scripts: Arc<dyn Fetcher>) -> Self {
        Crawler {
            pages,
            scripts,
            confirm: Arc::new(StdinConfirm::new()),
            sibling_delay: Duration::ZERO,
        }
    }

    pub fn with_confirm(mut self, confirm: Arc<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    // Sibling i starts i * delay after the first one
    pub fn with_sibling_delay(mut self, delay: Duration) -> Self {
        self.sibling_delay = delay;
        self
    }

    // Crawls from `request.url` and returns every visited page, root first.
    // Each call has its own visited set; concurrent calls share nothing.
    pub async fn crawl(&self, request: CrawlRequest) -> CrawlOutcome {
        // Links are serialized by Url, so the seed must be too, or
        // "https://a.test" and a link to "/" would be two pages
        let parsed = Url::parse(&request.url).ok();
        let seed = parsed
            .as_ref()
            .map_or_else(|| request.url.clone(), Url::to_string);
        let seed_host = parsed.and_then(|url| url.host_str().map(str::to_string));

        let run = Arc::new(CrawlRun {
            request,
            visited: VisitedSet::new(),
            seed_host,
        });

        info!(seed = %seed, "starting crawl");
        let outcome = self.visit(Arc::clone(&run), seed, 1).await;
        info!(pages = outcome.len(), visited = run.visited.len(), "crawl finished");

        outcome
    }

    // Recursive step. Boxed because an async fn cannot call itself directly.
    fn visit(&self, run: Arc<CrawlRun>, url: String, depth: usize) -> BoxFuture<'_, CrawlOutcome> {
        async move {
            if !run.visited.mark(&url) {
                debug!(url = %url, depth, "already visited");
                return Vec::new();
            }

            debug!(url = %url, depth, "crawling");

            let node = AssertUnwindSafe(self.process(&run, &url, depth))
                .catch_unwind()
                .await;
            let (result, continuation) = match node {
                Ok(processed) => processed,
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    warn!(url = %url, depth, error = %message, "page processing panicked");
                    let result = PageResult::failed(
                        &url,
                        run.request.method,
                        depth,
                        None,
                        format!("unexpected failure: {}", message),
                    );
                    (result, Continuation::Stop)
                }
            };

            let links = match continuation {
                Continuation::Stop => return vec![result],
                Continuation::Expand(links) => links,
            };

            let delay = self.sibling_delay;
            let children = links.into_iter().enumerate().map(|(index, link)| {
                let run = Arc::clone(&run);
                async move {
                    if !delay.is_zero() && index > 0 {
                        let steps = u32::try_from(index).unwrap_or(u32::MAX);
                        tokio::time::sleep(delay.saturating_mul(steps)).await;
                    }
                    self.visit(run, link, depth + 1).await
                }
            });

            // join_all keeps input order, whatever order the children finish in
            let subtrees = join_all(children).await;

            let mut outcome = Vec::with_capacity(1 + subtrees.iter().map(Vec::len).sum::<usize>());
            outcome.push(result);
            outcome.extend(subtrees.into_iter().flatten());
            outcome
        }
        .boxed()
    }

    // Fetch and analyze one page, then decide whether to expand it
    async fn process(&self, run: &CrawlRun, url: &str, depth: usize) -> (PageResult, Continuation) {
        let request = &run.request;
        let headers = with_user_agent(&request.headers);

        let fetch = FetchRequest {
            url: url.to_string(),
            method: request.method,
            headers: headers.clone(),
            body: request.body.clone(),
        };

        let response = match self.pages.fetch(&fetch).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, depth, error = %e, "fetch failed");
                let result = PageResult::failed(url, request.method, depth, None, e.to_string());
                return (result, Continuation::Stop);
            }
        };

        if !response.is_success() {
            let code = response.status.unwrap_or_default();
            warn!(url, depth, status = code, "page not fetched");
            let result = PageResult::failed(
                url,
                request.method,
                depth,
                response.status,
                format!("Failed to fetch (HTTP {})", code),
            );
            return (result, Continuation::Stop);
        }

        let scan = scan_page(&response.body, url);

        let script_urls = if request.skip_js_analysis {
            Vec::new()
        } else {
            resolve_scripts(url, &scan.script_urls)
        };

        // A rendered page carries no headers to audit
        let header_issues = if request.skip_header_analysis || response.status.is_none() {
            Vec::new()
        } else {
            audit_headers(&response.headers)
        };

        let script_analyses = join_all(
            script_urls
                .iter()
                .map(|script| self.analyze_script(script, &headers, &request.keywords)),
        )
        .await;

        let continuation = self.continuation(run, url, depth, &scan.links).await;

        let report = PageReport {
            url: url.to_string(),
            status_code: response.status,
            method: request.method,
            depth,
            links: scan.links,
            headers: response.headers,
            header_issues,
            script_urls,
            script_analyses,
            inline_script_count: scan.inline_scripts,
        };

        (PageResult::Page(report), continuation)
    }

    async fn continuation(&self, run: &CrawlRun, url: &str, depth: usize, links: &[String]) -> Continuation {
        let limit = run.request.depth_limit;

        if let DepthLimit::Bounded(max_depth) = limit {
            if depth >= max_depth {
                debug!(url, depth, max_depth, "max depth reached, not following links");
                return Continuation::Stop;
            }
        }

        let pending = run
            .visited
            .unvisited(links.iter().filter(|link| run.in_scope(link)));
        if pending.is_empty() {
            return Continuation::Stop;
        }

        if limit == DepthLimit::AskToContinue && !self.confirm.confirm(url, depth, pending.len()).await {
            debug!(url, depth, "operator declined, not following links");
            return Continuation::Stop;
        }

        Continuation::Expand(pending)
    }

    // Scripts are not crawl nodes: no depth, no visited set
    async fn analyze_script(&self, url: &str, headers: &Headers, keywords: &[String]) -> ScriptResult {
        let request = FetchRequest::get(url, headers.clone());

        match self.scripts.fetch(&request).await {
            Ok(response) if response.is_success() => {
                let findings = page::analyze_script(&response.body, keywords);
                ScriptResult::Analyzed(ScriptReport {
                    url: url.to_string(),
                    status_code: response.status,
                    total_comments: findings.total_comments,
                    comments: findings.comments,
                    keywords_found: findings.keywords_found,
                })
            }
            Ok(response) => ScriptResult::Failed(ScriptFailure {
                url: url.to_string(),
                status_code: response.status,
                error: "Failed to fetch".to_string(),
            }),
            Err(e) => {
                debug!(url, error = %e, "script fetch failed");
                ScriptResult::Failed(ScriptFailure {
                    url: url.to_string(),
                    status_code: None,
                    error: e.to_string(),
                })
            }
        }
    }
}

// Resolves script src values against the page URL; unresolvable ones are
// kept as written so their fetch fails visibly
fn resolve_scripts(page_url: &str, sources: &[String]) -> Vec<String> {
    let base = Url::parse(page_url).ok();

    sources
        .iter()
        .map(|src| {
            base.as_ref()
                .and_then(|base| resolve_url(base, src))
                .unwrap_or_else(|| src.clone())
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why BoxFuture?
//    - An async fn that awaits itself would have an infinitely sized future
//    - Boxing the recursive call gives it a fixed size (a pointer)
//
// 2. Why join_all and not tokio::spawn?
//    - Children are polled inside the parent's future, so dropping the
//      top-level crawl drops every branch with it
//    - join_all returns results in input order, which is link order
//
// 3. Why is VisitedSet behind a std Mutex?
//    - The lock is never held across an .await, so a blocking mutex is fine
//    - mark() does check and insert under one lock: two branches racing on
//      the same URL cannot both win
// -----------------------------------------------------------------------------
