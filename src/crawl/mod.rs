// src/crawl/mod.rs
// =============================================================================
// This module handles recursive website crawling and inspection.
//
// Features:
// - Concurrent fan-out: every new link on a page is crawled at the same time
// - One shared visited set per crawl, so a URL is fetched at most once
// - Depth limit, or unbounded crawling with an operator prompt per page
// - Results flattened root-first, children in link order
// =============================================================================

mod confirm;
mod engine;
mod result;
mod visited;

pub use confirm::{Confirm, FixedAnswer, StdinConfirm};
pub use engine::{CrawlRequest, CrawlScope, Crawler, DepthLimit};
pub use result::{CrawlOutcome, PageFailure, PageReport, PageResult, ScriptFailure, ScriptReport, ScriptResult, SeedReport};
