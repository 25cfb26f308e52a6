// src/lib.rs
// =============================================================================
// sara: crawl web applications and report security-relevant signals, or
// brute-force directories and subdomains.
//
// Layout:
// - fetch:     getting a page (plain HTTP or headless render)
// - page:      analysis of one page (links, scripts, headers, comments)
// - crawl:     the recursive, concurrent crawl engine
// - enumerate: sequential directory / subdomain probing
// - input:     targets, headers, keywords and wordlists from the command line
// - error:     typed errors shared by all of the above
// =============================================================================

pub mod crawl;
pub mod enumerate;
pub mod error;
pub mod fetch;
pub mod input;
pub mod page;
