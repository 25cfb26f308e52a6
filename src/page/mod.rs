// src/page/mod.rs
// =============================================================================
// Everything we learn from one fetched page.
//
// Submodules:
// - html: links, script references and inline script count
// - headers: security header audit
// - script: comment and keyword analysis of JavaScript bodies
//
// All functions here are pure: no I/O, no shared state.
// =============================================================================

mod headers;
mod html;
mod script;

pub use headers::{audit_headers, HeaderIssue};
pub use html::{count_inline_scripts, extract_links, extract_script_urls, resolve_url, scan_page, PageScan};
pub use script::{analyze_script, extract_comments, find_keywords, ScriptFindings};
