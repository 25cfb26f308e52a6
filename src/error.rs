// src/error.rs
// =============================================================================
// Typed errors shared across the crate.
//
// - FetchError: everything that can go wrong while talking to a server
//   (or to the headless browser). The crawler turns these into error
//   records instead of aborting.
// - InputError: bad targets, unreadable files, wrong target kind for a
//   mode. These stop the run before any request is sent.
//
// The application layer (main.rs) wraps both into anyhow::Error.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Hostname could not be resolved
    #[error("could not resolve hostname: {0}")]
    Dns(String),

    /// TCP connection refused, reset or unreachable
    #[error("connection failed: {0}")]
    Connect(String),

    /// Certificate or handshake failure
    #[error("TLS error: {0}")]
    Tls(String),

    #[error("too many redirects")]
    TooManyRedirects,

    /// Any other transport level failure (invalid header, body error, ...)
    #[error("{0}")]
    Request(String),

    /// Headless browser failure (launch, navigation, content read)
    #[error("render failed: {0}")]
    Render(String),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid target '{0}': must be a URL, a domain or a file containing URLs")]
    MalformedTarget(String),

    #[error("no valid targets provided")]
    NoTargets,

    #[error("{mode} requires exactly one target, got {count}")]
    TargetCount { mode: &'static str, count: usize },

    #[error("{mode} needs a full URL (e.g. https://example.com), not '{target}'")]
    ExpectedUrl { mode: &'static str, target: String },

    #[error("{mode} needs a bare domain (e.g. example.com), not '{target}'")]
    ExpectedDomain { mode: &'static str, target: String },

    #[error("wordlist file '{}' not found", .0.display())]
    MissingWordlist(PathBuf),

    #[error("failed to read {kind} file {}: {source}", path.display())]
    FileRead {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("headless rendering is not available: rebuild with `--features headless`")]
    HeadlessUnavailable,
}
