use thiserror::Error;

/// Top-level error type for the `meraki-api` crate.
///
/// Covers authentication, transport, rate limiting, and API-reported
/// failures. Nothing in this crate retries: every error propagates to the
/// caller and aborts the run.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Invalid API key (rejected by the dashboard with HTTP 401).
    #[error("Invalid API key")]
    InvalidApiKey,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Dashboard API ───────────────────────────────────────────────
    /// Rate limited by the dashboard (HTTP 429). Includes Retry-After in seconds.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Structured error from the dashboard (parsed from the `{"errors": [..]}` body).
    #[error("Dashboard API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Returns `true` if this is a transient error that a retrying caller
    /// could reasonably attempt again.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            _ => false,
        }
    }
}
