// Transport configuration for building reqwest::Client instances.
//
// The dashboard is a public cloud API behind a real certificate chain, so
// there are no TLS knobs here -- just timeout and default headers.

use std::time::Duration;

/// Transport settings shared by every request the client makes.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with the given default headers.
    ///
    /// Used by `DashboardClient` to inject the `Authorization` header.
    pub fn build_client_with_headers(
        &self,
        headers: reqwest::header::HeaderMap,
    ) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("poe-report/0.1.0")
            .default_headers(headers)
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
