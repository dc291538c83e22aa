//! Error type for page fetches.

use thiserror::Error;

/// Failure to obtain the page markup. Maps to CLI exit code 2.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL: {input}: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Failed to create HTTP client: {source}")]
    ClientBuild { source: reqwest::Error },

    #[error("Network error: could not reach {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body from {url}: {source}")]
    BodyRead { url: String, source: reqwest::Error },
}

impl FetchError {
    /// True when the request did not finish within the configured timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Network { source, .. } | FetchError::BodyRead { source, .. } => {
                source.is_timeout()
            }
            _ => false,
        }
    }
}
