//! Markup fetch: one GET per page, no retries.

mod client;
mod error;

pub use client::{HttpClient, HttpClientBuilder, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use error::FetchError;

use reqwest::Url;

/// Parse `input` and require an http or https URL with a host.
pub fn parse_page_url(input: &str) -> Result<Url, FetchError> {
    let url = Url::parse(input.trim()).map_err(|e| FetchError::InvalidUrl {
        input: input.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(FetchError::InvalidUrl {
                input: input.to_string(),
                reason: format!("unsupported scheme '{}' (expected http or https)", other),
            })
        }
    }
    if url.host_str().is_none() {
        return Err(FetchError::InvalidUrl {
            input: input.to_string(),
            reason: "URL has no host".to_string(),
        });
    }
    Ok(url)
}

/// Check response status and read body as text.
fn check_response(response: reqwest::blocking::Response, url: &str) -> Result<String, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    response.text().map_err(|e| FetchError::BodyRead {
        url: url.to_string(),
        source: e,
    })
}

/// Fetch the raw markup of `url`. Any non-2xx status is an error.
pub fn fetch_page(client: &HttpClient, url: &str) -> Result<String, FetchError> {
    let parsed = parse_page_url(url)?;
    let response = client
        .get(parsed.as_str())
        .map_err(|e| FetchError::Network {
            url: url.to_string(),
            source: e,
        })?;
    let body = check_response(response, url)?;
    tracing::debug!(url, bytes = body.len(), "fetched page");
    Ok(body)
}
