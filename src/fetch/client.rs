//! Blocking HTTP client with a browser-like User-Agent and a bounded timeout. One attempt per request.

use std::time::Duration;

/// Browser-like User-Agent; some sites serve stripped pages to unknown agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_REDIRECTS: usize = 10;

/// Thin wrapper over `reqwest::blocking::Client`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::blocking::Client,
}

impl HttpClient {
    /// Client with the default User-Agent and timeout.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::builder().build()
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Perform a GET request. Blocks until a response arrives or the timeout elapses.
    pub fn get(&self, url: &str) -> Result<reqwest::blocking::Response, reqwest::Error> {
        tracing::debug!(url, "GET");
        self.inner.get(url).send()
    }

    /// GET with query parameters appended to `url`.
    pub fn get_with_query(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::blocking::Response, reqwest::Error> {
        tracing::debug!(url, ?query, "GET");
        self.inner.get(url).query(query).send()
    }
}

/// Builder for [HttpClient] with optional User-Agent and timeout.
#[derive(Debug)]
pub struct HttpClientBuilder {
    user_agent: Option<String>,
    timeout_secs: u64,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HttpClientBuilder {
    /// Set a custom User-Agent. If not set, [DEFAULT_USER_AGENT] is used.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set request timeout in seconds. Default 30.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<HttpClient, reqwest::Error> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let inner = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(HttpClient { inner })
    }
}
