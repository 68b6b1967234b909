//! Async HTTP client wrapping reqwest.
//!
//! Sends browser-like headers: the marketing site serves degraded markup to
//! clients that do not look like a desktop browser. No retries; a failed
//! request surfaces immediately.

use crate::error::{FiagroError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::time::Duration;

/// Desktop Chrome user agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                              AppleWebKit/537.36 (KHTML, like Gecko) \
                              Chrome/120.0.0.0 Safari/537.36";

pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";
pub const ACCEPT_JSON: &str = "application/json";
const ACCEPT_LANGUAGE_PT_BR: &str = "pt-BR,pt;q=0.9,en;q=0.8";

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Shared HTTP client for every upstream.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client whose requests time out after `timeout` unless a
    /// per-request timeout is given.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE_PT_BR),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` with the given `Accept` header and timeout.
    ///
    /// Transport errors and timeouts become
    /// [`FiagroError::UpstreamUnavailable`]. Non-2xx statuses are returned
    /// as-is so callers can tell a missing fund from an outage.
    pub async fn get(&self, url: &str, accept: &'static str, timeout: Duration) -> Result<HttpResponse> {
        tracing::debug!("GET {url}");
        let r = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .timeout(timeout)
            .send()
            .await?;

        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let body = r.text().await?;

        Ok(HttpResponse {
            url: url.to_string(),
            final_url,
            status,
            body,
        })
    }

    /// GET `url` and fail with `UpstreamUnavailable` on a non-2xx status.
    pub async fn get_ok(&self, url: &str, accept: &'static str, timeout: Duration) -> Result<HttpResponse> {
        let resp = self.get(url, accept, timeout).await?;
        if !resp.is_success() {
            return Err(FiagroError::unavailable(format!(
                "{} returned status {}",
                resp.url, resp.status
            )));
        }
        Ok(resp)
    }
}
