use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::config::HarvestConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("{url} timed out")]
    Timeout { url: String },
    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// GET-only client shared by catalogue and detail fetches.
///
/// A single limiter spaces every request by at least `request_spacing`,
/// no matter how many workers share the client.
pub struct HttpClient {
    client: Client,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl HttpClient {
    pub fn new(config: &HarvestConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        // One cell per period, burst of one: a zero spacing disables limiting.
        let limiter = Quota::with_period(config.request_spacing).map(RateLimiter::direct);

        Ok(Self { client, limiter })
    }

    /// Fetch `url` and return the response body as text.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { url: url.to_string() }
            } else {
                FetchError::Transport { url: url.to_string(), source: e }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { url: url.to_string() }
            } else {
                FetchError::Body { url: url.to_string(), source: e }
            }
        })
    }
}

#[cfg(test)]
pub(crate) fn test_config(catalogue_url: String) -> HarvestConfig {
    HarvestConfig {
        catalogue_url,
        request_spacing: std::time::Duration::from_millis(5),
        request_timeout: std::time::Duration::from_secs(2),
        ..HarvestConfig::default()
    }
}
