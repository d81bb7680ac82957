//! Directions API HTTP transport.
//!
//! The transport only moves requests and responses. Caching, retries and
//! translation into route records live in [`RouteProvider`](super::RouteProvider).

use std::future::Future;
use std::time::Duration;

use super::error::TransportError;
use super::types::{DirectionsQuery, DirectionsResponse};

/// Default endpoint for the Directions API.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Retry policy for transient transport failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: u32,
}

impl RetryConfig {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            backoff_factor: 2,
        }
    }
}

/// Configuration for the route provider and its HTTP transport.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key; `None` or empty means requests cannot be made.
    pub api_key: Option<String>,
    /// Endpoint for directions requests.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
}

impl ProviderConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryConfig::default(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The API key, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Something that can answer directions queries.
///
/// Implemented by [`HttpTransport`] for the real API and by
/// [`MockTransport`](super::MockTransport) for tests.
pub trait DirectionsTransport {
    /// Send one directions request.
    fn get(
        &self,
        query: &DirectionsQuery,
        api_key: &str,
    ) -> impl Future<Output = Result<DirectionsResponse, TransportError>> + Send;
}

/// Directions API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: &ProviderConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                timeout_secs: self.timeout_secs,
            };
        }
        if let Some(status) = error.status() {
            return TransportError::Http {
                status: status.as_u16(),
            };
        }
        TransportError::Network(error.to_string())
    }
}

impl DirectionsTransport for HttpTransport {
    async fn get(
        &self,
        query: &DirectionsQuery,
        api_key: &str,
    ) -> Result<DirectionsResponse, TransportError> {
        let mut params = query.params().to_vec();
        params.push(("key", api_key));

        let response = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| self.convert_reqwest_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.convert_reqwest_error(&e))?;

        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
