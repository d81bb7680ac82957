//! Route provider error types.

use std::fmt;

/// Errors surfaced by [`RouteProvider`](super::RouteProvider).
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Missing credential or unusable input; never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider answered with a non-success status.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider could not be reached, even after retrying.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// An input address the provider could not geocode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAddress {
    /// 1-based position in `[origin] + waypoints`.
    pub position: usize,
    /// The address as submitted.
    pub address: String,
    /// Geocoder status reported for it (e.g. `"ZERO_RESULTS"`).
    pub geocoder_status: String,
}

/// A definitive rejection from the directions provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    /// Provider status string (e.g. `"NOT_FOUND"`).
    pub status: String,
    /// Addresses whose geocoding failed, when the provider reported them.
    pub failed_addresses: Vec<FailedAddress>,
    /// Provider-supplied diagnostic message.
    pub message: Option<String>,
    /// All submitted addresses, kept only when the provider gave no
    /// per-address geocoding results.
    pub input_addresses: Vec<String>,
}

impl ProviderError {
    /// An error with just a status and message.
    pub fn new(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            failed_addresses: Vec::new(),
            message: Some(message.into()),
            input_addresses: Vec::new(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "directions API error: {}", self.status)?;

        if !self.failed_addresses.is_empty() {
            write!(f, "\n\nInvalid or not found addresses:")?;
            for failed in &self.failed_addresses {
                write!(
                    f,
                    "\n  - Address {}: {}\n    Geocoder status: {}",
                    failed.position, failed.address, failed.geocoder_status
                )?;
            }
        } else if let Some((origin, waypoints)) = self.input_addresses.split_first() {
            write!(f, "\n\nInput addresses:\n  - Origin: {origin}")?;
            for (i, waypoint) in waypoints.iter().enumerate() {
                write!(f, "\n  - Waypoint {}: {waypoint}", i + 1)?;
            }
        }

        if let Some(message) = &self.message {
            write!(f, "\n\nAPI message: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ProviderError {}

/// Failures talking to the provider, as opposed to rejections by it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("directions request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The server answered with a non-2xx HTTP status.
    #[error("directions request failed with HTTP {status}")]
    Http { status: u16 },

    /// Connection or protocol failure.
    #[error("network error: {0}")]
    Network(String),

    /// The body was not a valid directions response.
    #[error("failed to decode directions response: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl TransportError {
    /// Whether retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Timeout { .. } | TransportError::Network(_) => true,
            TransportError::Http { status } => *status == 429 || *status >= 500,
            TransportError::Decode(_) | TransportError::Client(_) => false,
        }
    }
}
