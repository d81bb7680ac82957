//! Top-level error type for the route optimizer binary.

use crate::cache::CacheError;
use crate::directions::{RouteError, TransportError};
use crate::domain::StopListError;

/// Anything that can stop a run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The stop list could not be read or failed validation.
    #[error(transparent)]
    Stops(#[from] StopListError),

    /// The directions provider could not produce both routes.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// The cache directory could not be prepared or cleared.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        AppError::Route(RouteError::Transport(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_transparently() {
        let err = AppError::from(StopListError::TooFew { found: 0 });
        assert_eq!(err.to_string(), "at least 2 addresses are required (found 0)");

        let err = AppError::from(RouteError::Configuration("no key".into()));
        assert_eq!(err.to_string(), "configuration error: no key");

        let err = AppError::from(TransportError::Client("tls".into()));
        assert!(matches!(err, AppError::Route(RouteError::Transport(_))));
    }
}
