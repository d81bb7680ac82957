//! Mock directions transport for testing without API access.
//!
//! Serves canned responses and records every query it receives, so tests
//! can assert how many provider calls were actually made.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use super::client::DirectionsTransport;
use super::error::TransportError;
use super::types::{DirectionsQuery, DirectionsResponse};

type Reply = Result<DirectionsResponse, TransportError>;

/// Transport that replays scripted replies.
///
/// Replies are consumed in order. Once the script runs out, the fallback
/// reply (if any) is returned for every further call.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Reply>>,
    fallback: Option<Reply>,
    queries: Mutex<Vec<DirectionsQuery>>,
}

impl MockTransport {
    /// A transport that answers every call with `response`.
    pub fn always(response: DirectionsResponse) -> Self {
        Self {
            fallback: Some(Ok(response)),
            ..Self::default()
        }
    }

    /// A transport that answers with `replies` in order, then fails.
    pub fn sequence(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    /// A transport built from a raw JSON response body.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::always(serde_json::from_str(json)?))
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Every query received so far, oldest first.
    pub fn queries(&self) -> Vec<DirectionsQuery> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_reply(&self) -> Reply {
        let scripted = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        scripted
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| Err(TransportError::Network("mock script exhausted".to_string())))
    }
}

impl DirectionsTransport for MockTransport {
    async fn get(
        &self,
        query: &DirectionsQuery,
        _api_key: &str,
    ) -> Result<DirectionsResponse, TransportError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());
        self.next_reply()
    }
}
