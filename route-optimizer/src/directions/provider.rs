//! Cached route provider.
//!
//! Wraps a [`DirectionsTransport`] with the on-disk [`RouteCache`], retries
//! transient transport failures, and translates responses into
//! [`RouteRecord`]s.

use tracing::{debug, info, warn};

use crate::cache::{CacheLookup, RequestKey, RouteCache};
use crate::domain::RouteRecord;

use super::client::{DirectionsTransport, ProviderConfig};
use super::convert::route_from_response;
use super::error::{RouteError, TransportError};
use super::types::{DirectionsQuery, DirectionsResponse};

/// Route provider with caching.
///
/// Requests run one at a time; callers await each fetch before issuing the
/// next.
#[derive(Debug)]
pub struct RouteProvider<T> {
    transport: T,
    cache: RouteCache,
    config: ProviderConfig,
}

impl<T: DirectionsTransport> RouteProvider<T> {
    /// Create a new provider.
    pub fn new(transport: T, cache: RouteCache, config: ProviderConfig) -> Self {
        Self {
            transport,
            cache,
            config,
        }
    }

    /// Fetch the route from `origin` through `waypoints`.
    ///
    /// The destination is the last waypoint. With `optimize` set, the
    /// provider may reorder the waypoints; the returned record lists them in
    /// the chosen order.
    ///
    /// A cached record for the same request is returned without contacting
    /// the provider.
    pub async fn fetch_route(
        &self,
        origin: &str,
        waypoints: &[String],
        optimize: bool,
    ) -> Result<RouteRecord, RouteError> {
        let api_key = self.api_key()?;
        let query = DirectionsQuery::new(origin, waypoints, optimize).ok_or_else(|| {
            RouteError::Configuration("at least one waypoint is required".to_string())
        })?;
        let key = RequestKey::from_params(query.params());

        match self.cache.get(&key) {
            CacheLookup::Hit(record) => {
                info!(%key, optimize, "using cached route");
                return Ok(record);
            }
            lookup => debug!(%key, ?lookup, "route cache miss"),
        }

        info!(optimize, waypoints = waypoints.len(), "requesting directions");
        let response = self.send_with_retry(&query, api_key).await?;
        let record = route_from_response(response, origin, waypoints, optimize)?;

        if let Err(err) = self.cache.put(&key, &record) {
            warn!(%key, error = %err, "failed to cache route");
        }

        Ok(record)
    }

    /// Fetch the input-order route and the optimized route for `stops`.
    ///
    /// The first stop is the origin and the rest are waypoints. The two
    /// fetches run sequentially.
    pub async fn optimize_route(
        &self,
        stops: &[String],
    ) -> Result<(RouteRecord, RouteRecord), RouteError> {
        let Some((origin, waypoints)) = stops.split_first().filter(|(_, w)| !w.is_empty()) else {
            return Err(RouteError::Configuration(
                "need at least 2 addresses to optimize route".to_string(),
            ));
        };
        self.api_key()?;

        info!("calculating original route (input order)");
        let original = self.fetch_route(origin, waypoints, false).await?;
        info!("calculating optimized route");
        let optimized = self.fetch_route(origin, waypoints, true).await?;
        Ok((original, optimized))
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Access the route cache.
    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    fn api_key(&self) -> Result<&str, RouteError> {
        self.config.api_key().ok_or_else(|| {
            RouteError::Configuration(
                "no directions API key configured \
                 (set GOOGLE_MAPS_API_KEY in the environment or a .env file)"
                    .to_string(),
            )
        })
    }

    /// Send a request, retrying transient failures with exponential backoff.
    async fn send_with_retry(
        &self,
        query: &DirectionsQuery,
        api_key: &str,
    ) -> Result<DirectionsResponse, TransportError> {
        let retry = &self.config.retry;
        let mut attempt = 0;
        let mut delay = retry.initial_delay;

        loop {
            match self.transport.get(query, api_key).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_transient() && attempt < retry.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %err, ?delay, "directions request failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay = delay
                        .saturating_mul(retry.backoff_factor)
                        .min(retry.max_delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
