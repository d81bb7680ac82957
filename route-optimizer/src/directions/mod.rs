//! Directions provider client.
//!
//! This module talks to the Google Maps Directions API, which both measures
//! a multi-stop route and, when asked, chooses the waypoint order that
//! minimizes total travel.
//!
//! Key characteristics:
//! - Requests carry at most 25 waypoints; the destination is the last one
//! - Prefixing the waypoints with `optimize:true|` asks for reordering, and
//!   the chosen order comes back as `waypoint_order`
//! - Failures are reported in-band via the `status` field, often with
//!   per-address geocoding results
//!
//! [`RouteProvider`] is the entry point: it consults the
//! [`RouteCache`](crate::cache::RouteCache) before calling a
//! [`DirectionsTransport`], and only `convert` knows the response shape.

mod client;
mod convert;
mod error;
mod mock;
mod provider;
mod types;

pub use client::{
    DEFAULT_BASE_URL, DirectionsTransport, HttpTransport, ProviderConfig, RetryConfig,
};
pub use convert::{MALFORMED_RESPONSE, route_from_response};
pub use error::{FailedAddress, ProviderError, RouteError, TransportError};
pub use mock::MockTransport;
pub use provider::RouteProvider;
pub use types::{
    DirectionsQuery, DirectionsResponse, GeocodedWaypoint, Leg, Measure, OPTIMIZE_MARKER, Route,
    STATUS_OK, TRAVEL_MODE,
};
