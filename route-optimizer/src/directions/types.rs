//! Directions API request and response DTOs.
//!
//! The response types map directly to the Directions API JSON. Most fields
//! are optional or defaulted because the API omits them on failure statuses.

use serde::Deserialize;

/// Travel mode sent with every request.
pub const TRAVEL_MODE: &str = "driving";

/// Marker prepended to the waypoints parameter to request reordering.
pub const OPTIMIZE_MARKER: &str = "optimize:true";

/// Status string for a successful response.
pub const STATUS_OK: &str = "OK";

/// The semantic parameters of a directions request.
///
/// Credentials are not part of this type. The transport receives them
/// separately, so they never reach the cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionsQuery {
    /// Starting address.
    pub origin: String,
    /// Final address (the last waypoint).
    pub destination: String,
    /// Pipe-joined waypoints, optionally prefixed with [`OPTIMIZE_MARKER`].
    pub waypoints: String,
    /// Travel mode, always [`TRAVEL_MODE`].
    pub mode: &'static str,
}

impl DirectionsQuery {
    /// Build the query for a route from `origin` through `waypoints`.
    ///
    /// Returns `None` if there are no waypoints, since the destination is
    /// the last waypoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_optimizer::directions::DirectionsQuery;
    ///
    /// let waypoints = vec!["Bakery".to_string(), "Market".to_string()];
    /// let query = DirectionsQuery::new("Depot", &waypoints, true).unwrap();
    /// assert_eq!(query.destination, "Market");
    /// assert_eq!(query.waypoints, "optimize:true|Bakery|Market");
    /// ```
    pub fn new(origin: &str, waypoints: &[String], optimize: bool) -> Option<Self> {
        let destination = waypoints.last()?.clone();
        let joined = waypoints.join("|");
        let waypoints = if optimize {
            format!("{OPTIMIZE_MARKER}|{joined}")
        } else {
            joined
        };
        Some(Self {
            origin: origin.to_string(),
            destination,
            waypoints,
            mode: TRAVEL_MODE,
        })
    }

    /// Whether the query asks the provider to reorder waypoints.
    pub fn is_optimized(&self) -> bool {
        self.waypoints.starts_with(OPTIMIZE_MARKER)
    }

    /// Named parameters, as sent on the wire and hashed for the cache key.
    pub fn params(&self) -> [(&'static str, &str); 4] {
        [
            ("origin", self.origin.as_str()),
            ("destination", self.destination.as_str()),
            ("waypoints", self.waypoints.as_str()),
            ("mode", self.mode),
        ]
    }
}

/// Top-level Directions API response.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// `"OK"` on success, otherwise a status such as `"NOT_FOUND"`.
    pub status: String,

    /// Candidate routes; the first is used.
    #[serde(default)]
    pub routes: Vec<Route>,

    /// Per-address geocoding results, in request order (origin first).
    #[serde(default)]
    pub geocoded_waypoints: Vec<GeocodedWaypoint>,

    /// Human-readable diagnostic on failure.
    pub error_message: Option<String>,
}

impl DirectionsResponse {
    /// Whether the status indicates success.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// One route through all requested stops.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    /// Stop-to-stop segments.
    #[serde(default)]
    pub legs: Vec<Leg>,

    /// Visiting order chosen by the provider when optimization was requested.
    pub waypoint_order: Option<Vec<usize>>,
}

/// One origin-to-next-stop segment.
#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    /// Segment distance.
    pub distance: Measure,
    /// Segment driving time.
    pub duration: Measure,
}

/// A measured quantity with its display text.
#[derive(Debug, Clone, Deserialize)]
pub struct Measure {
    /// Meters for distances, seconds for durations.
    pub value: u64,
    /// Provider-formatted text (e.g. "5.0 km").
    pub text: Option<String>,
}

/// Geocoding outcome for a single requested address.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodedWaypoint {
    /// `"OK"` when the address was found.
    pub geocoder_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waypoints(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn query_without_waypoints_is_rejected() {
        assert!(DirectionsQuery::new("Depot", &[], false).is_none());
    }

    #[test]
    fn query_joins_waypoints() {
        let query = DirectionsQuery::new("Depot", &waypoints(&["A", "B", "C"]), false).unwrap();
        assert_eq!(query.origin, "Depot");
        assert_eq!(query.destination, "C");
        assert_eq!(query.waypoints, "A|B|C");
        assert_eq!(query.mode, "driving");
        assert!(!query.is_optimized());
    }

    #[test]
    fn optimized_query_has_marker() {
        let query = DirectionsQuery::new("Depot", &waypoints(&["A"]), true).unwrap();
        assert_eq!(query.waypoints, "optimize:true|A");
        assert!(query.is_optimized());
    }

    #[test]
    fn params_exclude_credentials() {
        let query = DirectionsQuery::new("Depot", &waypoints(&["A"]), false).unwrap();
        let names: Vec<_> = query.params().iter().map(|(k, _)| *k).collect();
        assert_eq!(names, ["origin", "destination", "waypoints", "mode"]);
    }

    #[test]
    fn deserialize_ok_response() {
        let json = r#"{
            "status": "OK",
            "geocoded_waypoints": [{"geocoder_status": "OK"}, {"geocoder_status": "OK"}],
            "routes": [{
                "legs": [
                    {"distance": {"value": 5000, "text": "5.0 km"},
                     "duration": {"value": 600, "text": "10 mins"}}
                ],
                "waypoint_order": [0]
            }]
        }"#;
        let response: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_ok());
        assert_eq!(response.routes[0].legs[0].distance.value, 5000);
        assert_eq!(response.routes[0].waypoint_order, Some(vec![0]));
    }

    #[test]
    fn deserialize_error_response() {
        let json = r#"{"status": "REQUEST_DENIED", "error_message": "bad key", "routes": []}"#;
        let response: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert!(!response.is_ok());
        assert!(response.geocoded_waypoints.is_empty());
        assert_eq!(response.error_message.as_deref(), Some("bad key"));
    }
}
