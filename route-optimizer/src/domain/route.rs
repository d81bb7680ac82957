//! Normalized route record.
//!
//! `RouteRecord` is the boundary type between the directions provider and
//! everything downstream (cache, metrics, rendering). Provider-specific JSON
//! never leaks past `directions::convert`.

use serde::{Deserialize, Serialize};

/// A route through an ordered list of stops, as reported by the provider.
///
/// The first address is always the origin. When the provider reordered the
/// waypoints, `waypoint_order[i]` is the index into the original waypoint
/// list of the stop visited at position `i + 1`.
///
/// Records are immutable once built: fields are only reachable through
/// accessors.
///
/// # Examples
///
/// ```
/// use route_optimizer::domain::RouteRecord;
///
/// let record = RouteRecord::new(
///     vec!["Depot".to_string(), "Shop".to_string()],
///     5_000,
///     600,
///     None,
/// );
/// assert_eq!(record.origin(), Some("Depot"));
/// assert_eq!(record.distance_m(), 5_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    addresses: Vec<String>,
    distance_m: u64,
    duration_s: u64,
    waypoint_order: Option<Vec<usize>>,
}

impl RouteRecord {
    /// Create a record from already-assembled parts.
    pub fn new(
        addresses: Vec<String>,
        distance_m: u64,
        duration_s: u64,
        waypoint_order: Option<Vec<usize>>,
    ) -> Self {
        Self {
            addresses,
            distance_m,
            duration_s,
            waypoint_order,
        }
    }

    /// Addresses in visiting order, origin first.
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// The starting address.
    pub fn origin(&self) -> Option<&str> {
        self.addresses.first().map(String::as_str)
    }

    /// Total driving distance in meters.
    pub fn distance_m(&self) -> u64 {
        self.distance_m
    }

    /// Total driving time in seconds.
    pub fn duration_s(&self) -> u64 {
        self.duration_s
    }

    /// Provider-chosen waypoint order, if the route was optimized.
    pub fn waypoint_order(&self) -> Option<&[usize]> {
        self.waypoint_order.as_deref()
    }

    /// Check the structural invariants of a record.
    ///
    /// A record needs an origin and at least one further stop, and any
    /// waypoint order must be a permutation of the waypoint indices.
    pub fn is_well_formed(&self) -> bool {
        if self.addresses.len() < 2 {
            return false;
        }
        match &self.waypoint_order {
            Some(order) => is_permutation(order, self.addresses.len() - 1),
            None => true,
        }
    }
}

/// Returns true if `order` contains every index in `0..len` exactly once.
pub fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &idx in order {
        match seen.get_mut(idx) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}
