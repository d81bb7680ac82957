//! Domain types for the route optimizer.
//!
//! These types are validated at construction time, so code that receives
//! them can trust their invariants: a `StopList` always has an origin and at
//! least one waypoint, and a `RouteRecord` is the provider-independent shape
//! every downstream component consumes.

mod route;
mod stops;

pub use route::{RouteRecord, is_permutation};
pub use stops::{DuplicateStop, MAX_STOPS, MIN_STOPS, StopList, StopListError};
