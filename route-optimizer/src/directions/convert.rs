//! Conversion from Directions API responses to route records.
//!
//! This is the only place that knows the provider's response shape. Other
//! providers or test transports only need to produce a
//! [`DirectionsResponse`] to reuse the rest of the pipeline.

use crate::domain::{RouteRecord, is_permutation};

use super::error::{FailedAddress, ProviderError};
use super::types::DirectionsResponse;

/// Status used when an `OK` response cannot be turned into a route.
pub const MALFORMED_RESPONSE: &str = "MALFORMED_RESPONSE";

/// Translate a directions response into a [`RouteRecord`].
///
/// On success, leg distances and durations are summed. When `optimize` is
/// set and the provider returned a non-empty waypoint order, the waypoints
/// are listed in that order; otherwise they keep their input order.
///
/// A non-`OK` status becomes a [`ProviderError`] naming any addresses the
/// provider failed to geocode.
pub fn route_from_response(
    response: DirectionsResponse,
    origin: &str,
    waypoints: &[String],
    optimize: bool,
) -> Result<RouteRecord, ProviderError> {
    if !response.is_ok() {
        return Err(provider_error(response, origin, waypoints));
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::new(MALFORMED_RESPONSE, "response contained no routes"))?;

    if route.legs.is_empty() {
        return Err(ProviderError::new(
            MALFORMED_RESPONSE,
            "route contained no legs",
        ));
    }

    let distance_m = route.legs.iter().map(|leg| leg.distance.value).sum();
    let duration_s = route.legs.iter().map(|leg| leg.duration.value).sum();

    let waypoint_order = if optimize {
        route.waypoint_order.filter(|order| !order.is_empty())
    } else {
        None
    };

    let mut addresses = Vec::with_capacity(waypoints.len() + 1);
    addresses.push(origin.to_string());
    match &waypoint_order {
        Some(order) => {
            if !is_permutation(order, waypoints.len()) {
                return Err(ProviderError::new(
                    MALFORMED_RESPONSE,
                    format!(
                        "waypoint order {order:?} is not a permutation of {} waypoints",
                        waypoints.len()
                    ),
                ));
            }
            // Every index is in range: checked by is_permutation above.
            addresses.extend(order.iter().filter_map(|&idx| waypoints.get(idx).cloned()));
        }
        None => addresses.extend_from_slice(waypoints),
    }

    Ok(RouteRecord::new(
        addresses,
        distance_m,
        duration_s,
        waypoint_order,
    ))
}

/// Build the error for a non-`OK` response.
fn provider_error(
    response: DirectionsResponse,
    origin: &str,
    waypoints: &[String],
) -> ProviderError {
    let all_addresses: Vec<&str> = std::iter::once(origin)
        .chain(waypoints.iter().map(String::as_str))
        .collect();

    let failed_addresses = response
        .geocoded_waypoints
        .iter()
        .zip(&all_addresses)
        .enumerate()
        .filter_map(|(i, (geocoded, address))| {
            let status = geocoded.geocoder_status.as_deref().unwrap_or("UNKNOWN");
            (status != "OK").then(|| FailedAddress {
                position: i + 1,
                address: (*address).to_string(),
                geocoder_status: status.to_string(),
            })
        })
        .collect();

    let input_addresses = if response.geocoded_waypoints.is_empty() {
        all_addresses.iter().map(|s| (*s).to_string()).collect()
    } else {
        Vec::new()
    };

    ProviderError {
        status: response.status,
        failed_addresses,
        message: response.error_message,
        input_addresses,
    }
}
