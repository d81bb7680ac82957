//! Shareable map-viewer links.
//!
//! Generates Google Maps directions URLs for a route so it can be opened in
//! a browser or the Maps app.

use url::Url;

/// Base URL for query-style links.
const QUERY_BASE_URL: &str = "https://www.google.com/maps/dir/";

/// How addresses are encoded into the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewerUrlStyle {
    /// `?api=1&origin=..&destination=..&waypoints=a|b` (Maps URLs API).
    #[default]
    Query,
    /// `/maps/dir/a/b/c` with one path segment per stop.
    Path,
}

/// Build a directions link visiting `addresses` in order.
///
/// Each address is percent-encoded. Returns `None` for fewer than two
/// addresses.
///
/// # Examples
///
/// ```
/// use route_optimizer::viewer::{ViewerUrlStyle, viewer_url};
///
/// let stops = vec!["Depot".to_string(), "Main St 1".to_string()];
/// let url = viewer_url(&stops, ViewerUrlStyle::Path).unwrap();
/// assert_eq!(url, "https://www.google.com/maps/dir/Depot/Main%20St%201");
/// ```
pub fn viewer_url(addresses: &[String], style: ViewerUrlStyle) -> Option<String> {
    if addresses.len() < 2 {
        return None;
    }
    match style {
        ViewerUrlStyle::Query => query_url(addresses),
        ViewerUrlStyle::Path => path_url(addresses),
    }
}

fn query_url(addresses: &[String]) -> Option<String> {
    let (origin, rest) = addresses.split_first()?;
    let (destination, middle) = rest.split_last()?;

    let mut params = vec![
        ("api", "1".to_string()),
        ("origin", origin.clone()),
        ("destination", destination.clone()),
        ("travelmode", "driving".to_string()),
    ];
    if !middle.is_empty() {
        params.push(("waypoints", middle.join("|")));
    }

    Url::parse_with_params(QUERY_BASE_URL, &params)
        .ok()
        .map(String::from)
}

fn path_url(addresses: &[String]) -> Option<String> {
    let mut url = Url::parse(QUERY_BASE_URL).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(addresses);
    Some(url.into())
}
