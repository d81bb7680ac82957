//! End-to-end runs of the route pipeline against a mock transport.

use route_optimizer::cache::{CacheConfig, CacheLookup, RequestKey, RouteCache};
use route_optimizer::directions::{
    DirectionsQuery, MockTransport, ProviderConfig, RetryConfig, RouteError, RouteProvider,
};
use route_optimizer::domain::{RouteRecord, StopList};
use route_optimizer::metrics::{FuelConfig, compare};
use route_optimizer::report::Report;
use route_optimizer::viewer::{ViewerUrlStyle, viewer_url};
use tempfile::tempdir;

const ONE_LEG: &str = r#"{
    "status": "OK",
    "geocoded_waypoints": [{"geocoder_status": "OK"}, {"geocoder_status": "OK"}],
    "routes": [{
        "legs": [{"distance": {"value": 5000, "text": "5.0 km"},
                  "duration": {"value": 600, "text": "10 mins"}}],
        "waypoint_order": [0]
    }]
}"#;

fn provider_in(dir: &std::path::Path, transport: MockTransport) -> RouteProvider<MockTransport> {
    let cache = RouteCache::new(CacheConfig::new(dir.join(".cache")));
    cache.init().unwrap();
    let config = ProviderConfig::new(Some("test-key".to_string())).with_retry(RetryConfig::none());
    RouteProvider::new(transport, cache, config)
}

#[tokio::test]
async fn two_stops_fetch_once_then_hit_cache() {
    let dir = tempdir().unwrap();
    let provider = provider_in(dir.path(), MockTransport::from_json(ONE_LEG).unwrap());
    let waypoints = vec!["Plaza Mayor, Madrid".to_string()];

    let record = provider
        .fetch_route("Puerta del Sol, Madrid", &waypoints, false)
        .await
        .unwrap();

    assert_eq!(
        record,
        RouteRecord::new(
            vec![
                "Puerta del Sol, Madrid".to_string(),
                "Plaza Mayor, Madrid".to_string()
            ],
            5000,
            600,
            None,
        )
    );
    assert_eq!(provider.transport().call_count(), 1);

    let again = provider
        .fetch_route("Puerta del Sol, Madrid", &waypoints, false)
        .await
        .unwrap();
    assert_eq!(again, record);
    assert_eq!(provider.transport().call_count(), 1);
}

#[tokio::test]
async fn cache_survives_a_new_provider() {
    let dir = tempdir().unwrap();
    let waypoints = vec!["Plaza Mayor".to_string()];

    let first = provider_in(dir.path(), MockTransport::from_json(ONE_LEG).unwrap());
    first.fetch_route("Sol", &waypoints, false).await.unwrap();

    // A fresh process with a transport that would fail if called.
    let second = provider_in(dir.path(), MockTransport::sequence([]));
    let record = second.fetch_route("Sol", &waypoints, false).await.unwrap();
    assert_eq!(record.distance_m(), 5000);
    assert_eq!(second.transport().call_count(), 0);
}

#[tokio::test]
async fn credential_does_not_affect_cache_key() {
    let dir = tempdir().unwrap();
    let waypoints = vec!["Plaza Mayor".to_string()];
    let transport = MockTransport::from_json(ONE_LEG).unwrap();
    let cache = RouteCache::new(CacheConfig::new(dir.path()));

    let with_key_a = RouteProvider::new(
        transport,
        cache.clone(),
        ProviderConfig::new(Some("key-a".to_string())),
    );
    with_key_a.fetch_route("Sol", &waypoints, false).await.unwrap();

    let query = DirectionsQuery::new("Sol", &waypoints, false).unwrap();
    let key = RequestKey::from_params(query.params());
    assert!(matches!(cache.get(&key), CacheLookup::Hit(_)));

    let with_key_b = RouteProvider::new(
        MockTransport::sequence([]),
        cache,
        ProviderConfig::new(Some("key-b".to_string())),
    );
    with_key_b.fetch_route("Sol", &waypoints, false).await.unwrap();
    assert_eq!(with_key_b.transport().call_count(), 0);
}

#[tokio::test]
async fn corrupt_entry_falls_back_to_provider() {
    let dir = tempdir().unwrap();
    let provider = provider_in(dir.path(), MockTransport::from_json(ONE_LEG).unwrap());
    let waypoints = vec!["Plaza Mayor".to_string()];

    let query = DirectionsQuery::new("Sol", &waypoints, false).unwrap();
    let key = RequestKey::from_params(query.params());
    let path = provider.cache().entry_path(&key);
    std::fs::write(&path, "truncated{").unwrap();

    let record = provider.fetch_route("Sol", &waypoints, false).await.unwrap();

    assert_eq!(record.duration_s(), 600);
    assert_eq!(provider.transport().call_count(), 1);
    // The corrupt file was replaced by a fresh entry.
    assert!(provider.cache().get(&key).is_hit());
}

#[tokio::test]
async fn full_pipeline_reports_savings() {
    let dir = tempdir().unwrap();
    let original = r#"{"status": "OK", "routes": [{"legs": [
        {"distance": {"value": 6000}, "duration": {"value": 700}},
        {"distance": {"value": 5000}, "duration": {"value": 600}},
        {"distance": {"value": 4000}, "duration": {"value": 500}}
    ]}]}"#;
    let optimized = r#"{"status": "OK", "routes": [{"legs": [
        {"distance": {"value": 3000}, "duration": {"value": 400}},
        {"distance": {"value": 4000}, "duration": {"value": 500}},
        {"distance": {"value": 5000}, "duration": {"value": 600}}
    ], "waypoint_order": [1, 2, 0]}]}"#;
    let transport = MockTransport::sequence([
        Ok(serde_json::from_str(original).unwrap()),
        Ok(serde_json::from_str(optimized).unwrap()),
    ]);
    let provider = provider_in(dir.path(), transport);

    let stops = StopList::parse("Depot\nBakery\nMarket\nSchool\n").unwrap();
    let (before, after) = provider.optimize_route(stops.as_slice()).await.unwrap();

    assert_eq!(after.addresses(), ["Depot", "Market", "School", "Bakery"]);

    let fuel = FuelConfig::default();
    let savings = compare(&before, &after, &fuel);
    assert_eq!(savings.distance_saved_m, 3000);
    assert!((savings.distance_percent() - 20.0).abs() < 1e-9);

    let url = viewer_url(after.addresses(), ViewerUrlStyle::Path);
    let report = Report {
        inputs: stops.as_slice(),
        original: &before,
        optimized: &after,
        fuel,
        viewer_url: url.as_deref(),
    }
    .to_string();
    assert!(report.contains("Distance Saved:      3.00 km (20.0%)"));
    assert!(report.contains("https://www.google.com/maps/dir/Depot/Market/School/Bakery"));
}

#[tokio::test]
async fn geocoding_failure_names_the_address() {
    let dir = tempdir().unwrap();
    let body = r#"{
        "status": "NOT_FOUND",
        "geocoded_waypoints": [
            {"geocoder_status": "OK"},
            {"geocoder_status": "ZERO_RESULTS"}
        ],
        "routes": []
    }"#;
    let provider = provider_in(dir.path(), MockTransport::from_json(body).unwrap());

    let err = provider
        .optimize_route(&["Depot".to_string(), "Atlantis 1".to_string()])
        .await
        .unwrap_err();

    let err = match err {
        RouteError::Provider(err) => err,
        other => panic!("expected provider error, got {other:?}"),
    };
    assert_eq!(err.failed_addresses.len(), 1);
    assert_eq!(err.failed_addresses[0].address, "Atlantis 1");
    assert!(err.to_string().contains("Address 2: Atlantis 1"));
    // Only the unoptimized request was attempted.
    assert_eq!(provider.transport().call_count(), 1);
}

#[tokio::test]
async fn missing_credential_makes_no_calls() {
    let dir = tempdir().unwrap();
    let cache = RouteCache::new(CacheConfig::new(dir.path()));
    let provider = RouteProvider::new(
        MockTransport::from_json(ONE_LEG).unwrap(),
        cache,
        ProviderConfig::new(None),
    );

    let err = provider
        .optimize_route(&["Depot".to_string(), "Market".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, RouteError::Configuration(_)));
    assert_eq!(provider.transport().call_count(), 0);
}
