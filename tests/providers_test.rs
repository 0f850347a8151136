// ABOUTME: Integration tests for the external provider clients
// ABOUTME: Uses a stub transport to verify caching, normalization and error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{blank_peak, provider_config, test_cache, StubFetch};
use peak_planner::providers::{
    NpsClient, OpenMeteoClient, OpenPeaksClient, OpenTopoClient, OverpassClient, ProviderError,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const TTL: Duration = Duration::from_secs(600);

async fn opentopo_client(fetch: Arc<StubFetch>) -> OpenTopoClient {
    OpenTopoClient::new(
        fetch,
        test_cache().await,
        provider_config("https://api.opentopodata.org/v1/etopo1"),
        TTL,
    )
}

#[tokio::test]
async fn test_forecast_cached_per_rounded_location() {
    let fetch = Arc::new(StubFetch::with_response(json!({
        "latitude": 46.85,
        "longitude": -121.75,
        "hourly": {"time": ["2026-08-29T00:00"], "temperature_2m": [8.4]},
        "daily": {"time": ["2026-08-29"], "temperature_2m_max": [12.1]}
    })));
    let client = OpenMeteoClient::new(
        fetch.clone(),
        test_cache().await,
        provider_config("https://api.open-meteo.com/v1/forecast"),
        TTL,
    );

    let first = client.fetch_forecast(46.8523, -121.7603).await.unwrap();
    // Coordinates that agree after rounding to two decimals hit the cache
    let second = client.fetch_forecast(46.8491, -121.7580).await.unwrap();

    assert_eq!(fetch.calls(), 1);
    assert_eq!(first.location.latitude, Some(46.85));
    assert_eq!(first.hourly["temperature_2m"][0], json!(8.4));
    assert_eq!(second.daily["temperature_2m_max"][0], json!(12.1));

    let query = fetch.last_query();
    let hourly = query.iter().find(|(k, _)| k == "hourly").unwrap();
    assert!(hourly.1.contains("temperature_2m"));
    assert!(hourly.1.contains("wind_speed_10m"));
    let days = query.iter().find(|(k, _)| k == "forecast_days").unwrap();
    assert_eq!(days.1, "3");
}

#[tokio::test]
async fn test_elevation_failure_is_negative_cached() {
    let fetch = Arc::new(StubFetch::new());
    fetch.push_err(ProviderError::RequestFailed("connection refused".into()));
    let client = opentopo_client(fetch.clone()).await;

    assert_eq!(client.lookup_elevation(46.8523, -121.7603).await, None);
    // The miss is cached, so the second lookup makes no outbound call
    assert_eq!(client.lookup_elevation(46.8523, -121.7603).await, None);
    assert_eq!(fetch.calls(), 1);
}

#[tokio::test]
async fn test_overpass_search_backfills_missing_elevation() {
    let elevation_fetch = Arc::new(StubFetch::with_response(json!({
        "results": [{"elevation": 4392.1}]
    })));
    let overpass_fetch = Arc::new(StubFetch::with_response(json!({
        "elements": [
            {
                "type": "node",
                "id": 123,
                "lat": 46.8523,
                "lon": -121.7603,
                "tags": {"name": "Mount Rainier"}
            },
            {"type": "way", "id": 456, "tags": {"name": "Some Trail"}}
        ]
    })));
    let client = OverpassClient::new(
        overpass_fetch.clone(),
        test_cache().await,
        provider_config("https://overpass-api.de/api/interpreter"),
        TTL,
        opentopo_client(elevation_fetch.clone()).await,
    );

    let snapshots = client
        .search_peaks(Some("Rainier"), None, None, 50_000, 10)
        .await
        .unwrap();

    // The way element is dropped, the node gets an elevation backfill
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].osm_id, "node:123");
    assert_eq!(snapshots[0].elevation_m, Some(4392.1));
    assert_eq!(overpass_fetch.calls(), 1);
    assert_eq!(elevation_fetch.calls(), 1);

    let form = overpass_fetch.last_form();
    assert_eq!(form.len(), 1);
    assert!(form[0].1.contains("[\"name\"~\"Rainier\",i]"));
}

#[tokio::test]
async fn test_overpass_search_requires_query_or_coordinates() {
    let client = OverpassClient::new(
        Arc::new(StubFetch::new()),
        test_cache().await,
        provider_config("https://overpass-api.de/api/interpreter"),
        TTL,
        opentopo_client(Arc::new(StubFetch::new())).await,
    );

    let error = client
        .search_peaks(None, Some(46.85), None, 50_000, 10)
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::InvalidQuery(_)));
}

#[tokio::test]
async fn test_overpass_empty_result_is_not_found() {
    let client = OverpassClient::new(
        Arc::new(StubFetch::with_response(json!({"elements": []}))),
        test_cache().await,
        provider_config("https://overpass-api.de/api/interpreter"),
        TTL,
        opentopo_client(Arc::new(StubFetch::new())).await,
    );

    let error = client
        .search_peaks(Some("Nowhere Peak"), None, None, 50_000, 10)
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::NotFound(_)));
}

#[tokio::test]
async fn test_overpass_snapshot_for_peak_uses_cache() {
    let fetch = Arc::new(StubFetch::with_response(json!({
        "elements": [{
            "type": "node",
            "id": 123,
            "lat": 46.8523,
            "lon": -121.7603,
            "tags": {"name": "Mount Rainier", "ele": "4392"}
        }]
    })));
    let client = OverpassClient::new(
        fetch.clone(),
        test_cache().await,
        provider_config("https://overpass-api.de/api/interpreter"),
        TTL,
        opentopo_client(Arc::new(StubFetch::new())).await,
    );
    let peak = blank_peak("Mount Rainier");

    let (first, from_cache) = client.snapshot_for_peak(&peak, false).await.unwrap();
    assert!(!from_cache);
    assert_eq!(first.osm_id, "node:123");
    assert_eq!(fetch.calls(), 1);

    let (second, from_cache) = client.snapshot_for_peak(&peak, false).await.unwrap();
    assert!(from_cache);
    assert_eq!(second.osm_id, "node:123");
    assert_eq!(fetch.calls(), 1);

    // Force skips the snapshot cache; the raw query cache still applies,
    // so no extra outbound request is made within the TTL
    let (_, from_cache) = client.snapshot_for_peak(&peak, true).await.unwrap();
    assert!(!from_cache);
    assert_eq!(fetch.calls(), 1);
}

#[tokio::test]
async fn test_nps_search_sends_required_parameters() {
    let fetch = Arc::new(StubFetch::with_response(json!({
        "data": [{
            "id": "PLACE-1",
            "title": "Mount Rainier",
            "states": "WA",
            "designation": "National Park",
            "listingdescription": "Glaciated volcano",
            "latitude": "46.8523",
            "longitude": "-121.7603"
        }]
    })));
    let client = NpsClient::new(
        fetch.clone(),
        test_cache().await,
        provider_config("https://developer.nps.gov/api/v1/places"),
        TTL,
    );

    let (snapshots, from_cache) = client
        .search_places("Rainier", Some(46.85), Some(-121.76), 5)
        .await
        .unwrap();

    assert!(!from_cache);
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].external_id.as_deref(), Some("PLACE-1"));
    assert_eq!(snapshots[0].designation.as_deref(), Some("National Park"));
    assert_eq!(snapshots[0].description.as_deref(), Some("Glaciated volcano"));
    assert_eq!(snapshots[0].lat, Some(46.8523));

    let query = fetch.last_query();
    let fields = query.iter().find(|(k, _)| k == "fields").unwrap();
    assert!(fields.1.contains("listingdescription"));
    let place_type = query.iter().find(|(k, _)| k == "placeType").unwrap();
    assert!(place_type.1.contains("mountain"));
    assert!(query.iter().any(|(k, _)| k == "latitude"));
    assert!(query.iter().any(|(k, _)| k == "longitude"));
}

#[tokio::test]
async fn test_nps_search_caches_results() {
    let fetch = Arc::new(StubFetch::with_response(json!({
        "data": [{"id": "PLACE-1", "title": "Mount Rainier"}]
    })));
    let client = NpsClient::new(
        fetch.clone(),
        test_cache().await,
        provider_config("https://developer.nps.gov/api/v1/places"),
        TTL,
    );

    let (_, from_cache) = client.search_places("Rainier", None, None, 5).await.unwrap();
    assert!(!from_cache);
    let (_, from_cache) = client.search_places("Rainier", None, None, 5).await.unwrap();
    assert!(from_cache);
    assert_eq!(fetch.calls(), 1);
}

#[tokio::test]
async fn test_nps_snapshot_refresh_keeps_search_cache_intact() {
    let fetch = Arc::new(StubFetch::with_response(json!({
        "data": [{"id": "PLACE-1", "title": "Mount Rainier"}]
    })));
    let client = NpsClient::new(
        fetch.clone(),
        test_cache().await,
        provider_config("https://developer.nps.gov/api/v1/places"),
        TTL,
    );
    let peak = blank_peak("Mount Rainier");

    let (snapshot, from_cache) = client.snapshot_for_peak(&peak, false).await.unwrap();
    assert!(!from_cache);
    assert_eq!(snapshot.external_id.as_deref(), Some("PLACE-1"));
    assert_eq!(fetch.calls(), 1);

    // The single-snapshot entry and the search result list live under
    // separate keys, so an identical search within the TTL is still a hit
    let (_, from_cache) = client
        .search_places("Mount Rainier", None, None, 1)
        .await
        .unwrap();
    assert!(from_cache);
    assert_eq!(fetch.calls(), 1);

    let (_, from_cache) = client.snapshot_for_peak(&peak, false).await.unwrap();
    assert!(from_cache);
    assert_eq!(fetch.calls(), 1);
}

#[tokio::test]
async fn test_nps_rate_limit_passes_through() {
    let fetch = Arc::new(StubFetch::new());
    fetch.push_err(ProviderError::RateLimited("slow down".into()));
    let client = NpsClient::new(
        fetch,
        test_cache().await,
        provider_config("https://developer.nps.gov/api/v1/places"),
        TTL,
    );

    let error = client
        .search_places("Rainier", None, None, 5)
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::RateLimited(_)));
}

#[tokio::test]
async fn test_open_peaks_search_truncates_to_limit() {
    let fetch = Arc::new(StubFetch::with_response(json!({
        "results": [
            {"id": 1, "name": "Mount Rainier", "country": "USA", "elevation": 4392},
            {"id": 2, "name": "Little Tahoma", "country": "USA", "elevation": 3395},
            {"id": 3, "name": "Liberty Cap", "country": "USA", "elevation": 4301}
        ]
    })));
    let client = OpenPeaksClient::new(
        fetch.clone(),
        test_cache().await,
        provider_config("https://api.openpeaks.org/peaks"),
        TTL,
    );

    let (snapshots, from_cache) = client
        .search("Rainier", 2, Some(46.85), Some(-121.76))
        .await
        .unwrap();

    assert!(!from_cache);
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].external_id.as_deref(), Some("1"));
    assert_eq!(snapshots[0].elevation_m, Some(4392));

    let query = fetch.last_query();
    assert!(query.iter().any(|(k, v)| k == "radius" && v == "40"));

    // Same parameters come back from the cache
    let (_, from_cache) = client
        .search("Rainier", 2, Some(46.85), Some(-121.76))
        .await
        .unwrap();
    assert!(from_cache);
    assert_eq!(fetch.calls(), 1);
}

#[tokio::test]
async fn test_open_peaks_empty_result_is_not_found() {
    let client = OpenPeaksClient::new(
        Arc::new(StubFetch::with_response(json!({"results": []}))),
        test_cache().await,
        provider_config("https://api.openpeaks.org/peaks"),
        TTL,
    );

    let error = client.search("Nowhere Peak", 5, None, None).await.unwrap_err();
    assert!(matches!(error, ProviderError::NotFound(_)));
}

#[tokio::test]
async fn test_open_peaks_empty_query_rejected() {
    let client = OpenPeaksClient::new(
        Arc::new(StubFetch::new()),
        test_cache().await,
        provider_config("https://api.openpeaks.org/peaks"),
        TTL,
    );

    let error = client.search("   ", 5, None, None).await.unwrap_err();
    assert!(matches!(error, ProviderError::InvalidQuery(_)));
}
