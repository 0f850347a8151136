// ABOUTME: Tests for the in-memory provider cache
// ABOUTME: Covers TTL expiration, capacity eviction and pattern invalidation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use anyhow::Result;
use peak_planner::cache::{
    memory::InMemoryCache, round_coord, CacheConfig, CacheKey, CacheProvider, CacheResource,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct TestData {
    value: String,
    count: u32,
}

fn forecast_key(provider: &str, lat: f64, lon: f64) -> CacheKey {
    CacheKey::new(
        provider.to_owned(),
        CacheResource::Forecast {
            lat: round_coord(lat, 2),
            lon: round_coord(lon, 2),
        },
    )
}

async fn create_test_cache(max_entries: usize) -> Result<InMemoryCache> {
    let config = CacheConfig {
        max_entries,
        cleanup_interval: Duration::from_secs(300),
        // Disabled in tests to avoid tokio runtime conflicts
        enable_background_cleanup: false,
        ..CacheConfig::default()
    };
    Ok(InMemoryCache::new(config).await?)
}

#[tokio::test]
async fn test_cache_set_and_get() -> Result<()> {
    let cache = create_test_cache(100).await?;
    let key = forecast_key("open-meteo", 46.8523, -121.7603);
    let data = TestData {
        value: "test".to_owned(),
        count: 42,
    };

    cache.set(&key, &data, Duration::from_secs(10)).await?;

    let retrieved: Option<TestData> = cache.get(&key).await?;
    assert_eq!(retrieved, Some(data));
    Ok(())
}

#[tokio::test]
async fn test_cache_expiration() -> Result<()> {
    let cache = create_test_cache(100).await?;
    let key = forecast_key("open-meteo", 46.8523, -121.7603);
    let data = TestData {
        value: "short-lived".to_owned(),
        count: 1,
    };

    cache.set(&key, &data, Duration::from_millis(50)).await?;
    assert!(cache.exists(&key).await?);

    tokio::time::sleep(Duration::from_millis(80)).await;

    let retrieved: Option<TestData> = cache.get(&key).await?;
    assert_eq!(retrieved, None);
    assert!(!cache.exists(&key).await?);
    Ok(())
}

#[tokio::test]
async fn test_cache_capacity_eviction() -> Result<()> {
    let cache = create_test_cache(2).await?;
    let data = TestData {
        value: "x".to_owned(),
        count: 0,
    };

    let first = forecast_key("open-meteo", 1.0, 1.0);
    let second = forecast_key("open-meteo", 2.0, 2.0);
    let third = forecast_key("open-meteo", 3.0, 3.0);

    cache.set(&first, &data, Duration::from_secs(60)).await?;
    cache.set(&second, &data, Duration::from_secs(60)).await?;
    cache.set(&third, &data, Duration::from_secs(60)).await?;

    // LRU: the oldest entry is gone, the newer two remain
    assert!(!cache.exists(&first).await?);
    assert!(cache.exists(&second).await?);
    assert!(cache.exists(&third).await?);
    Ok(())
}

#[tokio::test]
async fn test_cache_invalidate_single_key() -> Result<()> {
    let cache = create_test_cache(100).await?;
    let key = forecast_key("open-meteo", 46.85, -121.76);
    let data = TestData {
        value: "bye".to_owned(),
        count: 9,
    };

    cache.set(&key, &data, Duration::from_secs(60)).await?;
    cache.invalidate(&key).await?;

    let retrieved: Option<TestData> = cache.get(&key).await?;
    assert_eq!(retrieved, None);
    Ok(())
}

#[tokio::test]
async fn test_cache_invalidate_provider_pattern() -> Result<()> {
    let cache = create_test_cache(100).await?;
    let data = TestData {
        value: "v".to_owned(),
        count: 1,
    };

    let weather_a = forecast_key("open-meteo", 46.85, -121.76);
    let weather_b = forecast_key("open-meteo", 48.78, -121.81);
    let other = forecast_key("opentopodata", 46.85, -121.76);

    cache.set(&weather_a, &data, Duration::from_secs(60)).await?;
    cache.set(&weather_b, &data, Duration::from_secs(60)).await?;
    cache.set(&other, &data, Duration::from_secs(60)).await?;

    let removed = cache
        .invalidate_pattern(&CacheKey::provider_pattern("open-meteo"))
        .await?;
    assert_eq!(removed, 2);

    assert!(!cache.exists(&weather_a).await?);
    assert!(!cache.exists(&weather_b).await?);
    assert!(cache.exists(&other).await?);
    Ok(())
}

#[tokio::test]
async fn test_cache_ttl_reporting() -> Result<()> {
    let cache = create_test_cache(100).await?;
    let key = forecast_key("open-meteo", 46.85, -121.76);
    let data = TestData {
        value: "ttl".to_owned(),
        count: 3,
    };

    cache.set(&key, &data, Duration::from_secs(60)).await?;

    let remaining = cache.ttl(&key).await?.expect("entry should have a TTL");
    assert!(remaining <= Duration::from_secs(60));
    assert!(remaining > Duration::from_secs(50));

    assert_eq!(cache.ttl(&forecast_key("open-meteo", 0.0, 0.0)).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_cache_clear_all() -> Result<()> {
    let cache = create_test_cache(100).await?;
    let data = TestData {
        value: "gone".to_owned(),
        count: 0,
    };

    cache
        .set(&forecast_key("open-meteo", 1.0, 1.0), &data, Duration::from_secs(60))
        .await?;
    cache
        .set(&forecast_key("nps", 2.0, 2.0), &data, Duration::from_secs(60))
        .await?;

    cache.clear_all().await?;

    assert!(!cache.exists(&forecast_key("open-meteo", 1.0, 1.0)).await?);
    assert!(!cache.exists(&forecast_key("nps", 2.0, 2.0)).await?);
    Ok(())
}

#[tokio::test]
async fn test_rounded_coordinates_share_one_entry() -> Result<()> {
    let cache = create_test_cache(100).await?;
    let data = TestData {
        value: "shared".to_owned(),
        count: 7,
    };

    // Differ only beyond the rounding precision
    let a = forecast_key("open-meteo", 46.8523, -121.7603);
    let b = forecast_key("open-meteo", 46.8491, -121.7580);
    assert_eq!(a, b);

    cache.set(&a, &data, Duration::from_secs(60)).await?;
    let retrieved: Option<TestData> = cache.get(&b).await?;
    assert_eq!(retrieved, Some(data));
    Ok(())
}
