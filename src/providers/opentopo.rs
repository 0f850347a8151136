// ABOUTME: OpenTopoData client for point elevation lookups
// ABOUTME: Failures are absorbed to None and negative results are cached
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::http::HttpFetch;
use super::util;
use crate::cache::{memory::InMemoryCache, round_coord, CacheKey, CacheProvider, CacheResource};
use crate::config::ProviderConfig;
use crate::constants::coord_precision;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Point elevation lookups against OpenTopoData.
///
/// Elevation is supplementary data, so every failure path degrades to
/// `None` rather than an error. Misses are cached too, keeping a flaky
/// upstream from being hammered.
pub struct OpenTopoClient {
    fetch: Arc<dyn HttpFetch>,
    cache: InMemoryCache,
    config: ProviderConfig,
    ttl: Duration,
}

impl OpenTopoClient {
    #[must_use]
    pub fn new(
        fetch: Arc<dyn HttpFetch>,
        cache: InMemoryCache,
        config: ProviderConfig,
        ttl: Duration,
    ) -> Self {
        Self {
            fetch,
            cache,
            config,
            ttl,
        }
    }

    fn cache_key(lat: f64, lon: f64) -> CacheKey {
        CacheKey::new(
            "opentopodata".into(),
            CacheResource::Elevation {
                lat: round_coord(lat, coord_precision::ELEVATION),
                lon: round_coord(lon, coord_precision::ELEVATION),
            },
        )
    }

    /// Look up the elevation in meters at a point, `None` when the
    /// provider fails or has no data
    pub async fn lookup_elevation(&self, lat: f64, lon: f64) -> Option<f64> {
        let key = Self::cache_key(lat, lon);
        if let Ok(Some(cached)) = self.cache.get::<Option<f64>>(&key).await {
            return cached;
        }

        let query = [("locations".to_owned(), format!("{lat},{lon}"))];
        let elevation = match self.fetch.get_json(&self.config.base_url, &query, &[]).await {
            Ok(payload) => payload
                .get("results")
                .and_then(Value::as_array)
                .and_then(|results| results.first())
                .and_then(|first| util::parse_f64(first.get("elevation"))),
            Err(error) => {
                warn!(error = %error, "OpenTopoData request failed");
                None
            }
        };

        if let Err(error) = self.cache.set(&key, &elevation, self.ttl).await {
            warn!(error = %error, "failed to cache elevation result");
        }
        elevation
    }
}
