// ABOUTME: Open Peaks client for free-text and coordinate summit search
// ABOUTME: Decodes the three historical response shapes in a fixed order
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::errors::ProviderError;
use super::http::HttpFetch;
use super::util;
use crate::cache::{
    memory::InMemoryCache, round_coord_opt, slugify, CacheKey, CacheProvider, CacheResource,
};
use crate::config::ProviderConfig;
use crate::constants::{coord_precision, limits};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Normalized Open Peaks record representing an actual summit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPeaksSnapshot {
    /// Always `"open_peaks"`
    pub source: String,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub range: Option<String>,
    pub elevation_m: Option<i64>,
    pub prominence_m: Option<i64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub retrieved_at: DateTime<Utc>,
    pub raw: Value,
}

/// Open Peaks search client
pub struct OpenPeaksClient {
    fetch: Arc<dyn HttpFetch>,
    cache: InMemoryCache,
    config: ProviderConfig,
    ttl: Duration,
}

impl OpenPeaksClient {
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

    fn cache_key(query: &str, lat: Option<f64>, lon: Option<f64>, limit: u32) -> CacheKey {
        CacheKey::new(
            "openpeaks".into(),
            CacheResource::OpenPeaksSearch {
                slug: slugify(query),
                lat: round_coord_opt(lat, coord_precision::OPEN_PEAKS),
                lon: round_coord_opt(lon, coord_precision::OPEN_PEAKS),
                radius_m: limits::OPEN_PEAKS_RADIUS_KM,
                limit,
            },
        )
    }

    /// Search for summits by free text, optionally biased to coordinates.
    /// Returns the snapshots and whether they came from the cache.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` on empty query, `NotFound` when zero records decode,
    /// `RateLimited` on HTTP 429; transport errors pass through.
    pub async fn search(
        &self,
        query: &str,
        limit: u32,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<(Vec<OpenPeaksSnapshot>, bool), ProviderError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ProviderError::InvalidQuery(
                "Query parameter 'q' is required.".into(),
            ));
        }

        let key = Self::cache_key(query, lat, lon, limit);
        if let Ok(Some(cached)) = self.cache.get::<Vec<OpenPeaksSnapshot>>(&key).await {
            return Ok((cached, true));
        }

        let mut params = vec![
            ("q".to_owned(), query.to_owned()),
            ("limit".to_owned(), limit.to_string()),
        ];
        if let (Some(lat), Some(lon)) = (lat, lon) {
            params.push(("lat".to_owned(), lat.to_string()));
            params.push(("lon".to_owned(), lon.to_string()));
            params.push((
                "radius".to_owned(),
                limits::OPEN_PEAKS_RADIUS_KM.to_string(),
            ));
        }

        let headers = [("Accept".to_owned(), "application/json".to_owned())];
        let payload = self
            .fetch
            .get_json(&self.config.base_url, &params, &headers)
            .await?;

        let records = extract_records(&payload);
        if records.is_empty() {
            return Err(ProviderError::NotFound(
                "No peaks found for that query.".into(),
            ));
        }

        let snapshots: Vec<OpenPeaksSnapshot> = records
            .iter()
            .take(limit as usize)
            .map(|record| normalize_record(record))
            .collect();

        if let Err(error) = self.cache.set(&key, &snapshots, self.ttl).await {
            warn!(error = %error, "failed to cache Open Peaks search");
        }
        Ok((snapshots, false))
    }
}

/// Decode the record list. Responses have arrived in three shapes over
/// time: `{"data": [...]}`, `{"results": [...]}`, and a bare list. Field
/// presence is checked in that order.
fn extract_records(payload: &Value) -> Vec<Value> {
    let items = match payload {
        Value::Object(map) => map
            .get("data")
            .and_then(Value::as_array)
            .or_else(|| map.get("results").and_then(Value::as_array)),
        Value::Array(items) => Some(items),
        _ => None,
    };
    items
        .map(|items| items.iter().filter(|v| v.is_object()).cloned().collect())
        .unwrap_or_default()
}

fn normalize_record(record: &Value) -> OpenPeaksSnapshot {
    let external_id = ["id", "_id", "slug"].iter().find_map(|key| {
        record.get(*key).and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    });

    OpenPeaksSnapshot {
        source: "open_peaks".to_owned(),
        external_id,
        name: util::parse_str(record.get("name")),
        country: util::parse_str(record.get("country")),
        region: util::parse_str(record.get("region")),
        range: util::parse_str(record.get("range")),
        elevation_m: util::first_i64(record, ["elevation", "elevation_m"]),
        prominence_m: util::first_i64(record, ["prominence", "prominence_m"]),
        lat: util::first_f64(record, ["latitude", "lat"]),
        lon: util::first_f64(record, ["longitude", "lon"]),
        retrieved_at: Utc::now(),
        raw: record.clone(),
    }
}
