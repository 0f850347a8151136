// ABOUTME: NPS places API client for authoritative US place records
// ABOUTME: Handles API-key auth, rate-limit classification and record normalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::errors::ProviderError;
use super::http::HttpFetch;
use super::util;
use crate::cache::{
    memory::InMemoryCache, round_coord_opt, slugify, CacheKey, CacheProvider, CacheResource,
};
use crate::config::ProviderConfig;
use crate::constants::{coord_precision, nps};
use crate::models::Peak;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Normalized snapshot of an NPS place. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsPlaceSnapshot {
    /// Always `"nps"`
    pub source: String,
    pub external_id: Option<String>,
    pub name: Option<String>,
    /// Comma-separated state codes, as reported by the API
    pub states: Option<String>,
    pub designation: Option<String>,
    pub description: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub retrieved_at: DateTime<Utc>,
    pub raw: Value,
}

/// NPS places search client
pub struct NpsClient {
    fetch: Arc<dyn HttpFetch>,
    cache: InMemoryCache,
    config: ProviderConfig,
    ttl: Duration,
}

impl NpsClient {
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

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("Accept".to_owned(), "application/json".to_owned())];
        if let Some(key) = &self.config.api_key {
            headers.push(("X-Api-Key".to_owned(), key.clone()));
        }
        headers
    }

    fn search_cache_key(query: &str, lat: Option<f64>, lon: Option<f64>, limit: u32) -> CacheKey {
        CacheKey::new(
            "nps".into(),
            CacheResource::NpsPlaces {
                slug: slugify(query),
                lat: round_coord_opt(lat, coord_precision::NPS),
                lon: round_coord_opt(lon, coord_precision::NPS),
                limit,
            },
        )
    }

    fn snapshot_cache_key(peak: &Peak) -> CacheKey {
        CacheKey::new(
            "nps".into(),
            CacheResource::NpsSnapshot {
                slug: slugify(&peak.name),
                lat: round_coord_opt(peak.lat, coord_precision::NPS),
                lon: round_coord_opt(peak.lon, coord_precision::NPS),
            },
        )
    }

    /// Search the places endpoint. Returns the snapshots and whether the
    /// result came from the cache.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` on empty query, `NotFound` when zero usable records
    /// come back, `RateLimited` on HTTP 429; transport errors pass through.
    pub async fn search_places(
        &self,
        query: &str,
        lat: Option<f64>,
        lon: Option<f64>,
        limit: u32,
    ) -> Result<(Vec<NpsPlaceSnapshot>, bool), ProviderError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ProviderError::InvalidQuery(
                "Query parameter 'q' is required.".into(),
            ));
        }

        let key = Self::search_cache_key(query, lat, lon, limit);
        if let Ok(Some(cached)) = self.cache.get::<Vec<NpsPlaceSnapshot>>(&key).await {
            return Ok((cached, true));
        }

        let mut params = vec![
            ("q".to_owned(), query.to_owned()),
            ("limit".to_owned(), limit.to_string()),
            ("fields".to_owned(), nps::FIELDS.to_owned()),
            ("placeType".to_owned(), nps::PLACE_TYPES.join(",")),
            ("topic".to_owned(), nps::TOPICS.join(",")),
        ];
        if let (Some(lat), Some(lon)) = (lat, lon) {
            params.push(("latitude".to_owned(), lat.to_string()));
            params.push(("longitude".to_owned(), lon.to_string()));
        }

        let payload = self
            .fetch
            .get_json(&self.config.base_url, &params, &self.headers())
            .await?;

        let records = extract_records(&payload);
        if records.is_empty() {
            return Err(ProviderError::NotFound(
                "NPS places returned no results.".into(),
            ));
        }

        let snapshots: Vec<NpsPlaceSnapshot> = records
            .iter()
            .take(limit as usize)
            .map(|record| normalize_record(record))
            .collect();

        if let Err(error) = self.cache.set(&key, &snapshots, self.ttl).await {
            warn!(error = %error, "failed to cache NPS search");
        }
        Ok((snapshots, false))
    }

    /// Fetch the best-match place for a stored peak, cached by name slug
    /// and rounded coordinates. `force` bypasses the cache read.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` when the peak has no name; search errors pass
    /// through.
    pub async fn snapshot_for_peak(
        &self,
        peak: &Peak,
        force: bool,
    ) -> Result<(NpsPlaceSnapshot, bool), ProviderError> {
        if peak.name.trim().is_empty() {
            return Err(ProviderError::InvalidQuery(
                "Peak name required to query NPS.".into(),
            ));
        }

        let key = Self::snapshot_cache_key(peak);
        if !force {
            if let Ok(Some(cached)) = self.cache.get::<NpsPlaceSnapshot>(&key).await {
                return Ok((cached, true));
            }
        }

        let (snapshots, from_cache) = self.search_places(&peak.name, None, None, 1).await?;
        let snapshot = snapshots
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound("NPS places returned no results.".into()))?;

        if let Err(error) = self.cache.set(&key, &snapshot, self.ttl).await {
            warn!(error = %error, "failed to cache NPS snapshot");
        }
        Ok((snapshot, from_cache))
    }
}

/// Pull the record list out of either `{"data": [...]}` or a bare list,
/// keeping only JSON objects
fn extract_records(payload: &Value) -> Vec<Value> {
    let candidates = match payload {
        Value::Object(map) => map.get("data").and_then(Value::as_array),
        Value::Array(items) => Some(items),
        _ => None,
    };
    candidates
        .map(|items| items.iter().filter(|v| v.is_object()).cloned().collect())
        .unwrap_or_default()
}

fn normalize_record(record: &Value) -> NpsPlaceSnapshot {
    // IDs may arrive as strings or numbers
    let external_id = ["id", "placeId"].iter().find_map(|key| {
        record.get(*key).and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    });

    NpsPlaceSnapshot {
        source: "nps".to_owned(),
        external_id,
        name: util::first_str(record, ["title", "name"]),
        states: util::parse_str(record.get("states")),
        designation: util::parse_str(record.get("designation")),
        description: util::first_str(record, ["listingdescription", "description"]),
        lat: util::parse_f64(record.get("latitude")),
        lon: util::parse_f64(record.get("longitude")),
        retrieved_at: Utc::now(),
        raw: record.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_records_wrapped_and_bare() {
        let wrapped = json!({"data": [{"title": "a"}, "junk", {"title": "b"}]});
        assert_eq!(extract_records(&wrapped).len(), 2);

        let bare = json!([{"title": "a"}]);
        assert_eq!(extract_records(&bare).len(), 1);

        assert!(extract_records(&json!({"total": 0})).is_empty());
        assert!(extract_records(&json!("nonsense")).is_empty());
    }

    #[test]
    fn test_normalize_record_field_fallbacks() {
        let record = json!({
            "placeId": 991,
            "name": "Rainier Summit",
            "states": "WA",
            "latitude": "46.8523",
            "longitude": "bad-value",
            "description": "High volcano"
        });
        let snapshot = normalize_record(&record);
        assert_eq!(snapshot.external_id, Some("991".into()));
        assert_eq!(snapshot.name, Some("Rainier Summit".into()));
        assert_eq!(snapshot.lat, Some(46.8523));
        assert_eq!(snapshot.lon, None);
        assert_eq!(snapshot.description, Some("High volcano".into()));
    }
}
