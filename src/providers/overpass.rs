// ABOUTME: Overpass (OpenStreetMap) client for peak, pass and volcano node search
// ABOUTME: Builds Overpass QL queries and normalizes elements into peak snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::errors::ProviderError;
use super::http::HttpFetch;
use super::opentopo::OpenTopoClient;
use super::util;
use crate::cache::{
    memory::InMemoryCache, round_coord_opt, slugify, CacheKey, CacheProvider, CacheResource,
};
use crate::config::ProviderConfig;
use crate::constants::{coord_precision, limits};
use crate::models::Peak;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Normalized OpenStreetMap peak record. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsmPeakSnapshot {
    /// `"{type}:{id}"`, e.g. `"node:123456"`
    pub osm_id: String,
    pub name: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub elevation_m: Option<f64>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub range: Option<String>,
    pub retrieved_at: DateTime<Utc>,
    /// Raw Overpass element, kept for audit
    pub raw: Value,
}

/// Build an Overpass QL query for peak-like nodes. The name filter is a
/// case-insensitive regex match; quotes and backslashes are stripped from
/// the user query so it cannot break out of the QL string.
fn build_query(
    name_query: Option<&str>,
    lat: Option<f64>,
    lon: Option<f64>,
    radius_m: u32,
    limit: u32,
) -> String {
    let name_filter = name_query
        .map(|q| escape_query(q.trim()))
        .filter(|q| !q.is_empty())
        .map_or_else(String::new, |q| format!("[\"name\"~\"{q}\",i]"));

    let area_filter = match (lat, lon) {
        (Some(lat), Some(lon)) => format!("(around:{radius_m},{lat},{lon})"),
        _ => String::new(),
    };

    let limit_clause = if limit > 0 {
        format!("out body {limit};")
    } else {
        "out body;".to_owned()
    };

    format!(
        "[out:json][timeout:25];\nnode[\"natural\"~\"peak|mountain_pass|volcano\"]{name_filter}{area_filter};\n{limit_clause}"
    )
}

fn escape_query(value: &str) -> String {
    value.replace(['"', '\\'], "")
}

/// Overpass search client with elevation backfill from OpenTopoData
pub struct OverpassClient {
    fetch: Arc<dyn HttpFetch>,
    cache: InMemoryCache,
    config: ProviderConfig,
    ttl: Duration,
    elevation: OpenTopoClient,
}

impl OverpassClient {
    #[must_use]
    pub fn new(
        fetch: Arc<dyn HttpFetch>,
        cache: InMemoryCache,
        config: ProviderConfig,
        ttl: Duration,
        elevation: OpenTopoClient,
    ) -> Self {
        Self {
            fetch,
            cache,
            config,
            ttl,
            elevation,
        }
    }

    fn query_cache_key(
        name_query: Option<&str>,
        lat: Option<f64>,
        lon: Option<f64>,
        radius_m: u32,
        limit: u32,
    ) -> CacheKey {
        CacheKey::new(
            "overpass".into(),
            CacheResource::OsmSnapshot {
                slug: slugify(name_query.unwrap_or("all")),
                lat: round_coord_opt(lat, coord_precision::OVERPASS),
                lon: round_coord_opt(lon, coord_precision::OVERPASS),
                radius_m,
                limit,
            },
        )
    }

    /// Fetch the raw Overpass payload for a query, consulting the cache
    async fn fetch_raw(
        &self,
        name_query: Option<&str>,
        lat: Option<f64>,
        lon: Option<f64>,
        radius_m: u32,
        limit: u32,
    ) -> Result<Value, ProviderError> {
        let key = Self::query_cache_key(name_query, lat, lon, radius_m, limit);
        if let Ok(Some(cached)) = self.cache.get::<Value>(&key).await {
            return Ok(cached);
        }

        let query = build_query(name_query, lat, lon, radius_m, limit);
        let form = [("data".to_owned(), query)];
        let payload = self.fetch.post_form_json(&self.config.base_url, &form).await?;

        if let Err(error) = self.cache.set(&key, &payload, self.ttl).await {
            warn!(error = %error, "failed to cache Overpass response");
        }
        Ok(payload)
    }

    /// Search peak-like nodes. Either a name query or coordinates must be
    /// given. Elements without their own `ele` tag get an elevation
    /// backfill from OpenTopoData when coordinates are known.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` without query or coordinates; `NotFound` when no
    /// nodes match; transport errors pass through.
    pub async fn search_peaks(
        &self,
        query: Option<&str>,
        lat: Option<f64>,
        lon: Option<f64>,
        radius_m: u32,
        limit: u32,
    ) -> Result<Vec<OsmPeakSnapshot>, ProviderError> {
        let has_query = query.is_some_and(|q| !q.trim().is_empty());
        if !has_query && (lat.is_none() || lon.is_none()) {
            return Err(ProviderError::InvalidQuery(
                "Provide a search term or coordinates.".into(),
            ));
        }

        let payload = self.fetch_raw(query, lat, lon, radius_m, limit).await?;
        let elements = payload
            .get("elements")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut snapshots = Vec::new();
        for element in elements {
            if element.get("type").and_then(Value::as_str) != Some("node") {
                continue;
            }
            let mut snapshot = normalize_element(&element);
            if snapshot.elevation_m.is_none() {
                if let (Some(lat), Some(lon)) = (snapshot.lat, snapshot.lon) {
                    snapshot.elevation_m = self.elevation.lookup_elevation(lat, lon).await;
                }
            }
            snapshots.push(snapshot);
        }

        if snapshots.is_empty() {
            return Err(ProviderError::NotFound("No peaks found for that query.".into()));
        }
        Ok(snapshots)
    }

    /// Fetch the best-match snapshot for a stored peak, cached by name
    /// slug and rounded coordinates. Returns the snapshot and whether it
    /// came from the cache. `force` bypasses the snapshot cache read.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` when the peak has no name; search errors pass
    /// through.
    pub async fn snapshot_for_peak(
        &self,
        peak: &Peak,
        force: bool,
    ) -> Result<(OsmPeakSnapshot, bool), ProviderError> {
        if peak.name.trim().is_empty() {
            return Err(ProviderError::InvalidQuery(
                "Peak name required to look up OpenStreetMap data.".into(),
            ));
        }

        let key = CacheKey::new(
            "overpass".into(),
            CacheResource::OsmSnapshot {
                slug: slugify(&peak.name),
                lat: round_coord_opt(peak.lat, coord_precision::OVERPASS),
                lon: round_coord_opt(peak.lon, coord_precision::OVERPASS),
                radius_m: 0,
                limit: 1,
            },
        );
        if !force {
            if let Ok(Some(cached)) = self.cache.get::<OsmPeakSnapshot>(&key).await {
                return Ok((cached, true));
            }
        }

        let snapshots = self
            .search_peaks(
                Some(&peak.name),
                peak.lat,
                peak.lon,
                limits::DEFAULT_RADIUS_M,
                1,
            )
            .await?;
        // search_peaks never returns an empty Ok
        let snapshot = snapshots
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound("No peaks found for that query.".into()))?;

        if let Err(error) = self.cache.set(&key, &snapshot, self.ttl).await {
            warn!(error = %error, "failed to cache peak snapshot");
        }
        Ok((snapshot, false))
    }
}

/// Normalize a single Overpass node element
fn normalize_element(element: &Value) -> OsmPeakSnapshot {
    let empty = Value::Object(serde_json::Map::new());
    let tags = element.get("tags").unwrap_or(&empty);

    let name = util::first_str(tags, ["name", "alt_name", "int_name"])
        .unwrap_or_else(|| "Unnamed peak".to_owned());
    let node_type = element
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("node");
    let id = element
        .get("id")
        .map_or_else(String::new, std::string::ToString::to_string);

    OsmPeakSnapshot {
        osm_id: format!("{node_type}:{id}"),
        name,
        lat: util::parse_f64(element.get("lat")),
        lon: util::parse_f64(element.get("lon")),
        elevation_m: util::parse_f64(tags.get("ele")),
        country: util::first_str(tags, ["addr:country", "is_in:country", "country"]),
        region: util::first_str(tags, ["addr:state", "is_in:state", "state", "is_in:province"]),
        range: util::first_str(tags, ["mountain_range", "range"]),
        retrieved_at: Utc::now(),
        raw: element.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_query_with_name_and_area() {
        let query = build_query(Some("Rainier"), Some(46.85), Some(-121.76), 50_000, 10);
        assert!(query.starts_with("[out:json][timeout:25];"));
        assert!(query.contains("[\"natural\"~\"peak|mountain_pass|volcano\"]"));
        assert!(query.contains("[\"name\"~\"Rainier\",i]"));
        assert!(query.contains("(around:50000,46.85,-121.76)"));
        assert!(query.ends_with("out body 10;"));
    }

    #[test]
    fn test_build_query_strips_quotes_and_backslashes() {
        let query = build_query(Some("Rai\"nier\\"), None, None, 0, 0);
        assert!(query.contains("[\"name\"~\"Rainier\",i]"));
        assert!(query.ends_with("out body;"));
    }

    #[test]
    fn test_normalize_element_malformed_elevation() {
        let element = json!({
            "type": "node",
            "id": 123,
            "lat": 46.8523,
            "lon": -121.7603,
            "tags": {"name": "Mount Rainier", "ele": "not-a-number"}
        });
        let snapshot = normalize_element(&element);
        assert_eq!(snapshot.osm_id, "node:123");
        assert_eq!(snapshot.name, "Mount Rainier");
        assert_eq!(snapshot.elevation_m, None);
        assert_eq!(snapshot.lat, Some(46.8523));
    }

    #[test]
    fn test_normalize_element_name_fallback() {
        let element = json!({
            "type": "node",
            "id": 7,
            "tags": {"alt_name": "Tahoma"}
        });
        let snapshot = normalize_element(&element);
        assert_eq!(snapshot.name, "Tahoma");

        let unnamed = normalize_element(&json!({"type": "node", "id": 8, "tags": {}}));
        assert_eq!(unnamed.name, "Unnamed peak");
    }
}
