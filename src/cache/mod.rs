// ABOUTME: Cache abstraction layer for external provider response caching
// ABOUTME: Deterministic fingerprint keys built from slugs and rounded coordinates
//
// SPDX-License-Identifier: MIT OR Apache-2.0

/// In-memory cache implementation
pub mod memory;

use crate::constants::cache_ttl;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Cache provider trait for pluggable backend implementations
///
/// Implementations are injected into provider clients as shared values;
/// nothing in the crate holds a module-level cache singleton.
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync + Clone {
    /// Create new cache instance with configuration
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Store value in cache with TTL
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>;

    /// Retrieve value from cache, `None` on miss or expiry
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>>;

    /// Remove single cache entry
    ///
    /// # Errors
    ///
    /// Returns an error if invalidation fails
    async fn invalidate(&self, key: &CacheKey) -> AppResult<()>;

    /// Remove all cache entries matching a glob pattern (e.g. `"overpass:*"`)
    ///
    /// # Errors
    ///
    /// Returns an error if pattern invalidation fails
    async fn invalidate_pattern(&self, pattern: &str) -> AppResult<u64>;

    /// Check if key exists in cache
    ///
    /// # Errors
    ///
    /// Returns an error if existence check fails
    async fn exists(&self, key: &CacheKey) -> AppResult<bool>;

    /// Get remaining TTL for key
    ///
    /// # Errors
    ///
    /// Returns an error if TTL check fails
    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>>;

    /// Clear all cache entries (for testing/admin)
    ///
    /// # Errors
    ///
    /// Returns an error if clear operation fails
    async fn clear_all(&self) -> AppResult<()>;
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub max_entries: usize,
    /// Cleanup interval for expired entries
    pub cleanup_interval: Duration,
    /// Enable background cleanup task (false in tests to avoid runtime conflicts)
    pub enable_background_cleanup: bool,
    /// Cache TTL configuration
    pub ttl: CacheTtlConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            cleanup_interval: Duration::from_secs(300),
            enable_background_cleanup: true,
            ttl: CacheTtlConfig::default(),
        }
    }
}

/// Cache TTL configuration per provider class
#[derive(Debug, Clone)]
pub struct CacheTtlConfig {
    /// Overpass peak snapshot TTL in seconds (default: 30 minutes)
    pub overpass_secs: u64,
    /// Elevation lookup TTL in seconds (default: 60 minutes)
    pub elevation_secs: u64,
    /// Weather forecast TTL in seconds (default: 60 minutes)
    pub weather_secs: u64,
    /// NPS place search TTL in seconds (default: 30 minutes)
    pub nps_secs: u64,
    /// Open Peaks search TTL in seconds (default: 30 minutes)
    pub open_peaks_secs: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            overpass_secs: cache_ttl::OVERPASS_SECS,
            elevation_secs: cache_ttl::ELEVATION_SECS,
            weather_secs: cache_ttl::WEATHER_SECS,
            nps_secs: cache_ttl::NPS_SECS,
            open_peaks_secs: cache_ttl::OPEN_PEAKS_SECS,
        }
    }
}

impl CacheTtlConfig {
    /// Get TTL duration for a specific cache resource type
    #[must_use]
    pub const fn ttl_for_resource(&self, resource: &CacheResource) -> Duration {
        match resource {
            CacheResource::OsmSnapshot { .. } => Duration::from_secs(self.overpass_secs),
            CacheResource::Elevation { .. } => Duration::from_secs(self.elevation_secs),
            CacheResource::Forecast { .. } => Duration::from_secs(self.weather_secs),
            CacheResource::NpsPlaces { .. } | CacheResource::NpsSnapshot { .. } => {
                Duration::from_secs(self.nps_secs)
            }
            CacheResource::OpenPeaksSearch { .. } => Duration::from_secs(self.open_peaks_secs),
        }
    }
}

/// Structured cache key: provider tag plus a normalized resource fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Provider tag ("overpass", "opentopodata", "open-meteo", "nps", "openpeaks")
    pub provider: String,
    /// Specific resource being cached
    pub resource: CacheResource,
}

impl CacheKey {
    /// Create new cache key
    #[must_use]
    pub const fn new(provider: String, resource: CacheResource) -> Self {
        Self { provider, resource }
    }

    /// Create pattern for invalidating all entries of a provider
    #[must_use]
    pub fn provider_pattern(provider: &str) -> String {
        format!("{provider}:*")
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.resource)
    }
}

/// Cache resource fingerprints. Coordinates are stored pre-rounded as
/// strings (see [`round_coord`]) so that equal-after-rounding requests
/// hash to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheResource {
    /// Overpass snapshot search for a peak
    OsmSnapshot {
        /// Slug of the free-text query, empty when unfiltered
        slug: String,
        /// Rounded latitude, empty when no around-filter
        lat: String,
        /// Rounded longitude, empty when no around-filter
        lon: String,
        /// Around-filter radius in meters
        radius_m: u32,
        /// Result limit
        limit: u32,
    },
    /// Point elevation lookup
    Elevation { lat: String, lon: String },
    /// Weather forecast for a location
    Forecast { lat: String, lon: String },
    /// NPS place search
    NpsPlaces {
        slug: String,
        lat: String,
        lon: String,
        limit: u32,
    },
    /// Best-match NPS place for a stored peak. Kept separate from
    /// [`CacheResource::NpsPlaces`] so a single-snapshot entry never
    /// clobbers a cached result list for the same name.
    NpsSnapshot {
        slug: String,
        lat: String,
        lon: String,
    },
    /// Open Peaks search
    OpenPeaksSearch {
        slug: String,
        lat: String,
        lon: String,
        radius_m: u32,
        limit: u32,
    },
}

impl fmt::Display for CacheResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OsmSnapshot {
                slug,
                lat,
                lon,
                radius_m,
                limit,
            } => write!(f, "osm_snapshot:{slug}:{lat}:{lon}:r{radius_m}:n{limit}"),
            Self::Elevation { lat, lon } => write!(f, "elevation:{lat}:{lon}"),
            Self::Forecast { lat, lon } => write!(f, "forecast:{lat}:{lon}"),
            Self::NpsPlaces {
                slug,
                lat,
                lon,
                limit,
            } => write!(f, "places:{slug}:{lat}:{lon}:n{limit}"),
            Self::NpsSnapshot { slug, lat, lon } => {
                write!(f, "place_snapshot:{slug}:{lat}:{lon}")
            }
            Self::OpenPeaksSearch {
                slug,
                lat,
                lon,
                radius_m,
                limit,
            } => write!(f, "search:{slug}:{lat}:{lon}:r{radius_m}:n{limit}"),
        }
    }
}

/// Round a coordinate to a fixed number of decimal places and render it
/// deterministically. `-0.0` collapses to `0.0` so that hashes agree.
#[must_use]
pub fn round_coord(value: f64, decimals: u32) -> String {
    let factor = 10f64.powi(decimals as i32);
    let mut rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        rounded = 0.0; // normalize -0.0
    }
    format!("{rounded:.prec$}", prec = decimals as usize)
}

/// Optional-coordinate variant of [`round_coord`]; `None` renders empty.
#[must_use]
pub fn round_coord_opt(value: Option<f64>, decimals: u32) -> String {
    value.map_or_else(String::new, |v| round_coord(v, decimals))
}

/// Lowercase a free-text query and collapse non-alphanumeric runs to a
/// single hyphen, producing a stable slug for cache keys.
#[must_use]
pub fn slugify(query: &str) -> String {
    let mut slug = String::with_capacity(query.len());
    let mut last_was_sep = true;
    for c in query.trim().chars() {
        if c.is_alphanumeric() {
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('-');
            last_was_sep = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_coord_collapses_sub_threshold_differences() {
        assert_eq!(round_coord(46.8523, 2), round_coord(46.8491, 2));
        assert_ne!(round_coord(46.85, 2), round_coord(46.86, 2));
    }

    #[test]
    fn test_round_coord_negative_zero() {
        assert_eq!(round_coord(-0.0001, 2), "0.00");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Mount Rainier"), "mount-rainier");
        assert_eq!(slugify("  Pico   de Orizaba! "), "pico-de-orizaba");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_cache_key_display_is_deterministic() {
        let key = CacheKey::new(
            "open-meteo".into(),
            CacheResource::Forecast {
                lat: round_coord(46.8523, 2),
                lon: round_coord(-121.7603, 2),
            },
        );
        assert_eq!(key.to_string(), "open-meteo:forecast:46.85:-121.76");
    }
}
