// ABOUTME: Application-wide constants for cache TTLs, rounding and provider limits
// ABOUTME: Centralizes magic numbers so provider and cache behavior stay in one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application constants

/// Cache time-to-live values, in seconds
pub mod cache_ttl {
    /// Overpass peak snapshots
    pub const OVERPASS_SECS: u64 = 1800;
    /// Point elevation lookups
    pub const ELEVATION_SECS: u64 = 3600;
    /// Weather forecasts
    pub const WEATHER_SECS: u64 = 3600;
    /// NPS place searches
    pub const NPS_SECS: u64 = 1800;
    /// Open Peaks searches
    pub const OPEN_PEAKS_SECS: u64 = 1800;
}

/// Coordinate rounding precision (decimal places) used when building cache
/// keys. Coordinates that differ only beyond these thresholds collapse to
/// the same key.
pub mod coord_precision {
    /// Overpass snapshot lookups (~110 m)
    pub const OVERPASS: u32 = 3;
    /// Elevation lookups (~11 m)
    pub const ELEVATION: u32 = 4;
    /// Weather forecasts (~1.1 km)
    pub const WEATHER: u32 = 2;
    /// NPS place searches
    pub const NPS: u32 = 4;
    /// Open Peaks searches
    pub const OPEN_PEAKS: u32 = 4;
}

/// Per-provider request timeouts, in seconds
pub mod timeouts {
    /// Overpass interpreter (slow public endpoint)
    pub const OVERPASS_SECS: u64 = 25;
    /// OpenTopoData
    pub const ELEVATION_SECS: u64 = 10;
    /// Open-Meteo
    pub const WEATHER_SECS: u64 = 10;
    /// NPS places API
    pub const NPS_SECS: u64 = 5;
    /// Open Peaks
    pub const OPEN_PEAKS_SECS: u64 = 5;
}

/// Provider query defaults and limits
pub mod limits {
    /// Default Overpass around-filter radius in meters
    pub const DEFAULT_RADIUS_M: u32 = 50_000;
    /// Default result limit for Overpass searches
    pub const DEFAULT_OVERPASS_LIMIT: u32 = 10;
    /// Default result limit for NPS place searches
    pub const DEFAULT_NPS_LIMIT: u32 = 5;
    /// Default result limit for Open Peaks searches
    pub const DEFAULT_OPEN_PEAKS_LIMIT: u32 = 5;
    /// Radius in kilometers sent to Open Peaks when coordinates are given
    pub const OPEN_PEAKS_RADIUS_KM: u32 = 40;
    /// Maximum number of retry attempts for transient transport failures
    pub const DEFAULT_MAX_RETRIES: u32 = 1;
    /// Base backoff between retries, in milliseconds (multiplied by attempt)
    pub const RETRY_BACKOFF_MS: u64 = 200;
}

/// Default provider endpoints
pub mod endpoints {
    pub const OVERPASS: &str = "https://overpass-api.de/api/interpreter";
    pub const OPENTOPODATA: &str = "https://api.opentopodata.org/v1/etopo1";
    pub const OPEN_METEO: &str = "https://api.open-meteo.com/v1/forecast";
    pub const NPS_PLACES: &str = "https://developer.nps.gov/api/v1/places";
    pub const OPEN_PEAKS: &str = "https://api.openpeaks.org/v1/peaks";
}

/// NPS places query parameter allow-lists
pub mod nps {
    /// Fields requested from the places API
    pub const FIELDS: &str =
        "latitude,longitude,listingdescription,states,designation,placeType,topics";
    /// Place types considered mountain-relevant
    pub const PLACE_TYPES: &[&str] = &[
        "mountain", "summit", "peak", "alpine", "trail", "landform", "mesa", "rock", "volcano",
    ];
    /// Topics considered mountain-relevant
    pub const TOPICS: &[&str] = &["Mountains", "Geology", "Science"];
}

/// Country name variants that identify a United States peak during
/// cross-provider aggregation. Matching is case-insensitive on the
/// trimmed country string.
pub const US_COUNTRY_VARIANTS: &[&str] = &["usa", "united states", "united states of america", "us"];

/// Open-Meteo forecast request shape
pub mod forecast {
    /// Hourly variables requested
    pub const HOURLY_VARIABLES: &str =
        "temperature_2m,apparent_temperature,precipitation_probability,wind_speed_10m";
    /// Daily variables requested
    pub const DAILY_VARIABLES: &str =
        "temperature_2m_max,temperature_2m_min,sunrise,sunset,precipitation_probability_max";
    /// Number of forecast days requested
    pub const FORECAST_DAYS: u32 = 3;
}
