// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, defaults and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-based configuration management

use crate::constants::{cache_ttl, endpoints, limits, timeouts};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::warn;

/// Top-level server configuration, sourced from environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Database URL (SQLite path or `sqlite::memory:`)
    pub database_url: String,
    /// Per-provider endpoint/timeout/retry settings
    pub providers: ProvidersConfig,
    /// Cache TTLs per provider class
    pub cache: CacheTtlSettings,
}

/// Configuration for a single external provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider endpoint
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Maximum retry attempts for transient transport failures
    pub max_retries: u32,
    /// API key, for providers that require one
    pub api_key: Option<String>,
}

impl ProviderConfig {
    /// Request timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// All external provider configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub overpass: ProviderConfig,
    pub elevation: ProviderConfig,
    pub weather: ProviderConfig,
    pub nps: ProviderConfig,
    pub open_peaks: ProviderConfig,
}

/// Cache TTLs per provider class, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTtlSettings {
    pub overpass_secs: u64,
    pub elevation_secs: u64,
    pub weather_secs: u64,
    pub nps_secs: u64,
    pub open_peaks_secs: u64,
}

impl Default for CacheTtlSettings {
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

impl ServerConfig {
    /// Load configuration from environment variables, applying defaults
    /// for anything unset.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a set variable fails to parse.
    pub fn from_env() -> AppResult<Self> {
        let http_port = parse_env_or("HTTP_PORT", 8081)?;
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./data/peak_planner.db".into());

        let nps_api_key = env::var("NPS_API_KEY").ok();
        if nps_api_key.is_none() {
            warn!("NPS_API_KEY not set, NPS place lookups will be unauthenticated");
        }

        Ok(Self {
            http_port,
            database_url,
            providers: ProvidersConfig {
                overpass: ProviderConfig {
                    base_url: env_or("OVERPASS_BASE_URL", endpoints::OVERPASS),
                    timeout_secs: parse_env_or("OVERPASS_TIMEOUT_SECS", timeouts::OVERPASS_SECS)?,
                    max_retries: parse_env_or("OVERPASS_MAX_RETRIES", limits::DEFAULT_MAX_RETRIES)?,
                    api_key: None,
                },
                elevation: ProviderConfig {
                    base_url: env_or("OPENTOPODATA_BASE_URL", endpoints::OPENTOPODATA),
                    timeout_secs: parse_env_or("ELEVATION_TIMEOUT_SECS", timeouts::ELEVATION_SECS)?,
                    max_retries: parse_env_or("ELEVATION_MAX_RETRIES", limits::DEFAULT_MAX_RETRIES)?,
                    api_key: None,
                },
                weather: ProviderConfig {
                    base_url: env_or("OPEN_METEO_BASE_URL", endpoints::OPEN_METEO),
                    timeout_secs: parse_env_or("WEATHER_TIMEOUT_SECS", timeouts::WEATHER_SECS)?,
                    max_retries: parse_env_or("WEATHER_MAX_RETRIES", limits::DEFAULT_MAX_RETRIES)?,
                    api_key: None,
                },
                nps: ProviderConfig {
                    base_url: env_or("NPS_BASE_URL", endpoints::NPS_PLACES),
                    timeout_secs: parse_env_or("NPS_TIMEOUT_SECS", timeouts::NPS_SECS)?,
                    max_retries: parse_env_or("NPS_MAX_RETRIES", limits::DEFAULT_MAX_RETRIES)?,
                    api_key: nps_api_key,
                },
                open_peaks: ProviderConfig {
                    base_url: env_or("OPEN_PEAKS_BASE_URL", endpoints::OPEN_PEAKS),
                    timeout_secs: parse_env_or("OPEN_PEAKS_TIMEOUT_SECS", timeouts::OPEN_PEAKS_SECS)?,
                    max_retries: parse_env_or(
                        "OPEN_PEAKS_MAX_RETRIES",
                        limits::DEFAULT_MAX_RETRIES,
                    )?,
                    api_key: None,
                },
            },
            cache: CacheTtlSettings {
                overpass_secs: parse_env_or("CACHE_TTL_OVERPASS_SECS", cache_ttl::OVERPASS_SECS)?,
                elevation_secs: parse_env_or(
                    "CACHE_TTL_ELEVATION_SECS",
                    cache_ttl::ELEVATION_SECS,
                )?,
                weather_secs: parse_env_or("CACHE_TTL_WEATHER_SECS", cache_ttl::WEATHER_SECS)?,
                nps_secs: parse_env_or("CACHE_TTL_NPS_SECS", cache_ttl::NPS_SECS)?,
                open_peaks_secs: parse_env_or(
                    "CACHE_TTL_OPEN_PEAKS_SECS",
                    cache_ttl::OPEN_PEAKS_SECS,
                )?,
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("invalid value for {key}: {raw}"))),
        Err(_) => Ok(default),
    }
}
