// ABOUTME: Open-Meteo client for 3-day mountain weather forecasts
// ABOUTME: Reshapes the raw forecast into a compact location/hourly/daily bundle
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::errors::ProviderError;
use super::http::HttpFetch;
use super::util;
use crate::cache::{memory::InMemoryCache, round_coord, CacheKey, CacheProvider, CacheResource};
use crate::config::ProviderConfig;
use crate::constants::{coord_precision, forecast};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Reshaped forecast payload: resolved location plus the raw hourly and
/// daily series from Open-Meteo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub location: ForecastLocation,
    pub hourly: Value,
    pub daily: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Weather forecast client. Forecasts are cached per location rounded to
/// two decimals, so nearby requests share one upstream call.
pub struct OpenMeteoClient {
    fetch: Arc<dyn HttpFetch>,
    cache: InMemoryCache,
    config: ProviderConfig,
    ttl: Duration,
}

impl OpenMeteoClient {
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
            "open-meteo".into(),
            CacheResource::Forecast {
                lat: round_coord(lat, coord_precision::WEATHER),
                lon: round_coord(lon, coord_precision::WEATHER),
            },
        )
    }

    /// Fetch the 3-day forecast for a location
    ///
    /// # Errors
    ///
    /// Transport and decode errors pass through as `ProviderError`.
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<ForecastBundle, ProviderError> {
        let key = Self::cache_key(lat, lon);
        if let Ok(Some(cached)) = self.cache.get::<ForecastBundle>(&key).await {
            return Ok(cached);
        }

        let query = [
            ("latitude".to_owned(), lat.to_string()),
            ("longitude".to_owned(), lon.to_string()),
            ("hourly".to_owned(), forecast::HOURLY_VARIABLES.to_owned()),
            ("daily".to_owned(), forecast::DAILY_VARIABLES.to_owned()),
            (
                "forecast_days".to_owned(),
                forecast::FORECAST_DAYS.to_string(),
            ),
            ("timezone".to_owned(), "auto".to_owned()),
        ];
        let data = self.fetch.get_json(&self.config.base_url, &query, &[]).await?;

        let bundle = ForecastBundle {
            location: ForecastLocation {
                latitude: util::parse_f64(data.get("latitude")),
                longitude: util::parse_f64(data.get("longitude")),
            },
            hourly: data.get("hourly").cloned().unwrap_or(Value::Null),
            daily: data.get("daily").cloned().unwrap_or(Value::Null),
        };

        if let Err(error) = self.cache.set(&key, &bundle, self.ttl).await {
            warn!(error = %error, "failed to cache forecast");
        }
        Ok(bundle)
    }
}
