// ABOUTME: Shared dependency bundle handed to every route handler
// ABOUTME: Builds provider clients around one cache and per-provider transports
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::cache::memory::InMemoryCache;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::providers::{
    HttpClient, HttpFetch, NpsClient, OpenMeteoClient, OpenPeaksClient, OpenTopoClient,
    OverpassClient,
};
use std::sync::Arc;
use std::time::Duration;

/// Dependency-injection container shared across route handlers.
/// Constructed once at startup and passed as axum state.
pub struct ServerResources {
    pub database: Database,
    pub config: ServerConfig,
    pub overpass: OverpassClient,
    pub weather: OpenMeteoClient,
    pub nps: NpsClient,
    pub open_peaks: OpenPeaksClient,
}

impl ServerResources {
    /// Wire up provider clients with the real HTTP transport
    ///
    /// # Errors
    ///
    /// Returns an error if a transport cannot be constructed.
    pub fn new(config: ServerConfig, database: Database, cache: InMemoryCache) -> AppResult<Self> {
        let providers = &config.providers;
        let ttls = &config.cache;

        let elevation_fetch: Arc<dyn HttpFetch> = Arc::new(HttpClient::new(
            providers.elevation.timeout(),
            providers.elevation.max_retries,
        )?);
        let elevation = OpenTopoClient::new(
            elevation_fetch,
            cache.clone(),
            providers.elevation.clone(),
            Duration::from_secs(ttls.elevation_secs),
        );

        let overpass_fetch: Arc<dyn HttpFetch> = Arc::new(HttpClient::new(
            providers.overpass.timeout(),
            providers.overpass.max_retries,
        )?);
        let overpass = OverpassClient::new(
            overpass_fetch,
            cache.clone(),
            providers.overpass.clone(),
            Duration::from_secs(ttls.overpass_secs),
            elevation,
        );

        let weather_fetch: Arc<dyn HttpFetch> = Arc::new(HttpClient::new(
            providers.weather.timeout(),
            providers.weather.max_retries,
        )?);
        let weather = OpenMeteoClient::new(
            weather_fetch,
            cache.clone(),
            providers.weather.clone(),
            Duration::from_secs(ttls.weather_secs),
        );

        let nps_fetch: Arc<dyn HttpFetch> =
            Arc::new(HttpClient::new(providers.nps.timeout(), providers.nps.max_retries)?);
        let nps = NpsClient::new(
            nps_fetch,
            cache.clone(),
            providers.nps.clone(),
            Duration::from_secs(ttls.nps_secs),
        );

        let open_peaks_fetch: Arc<dyn HttpFetch> = Arc::new(HttpClient::new(
            providers.open_peaks.timeout(),
            providers.open_peaks.max_retries,
        )?);
        let open_peaks = OpenPeaksClient::new(
            open_peaks_fetch,
            cache,
            providers.open_peaks.clone(),
            Duration::from_secs(ttls.open_peaks_secs),
        );

        Ok(Self {
            database,
            config,
            overpass,
            weather,
            nps,
            open_peaks,
        })
    }
}
