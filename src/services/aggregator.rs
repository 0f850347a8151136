// ABOUTME: Cross-provider peak search combining Open Peaks with NPS enrichment
// ABOUTME: Enrichment failures are swallowed so the aggregate never loses the primary result
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::constants::US_COUNTRY_VARIANTS;
use crate::providers::{
    NpsClient, NpsPlaceSnapshot, OpenPeaksClient, OpenPeaksSnapshot, ProviderError,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Primary summit search seam, implemented by [`OpenPeaksClient`] in
/// production and by stubs in tests
#[async_trait::async_trait]
pub trait PeaksDirectory: Send + Sync {
    async fn search(
        &self,
        query: &str,
        limit: u32,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<(Vec<OpenPeaksSnapshot>, bool), ProviderError>;
}

/// Secondary place lookup seam, implemented by [`NpsClient`]
#[async_trait::async_trait]
pub trait PlacesDirectory: Send + Sync {
    async fn search_places(
        &self,
        query: &str,
        lat: Option<f64>,
        lon: Option<f64>,
        limit: u32,
    ) -> Result<Vec<NpsPlaceSnapshot>, ProviderError>;
}

#[async_trait::async_trait]
impl PeaksDirectory for OpenPeaksClient {
    async fn search(
        &self,
        query: &str,
        limit: u32,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<(Vec<OpenPeaksSnapshot>, bool), ProviderError> {
        Self::search(self, query, limit, lat, lon).await
    }
}

#[async_trait::async_trait]
impl PlacesDirectory for NpsClient {
    async fn search_places(
        &self,
        query: &str,
        lat: Option<f64>,
        lon: Option<f64>,
        limit: u32,
    ) -> Result<Vec<NpsPlaceSnapshot>, ProviderError> {
        Self::search_places(self, query, lat, lon, limit)
            .await
            .map(|(snapshots, _)| snapshots)
    }
}

/// One aggregated search result: the primary summit record plus an
/// optional NPS place when the summit is in the United States
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakSearchHit {
    pub peak: OpenPeaksSnapshot,
    pub nps: Option<NpsPlaceSnapshot>,
}

/// Does this country string name the United States?
#[must_use]
pub fn is_us_country(country: Option<&str>) -> bool {
    country.is_some_and(|c| {
        let normalized = c.trim().to_lowercase();
        US_COUNTRY_VARIANTS.contains(&normalized.as_str())
    })
}

/// Search Open Peaks and enrich US results with one sequential NPS
/// lookup each. Returns the hits and whether the primary result came
/// from the cache.
///
/// Enrichment failures of any kind leave `nps` as `None`; only the
/// primary search can fail the aggregate.
///
/// # Errors
///
/// Propagates primary-search errors (`InvalidQuery`, `NotFound`,
/// transport failures).
pub async fn search_peaks_with_context(
    primary: &dyn PeaksDirectory,
    places: &dyn PlacesDirectory,
    query: &str,
    limit: u32,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<(Vec<PeakSearchHit>, bool), ProviderError> {
    let (peaks, from_cache) = primary.search(query, limit, lat, lon).await?;

    let mut hits = Vec::with_capacity(peaks.len());
    for peak in peaks {
        let nps = if is_us_country(peak.country.as_deref()) {
            let name = peak.name.as_deref().unwrap_or(query);
            match places.search_places(name, peak.lat, peak.lon, 1).await {
                Ok(snapshots) => snapshots.into_iter().next(),
                Err(error) => {
                    debug!(error = %error, peak = name, "NPS enrichment skipped");
                    None
                }
            }
        } else {
            None
        };
        hits.push(PeakSearchHit { peak, nps });
    }

    Ok((hits, from_cache))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_us_country_variants() {
        assert!(is_us_country(Some("USA")));
        assert!(is_us_country(Some("united states")));
        assert!(is_us_country(Some(" United States of America ")));
        assert!(is_us_country(Some("US")));
        assert!(!is_us_country(Some("Canada")));
        assert!(!is_us_country(None));
    }
}
