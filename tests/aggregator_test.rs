// ABOUTME: Tests for the cross-provider peak search aggregator
// ABOUTME: Uses stub directories to verify US-only enrichment and error tolerance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::Utc;
use peak_planner::providers::{NpsPlaceSnapshot, OpenPeaksSnapshot, ProviderError};
use peak_planner::services::aggregator::{
    search_peaks_with_context, PeaksDirectory, PlacesDirectory,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

fn summit(name: &str, country: &str) -> OpenPeaksSnapshot {
    OpenPeaksSnapshot {
        source: "open_peaks".to_owned(),
        external_id: Some(name.to_lowercase().replace(' ', "-")),
        name: Some(name.to_owned()),
        country: Some(country.to_owned()),
        region: None,
        range: None,
        elevation_m: Some(4392),
        prominence_m: None,
        lat: Some(46.8523),
        lon: Some(-121.7603),
        retrieved_at: Utc::now(),
        raw: json!({"name": name}),
    }
}

fn place(name: &str) -> NpsPlaceSnapshot {
    NpsPlaceSnapshot {
        source: "nps".to_owned(),
        external_id: Some("PLACE-1".to_owned()),
        name: Some(name.to_owned()),
        states: Some("WA".to_owned()),
        designation: Some("National Park".to_owned()),
        description: None,
        lat: Some(46.85),
        lon: Some(-121.76),
        retrieved_at: Utc::now(),
        raw: json!({"title": name}),
    }
}

struct StubPeaks {
    results: Vec<OpenPeaksSnapshot>,
    from_cache: bool,
}

#[async_trait::async_trait]
impl PeaksDirectory for StubPeaks {
    async fn search(
        &self,
        _query: &str,
        _limit: u32,
        _lat: Option<f64>,
        _lon: Option<f64>,
    ) -> Result<(Vec<OpenPeaksSnapshot>, bool), ProviderError> {
        Ok((self.results.clone(), self.from_cache))
    }
}

struct FailingPeaks;

#[async_trait::async_trait]
impl PeaksDirectory for FailingPeaks {
    async fn search(
        &self,
        _query: &str,
        _limit: u32,
        _lat: Option<f64>,
        _lon: Option<f64>,
    ) -> Result<(Vec<OpenPeaksSnapshot>, bool), ProviderError> {
        Err(ProviderError::NotFound("No peaks found for that query.".into()))
    }
}

struct StubPlaces {
    result: Option<NpsPlaceSnapshot>,
    fail_with: Option<fn() -> ProviderError>,
    calls: AtomicUsize,
}

impl StubPlaces {
    fn returning(result: Option<NpsPlaceSnapshot>) -> Self {
        Self {
            result,
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(error: fn() -> ProviderError) -> Self {
        Self {
            result: None,
            fail_with: Some(error),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl PlacesDirectory for StubPlaces {
    async fn search_places(
        &self,
        _query: &str,
        _lat: Option<f64>,
        _lon: Option<f64>,
        _limit: u32,
    ) -> Result<Vec<NpsPlaceSnapshot>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.fail_with {
            return Err(error());
        }
        Ok(self.result.clone().into_iter().collect())
    }
}

#[tokio::test]
async fn test_us_summits_get_nps_enrichment() {
    let primary = StubPeaks {
        results: vec![summit("Mount Rainier", "USA")],
        from_cache: false,
    };
    let places = StubPlaces::returning(Some(place("Mount Rainier")));

    let (hits, from_cache) =
        search_peaks_with_context(&primary, &places, "Rainier", 5, None, None)
            .await
            .unwrap();

    assert!(!from_cache);
    assert_eq!(hits.len(), 1);
    let nps = hits[0].nps.as_ref().unwrap();
    assert_eq!(nps.designation.as_deref(), Some("National Park"));
    assert_eq!(places.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_non_us_summits_skip_enrichment() {
    let primary = StubPeaks {
        results: vec![summit("Mont Blanc", "France"), summit("Denali", "US")],
        from_cache: true,
    };
    let places = StubPlaces::returning(Some(place("Denali")));

    let (hits, from_cache) =
        search_peaks_with_context(&primary, &places, "mont", 5, None, None)
            .await
            .unwrap();

    assert!(from_cache);
    assert_eq!(hits.len(), 2);
    assert!(hits[0].nps.is_none());
    assert!(hits[1].nps.is_some());
    // Only the US summit triggered a place lookup
    assert_eq!(places.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_enrichment_failure_keeps_primary_result() {
    let primary = StubPeaks {
        results: vec![summit("Mount Rainier", "United States")],
        from_cache: false,
    };
    let places = StubPlaces::failing(|| ProviderError::RateLimited("slow down".into()));

    let (hits, _) = search_peaks_with_context(&primary, &places, "Rainier", 5, None, None)
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert!(hits[0].nps.is_none());
}

#[tokio::test]
async fn test_enrichment_not_found_keeps_primary_result() {
    let primary = StubPeaks {
        results: vec![summit("Mount Rainier", "USA")],
        from_cache: false,
    };
    let places = StubPlaces::failing(|| ProviderError::NotFound("no matching place".into()));

    let (hits, _) = search_peaks_with_context(&primary, &places, "Rainier", 5, None, None)
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert!(hits[0].nps.is_none());
    assert_eq!(places.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_primary_failure_fails_the_aggregate() {
    let places = StubPlaces::returning(None);
    let error = search_peaks_with_context(&FailingPeaks, &places, "nowhere", 5, None, None)
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::NotFound(_)));
    assert_eq!(places.calls.load(Ordering::SeqCst), 0);
}
