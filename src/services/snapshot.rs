// ABOUTME: Applies external provider snapshots onto persistent peak records
// ABOUTME: Provenance fields are overwritten; user-visible fields fill empty slots only
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Snapshot Application
//!
//! Merging is split into pure functions returning the set of changed
//! columns, so the database write touches only what actually changed and
//! application stays idempotent.

use crate::database::PeaksManager;
use crate::errors::AppResult;
use crate::models::Peak;
use crate::providers::{NpsPlaceSnapshot, OsmPeakSnapshot};

/// Merge an OSM snapshot into a peak, returning the changed columns.
///
/// Provenance fields are overwritten unconditionally; region, lat, lon
/// and elevation are only filled when currently unset.
#[must_use]
pub fn merge_osm_snapshot(peak: &mut Peak, snapshot: &OsmPeakSnapshot) -> Vec<&'static str> {
    let mut columns = vec![
        "external_source",
        "external_id",
        "external_country",
        "external_range",
        "external_elevation_m",
        "external_retrieved_at",
        "external_payload",
    ];

    peak.external_source = Some("osm".to_owned());
    peak.external_id = Some(snapshot.osm_id.clone());
    peak.external_country = snapshot.country.clone();
    peak.external_range = snapshot.range.clone().or_else(|| snapshot.region.clone());
    peak.external_elevation_m = snapshot.elevation_m;
    peak.external_retrieved_at = Some(snapshot.retrieved_at);
    peak.external_payload = Some(snapshot.raw.clone());

    if peak.region.is_none() {
        if let Some(region) = &snapshot.region {
            peak.region = Some(region.clone());
            columns.push("region");
        }
    }
    if peak.lat.is_none() {
        if let Some(lat) = snapshot.lat {
            peak.lat = Some(lat);
            columns.push("lat");
        }
    }
    if peak.lon.is_none() {
        if let Some(lon) = snapshot.lon {
            peak.lon = Some(lon);
            columns.push("lon");
        }
    }
    if peak.elevation_m.is_none() {
        if let Some(elevation_m) = snapshot.elevation_m {
            peak.elevation_m = Some(elevation_m);
            columns.push("elevation_m");
        }
    }

    columns
}

/// Merge an NPS snapshot into a peak, returning the changed columns
#[must_use]
pub fn merge_nps_snapshot(peak: &mut Peak, snapshot: &NpsPlaceSnapshot) -> Vec<&'static str> {
    let mut columns = vec![
        "external_source",
        "external_id",
        "external_country",
        "external_range",
        "external_elevation_m",
        "external_retrieved_at",
        "external_payload",
    ];

    peak.external_source = Some(snapshot.source.clone());
    peak.external_id = snapshot.external_id.clone();
    // NPS only covers US places
    peak.external_country = Some("USA".to_owned());
    peak.external_range = snapshot
        .designation
        .clone()
        .or_else(|| snapshot.states.clone());
    peak.external_elevation_m = None;
    peak.external_retrieved_at = Some(snapshot.retrieved_at);
    peak.external_payload = Some(snapshot.raw.clone());

    if peak.region.is_none() {
        if let Some(states) = &snapshot.states {
            peak.region = Some(states.clone());
            columns.push("region");
        }
    }
    if peak.description.is_none() {
        if let Some(description) = &snapshot.description {
            peak.description = Some(description.clone());
            columns.push("description");
        }
    }
    if peak.lat.is_none() {
        if let Some(lat) = snapshot.lat {
            peak.lat = Some(lat);
            columns.push("lat");
        }
    }
    if peak.lon.is_none() {
        if let Some(lon) = snapshot.lon {
            peak.lon = Some(lon);
            columns.push("lon");
        }
    }

    columns
}

/// Merge and persist an OSM snapshot
///
/// # Errors
///
/// Returns an error if the database write fails
pub async fn apply_osm_snapshot(
    peaks: &PeaksManager,
    peak: &mut Peak,
    snapshot: &OsmPeakSnapshot,
) -> AppResult<()> {
    let columns = merge_osm_snapshot(peak, snapshot);
    peaks.persist_columns(peak, &columns).await
}

/// Merge and persist an NPS snapshot
///
/// # Errors
///
/// Returns an error if the database write fails
pub async fn apply_nps_snapshot(
    peaks: &PeaksManager,
    peak: &mut Peak,
    snapshot: &NpsPlaceSnapshot,
) -> AppResult<()> {
    let columns = merge_nps_snapshot(peak, snapshot);
    peaks.persist_columns(peak, &columns).await
}
