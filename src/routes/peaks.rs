// ABOUTME: Route handlers for the peak catalog and external enrichment actions
// ABOUTME: CRUD plus Overpass/NPS refresh, provider searches and per-peak forecasts
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Peak routes
//!
//! Catalog CRUD is public; enrichment sub-actions call out to the
//! external providers and apply returned snapshots with fill-empty-only
//! semantics.

use crate::constants::limits;
use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::{CreatePeakRequest, UpdatePeakRequest};
use crate::services::{aggregator, snapshot};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct ListPeaksQuery {
    search: Option<String>,
    region: Option<String>,
    grade: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OsmSearchQuery {
    q: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    radius_m: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct AggregateSearchQuery {
    q: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RefreshQuery {
    force: Option<bool>,
}

/// Peak routes implementation
pub struct PeakRoutes;

impl PeakRoutes {
    /// Create all peak routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/peaks", get(Self::handle_list))
            .route("/api/peaks", post(Self::handle_create))
            .route("/api/peaks/osm-search", get(Self::handle_osm_search))
            .route("/api/peaks/search", get(Self::handle_aggregate_search))
            .route("/api/peaks/:id", get(Self::handle_get))
            .route("/api/peaks/:id", put(Self::handle_update))
            .route("/api/peaks/:id", delete(Self::handle_delete))
            .route(
                "/api/peaks/:id/refresh-external",
                post(Self::handle_refresh_external),
            )
            .route("/api/peaks/:id/refresh-nps", post(Self::handle_refresh_nps))
            .route("/api/peaks/:id/forecast", get(Self::handle_forecast))
            .with_state(resources)
    }

    /// Handle GET /api/peaks
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListPeaksQuery>,
    ) -> Result<Response, AppError> {
        let peaks = resources
            .database
            .peaks()
            .list(
                query.search.as_deref(),
                query.region.as_deref(),
                query.grade.as_deref(),
            )
            .await?;
        Ok(Json(json!({ "peaks": peaks })).into_response())
    }

    /// Handle POST /api/peaks
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<CreatePeakRequest>,
    ) -> Result<Response, AppError> {
        let peak = resources.database.peaks().create(&request).await?;
        Ok((StatusCode::CREATED, Json(peak)).into_response())
    }

    /// Handle GET /api/peaks/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let peak = resources
            .database
            .peaks()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Peak"))?;
        Ok(Json(peak).into_response())
    }

    /// Handle PUT /api/peaks/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        Json(request): Json<UpdatePeakRequest>,
    ) -> Result<Response, AppError> {
        let peak = resources.database.peaks().update(id, &request).await?;
        Ok(Json(peak).into_response())
    }

    /// Handle DELETE /api/peaks/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        if resources.database.peaks().delete(id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found("Peak"))
        }
    }

    /// Handle POST /api/peaks/:id/refresh-external
    ///
    /// Fetches the best-match Overpass snapshot for the peak and applies
    /// it. `?force=true` bypasses the snapshot cache.
    async fn handle_refresh_external(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        Query(query): Query<RefreshQuery>,
    ) -> Result<Response, AppError> {
        let manager = resources.database.peaks();
        let mut peak = manager
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Peak"))?;

        let force = query.force.unwrap_or(false);
        let (snap, from_cache) = resources.overpass.snapshot_for_peak(&peak, force).await?;
        snapshot::apply_osm_snapshot(&manager, &mut peak, &snap).await?;

        Ok(Json(json!({
            "peak": peak,
            "snapshot": snap,
            "from_cache": from_cache,
        }))
        .into_response())
    }

    /// Handle POST /api/peaks/:id/refresh-nps
    async fn handle_refresh_nps(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        Query(query): Query<RefreshQuery>,
    ) -> Result<Response, AppError> {
        let manager = resources.database.peaks();
        let mut peak = manager
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Peak"))?;

        let force = query.force.unwrap_or(false);
        let (snap, from_cache) = resources.nps.snapshot_for_peak(&peak, force).await?;
        snapshot::apply_nps_snapshot(&manager, &mut peak, &snap).await?;

        Ok(Json(json!({
            "peak": peak,
            "snapshot": snap,
            "from_cache": from_cache,
        }))
        .into_response())
    }

    /// Handle GET /api/peaks/osm-search
    async fn handle_osm_search(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<OsmSearchQuery>,
    ) -> Result<Response, AppError> {
        let snapshots = resources
            .overpass
            .search_peaks(
                query.q.as_deref(),
                query.lat,
                query.lon,
                query.radius_m.unwrap_or(limits::DEFAULT_RADIUS_M),
                query.limit.unwrap_or(limits::DEFAULT_OVERPASS_LIMIT),
            )
            .await?;
        Ok(Json(json!({ "results": snapshots })).into_response())
    }

    /// Handle GET /api/peaks/search - aggregated Open Peaks + NPS search
    async fn handle_aggregate_search(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<AggregateSearchQuery>,
    ) -> Result<Response, AppError> {
        let q = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::invalid_input("Query parameter 'q' is required."))?;

        let (hits, from_cache) = aggregator::search_peaks_with_context(
            &resources.open_peaks,
            &resources.nps,
            q,
            query.limit.unwrap_or(limits::DEFAULT_OPEN_PEAKS_LIMIT),
            query.lat,
            query.lon,
        )
        .await?;

        Ok(Json(json!({
            "results": hits,
            "from_cache": from_cache,
        }))
        .into_response())
    }

    /// Handle GET /api/peaks/:id/forecast
    async fn handle_forecast(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let peak = resources
            .database
            .peaks()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Peak"))?;

        let (lat, lon) = match (peak.lat, peak.lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(AppError::invalid_input(
                    "Peak has no coordinates for a forecast",
                ))
            }
        };

        let forecast = resources.weather.fetch_forecast(lat, lon).await?;
        Ok(Json(forecast).into_response())
    }
}
