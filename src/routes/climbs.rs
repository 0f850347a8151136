// ABOUTME: Route handlers for climbing routes on peaks
// ABOUTME: CRUD plus a Naismith-style time estimate endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::{CreateRouteRequest, UpdateRouteRequest};
use crate::services::estimate;
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
struct ListRoutesQuery {
    peak_id: Option<Uuid>,
}

/// Climbing route endpoints
pub struct ClimbRoutes;

impl ClimbRoutes {
    /// Create all climbing route routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/routes", get(Self::handle_list))
            .route("/api/routes", post(Self::handle_create))
            .route("/api/routes/:id", get(Self::handle_get))
            .route("/api/routes/:id", put(Self::handle_update))
            .route("/api/routes/:id", delete(Self::handle_delete))
            .route("/api/routes/:id/estimate", get(Self::handle_estimate))
            .with_state(resources)
    }

    /// Handle GET /api/routes
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListRoutesQuery>,
    ) -> Result<Response, AppError> {
        let routes = resources.database.routes().list(query.peak_id).await?;
        Ok(Json(json!({ "routes": routes })).into_response())
    }

    /// Handle POST /api/routes
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<CreateRouteRequest>,
    ) -> Result<Response, AppError> {
        let route = resources.database.routes().create(&request).await?;
        Ok((StatusCode::CREATED, Json(route)).into_response())
    }

    /// Handle GET /api/routes/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let route = resources
            .database
            .routes()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Route"))?;
        Ok(Json(route).into_response())
    }

    /// Handle PUT /api/routes/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        Json(request): Json<UpdateRouteRequest>,
    ) -> Result<Response, AppError> {
        let route = resources.database.routes().update(id, &request).await?;
        Ok(Json(route).into_response())
    }

    /// Handle DELETE /api/routes/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        if resources.database.routes().delete(id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found("Route"))
        }
    }

    /// Handle GET /api/routes/:id/estimate
    async fn handle_estimate(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let route = resources
            .database
            .routes()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Route"))?;
        Ok(Json(estimate::estimate_route(&route)).into_response())
    }
}
