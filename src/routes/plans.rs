// ABOUTME: Route handlers for trip plans and ascent logs
// ABOUTME: Every endpoint requires a bearer token and is scoped to its owner
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trip plan and ascent log routes
//!
//! Unlike the public catalog, these resources belong to a user. Every
//! handler authenticates first and passes the owner's id into the
//! database layer, so cross-user ids behave as not-found.

use crate::auth;
use crate::context::ServerResources;
use crate::errors::{AppError, AppResult};
use crate::models::{
    CreateAscentRequest, CreatePlanRequest, PlanStatus, UpdateAscentRequest, UpdatePlanRequest,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use http::HeaderMap;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct ListPlansQuery {
    status: Option<String>,
    route_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct ListAscentsQuery {
    plan_id: Option<Uuid>,
}

/// Trip plan and ascent log endpoints
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create all plan and ascent routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/plans", get(Self::handle_list_plans))
            .route("/api/plans", post(Self::handle_create_plan))
            .route("/api/plans/:id", get(Self::handle_get_plan))
            .route("/api/plans/:id", put(Self::handle_update_plan))
            .route("/api/plans/:id", delete(Self::handle_delete_plan))
            .route("/api/ascents", get(Self::handle_list_ascents))
            .route("/api/ascents", post(Self::handle_create_ascent))
            .route("/api/ascents/:id", get(Self::handle_get_ascent))
            .route("/api/ascents/:id", put(Self::handle_update_ascent))
            .route("/api/ascents/:id", delete(Self::handle_delete_ascent))
            .with_state(resources)
    }

    fn parse_status(value: Option<&str>) -> AppResult<Option<PlanStatus>> {
        value
            .map(|s| {
                PlanStatus::parse(s)
                    .ok_or_else(|| AppError::invalid_input(format!("Unknown plan status: {s}")))
            })
            .transpose()
    }

    /// Handle GET /api/plans
    async fn handle_list_plans(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListPlansQuery>,
    ) -> Result<Response, AppError> {
        let user = auth::authenticate(&resources.database, &headers).await?;
        let status = Self::parse_status(query.status.as_deref())?;
        let plans = resources
            .database
            .plans()
            .list(user.id, status, query.route_id)
            .await?;
        Ok(Json(json!({ "plans": plans })).into_response())
    }

    /// Handle POST /api/plans
    async fn handle_create_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreatePlanRequest>,
    ) -> Result<Response, AppError> {
        let user = auth::authenticate(&resources.database, &headers).await?;
        let plan = resources.database.plans().create(user.id, &request).await?;
        Ok((StatusCode::CREATED, Json(plan)).into_response())
    }

    /// Handle GET /api/plans/:id
    async fn handle_get_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user = auth::authenticate(&resources.database, &headers).await?;
        let plan = resources
            .database
            .plans()
            .get(id, user.id)
            .await?
            .ok_or_else(|| AppError::not_found("TripPlan"))?;
        Ok(Json(plan).into_response())
    }

    /// Handle PUT /api/plans/:id
    async fn handle_update_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(request): Json<UpdatePlanRequest>,
    ) -> Result<Response, AppError> {
        let user = auth::authenticate(&resources.database, &headers).await?;
        let plan = resources
            .database
            .plans()
            .update(id, user.id, &request)
            .await?;
        Ok(Json(plan).into_response())
    }

    /// Handle DELETE /api/plans/:id
    async fn handle_delete_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user = auth::authenticate(&resources.database, &headers).await?;
        if resources.database.plans().delete(id, user.id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found("TripPlan"))
        }
    }

    /// Handle GET /api/ascents
    async fn handle_list_ascents(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListAscentsQuery>,
    ) -> Result<Response, AppError> {
        let user = auth::authenticate(&resources.database, &headers).await?;
        let ascents = resources
            .database
            .ascents()
            .list(user.id, query.plan_id)
            .await?;
        Ok(Json(json!({ "ascents": ascents })).into_response())
    }

    /// Handle POST /api/ascents
    async fn handle_create_ascent(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateAscentRequest>,
    ) -> Result<Response, AppError> {
        let user = auth::authenticate(&resources.database, &headers).await?;
        let log = resources
            .database
            .ascents()
            .create(user.id, &request)
            .await?;
        Ok((StatusCode::CREATED, Json(log)).into_response())
    }

    /// Handle GET /api/ascents/:id
    async fn handle_get_ascent(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user = auth::authenticate(&resources.database, &headers).await?;
        let log = resources
            .database
            .ascents()
            .get(id, user.id)
            .await?
            .ok_or_else(|| AppError::not_found("AscentLog"))?;
        Ok(Json(log).into_response())
    }

    /// Handle PUT /api/ascents/:id
    async fn handle_update_ascent(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(request): Json<UpdateAscentRequest>,
    ) -> Result<Response, AppError> {
        let user = auth::authenticate(&resources.database, &headers).await?;
        let log = resources
            .database
            .ascents()
            .update(id, user.id, &request)
            .await?;
        Ok(Json(log).into_response())
    }

    /// Handle DELETE /api/ascents/:id
    async fn handle_delete_ascent(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user = auth::authenticate(&resources.database, &headers).await?;
        if resources.database.ascents().delete(id, user.id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found("AscentLog"))
        }
    }
}
