// ABOUTME: HTTP route modules and top-level router assembly
// ABOUTME: One router per domain, composed with tracing and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP routes organized by domain

/// Climbing route endpoints (`/api/routes`)
pub mod climbs;
/// Standalone forecast endpoint (`/api/forecast`)
pub mod forecast;
/// Health and readiness endpoints
pub mod health;
/// Peak catalog and enrichment endpoints (`/api/peaks`)
pub mod peaks;
/// Trip plan and ascent log endpoints (`/api/plans`, `/api/ascents`)
pub mod plans;

use crate::context::ServerResources;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full application router
#[must_use]
pub fn app_router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes())
        .merge(peaks::PeakRoutes::routes(resources.clone()))
        .merge(climbs::ClimbRoutes::routes(resources.clone()))
        .merge(plans::PlanRoutes::routes(resources.clone()))
        .merge(forecast::ForecastRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
