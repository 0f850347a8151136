// ABOUTME: Standalone forecast endpoint for arbitrary coordinates
// ABOUTME: Thin wrapper over the Open-Meteo provider client
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::context::ServerResources;
use crate::errors::AppError;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct ForecastQuery {
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Forecast endpoint implementation
pub struct ForecastRoutes;

impl ForecastRoutes {
    /// Create the forecast route
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/forecast", get(Self::handle_forecast))
            .with_state(resources)
    }

    /// Handle GET /api/forecast?lat=&lon=
    async fn handle_forecast(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ForecastQuery>,
    ) -> Result<Response, AppError> {
        let (lat, lon) = match (query.lat, query.lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(AppError::invalid_input(
                    "Query parameters 'lat' and 'lon' are required.",
                ))
            }
        };
        let forecast = resources.weather.fetch_forecast(lat, lon).await?;
        Ok(Json(forecast).into_response())
    }
}
