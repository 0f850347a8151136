// ABOUTME: Naismith-style time estimate for a route
// ABOUTME: Separate paces for vertical gain and horizontal distance
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::models::Route;
use serde::Serialize;

/// Default ascent pace in vertical meters per hour
pub const DEFAULT_ASCENT_PACE_M_PER_HR: f64 = 335.0;
/// Default pace over flat ground in kilometers per hour
pub const DEFAULT_FLAT_PACE_KM_PER_HR: f64 = 4.0;

/// Route time estimate returned by the estimate endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RouteEstimate {
    pub route_id: uuid::Uuid,
    pub time_hours: f64,
    pub ascent_pace_m_per_hr: f64,
    pub flat_pace_km_per_hr: f64,
}

/// Naismith-style estimate: time for the vertical gain plus time for the
/// horizontal distance, each at its own pace. Missing route metrics
/// count as zero.
#[must_use]
pub fn estimate_time_hours(route: &Route, ascent_pace_m_per_hr: f64, flat_pace_km_per_hr: f64) -> f64 {
    let vert = route.vert_gain_m.unwrap_or(0.0).max(0.0);
    let distance = route.distance_km.unwrap_or(0.0).max(0.0);
    vert / ascent_pace_m_per_hr + distance / flat_pace_km_per_hr
}

/// Estimate with the default paces
#[must_use]
pub fn estimate_route(route: &Route) -> RouteEstimate {
    RouteEstimate {
        route_id: route.id,
        time_hours: estimate_time_hours(
            route,
            DEFAULT_ASCENT_PACE_M_PER_HR,
            DEFAULT_FLAT_PACE_KM_PER_HR,
        ),
        ascent_pace_m_per_hr: DEFAULT_ASCENT_PACE_M_PER_HR,
        flat_pace_km_per_hr: DEFAULT_FLAT_PACE_KM_PER_HR,
    }
}
