// ABOUTME: Core domain models for peaks, routes, trip plans and ascent logs
// ABOUTME: Includes request payload types and status vocabulary with serde support
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Data Models
//!
//! Domain models shared by the database managers and the HTTP layer.
//! All units are metric: elevations in meters, distances in kilometers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A mountain peak. User-editable fields sit alongside provenance fields
/// which are written only by external-snapshot application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Peak {
    pub id: Uuid,
    /// Display name, unique across peaks
    pub name: String,
    /// Free-form region or range label
    pub region: Option<String>,
    /// Summit elevation in meters
    pub elevation_m: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Overall difficulty grade (free-form, e.g. "class 3", "AD")
    pub grade: Option<String>,
    pub description: Option<String>,
    /// Which external provider last enriched this record ("osm", "nps")
    pub external_source: Option<String>,
    /// Provider-side identifier of the matched record
    pub external_id: Option<String>,
    pub external_country: Option<String>,
    pub external_range: Option<String>,
    /// Elevation as reported by the provider, kept separate from the
    /// user-visible `elevation_m`
    pub external_elevation_m: Option<f64>,
    pub external_retrieved_at: Option<DateTime<Utc>>,
    /// Raw provider payload, stored as a JSON blob for audit
    pub external_payload: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A climbing route up a peak
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub peak_id: Uuid,
    /// Route name, unique per peak
    pub name: String,
    pub distance_km: Option<f64>,
    pub vert_gain_m: Option<f64>,
    pub grade: Option<String>,
    /// Recommended season window (free-form)
    pub season: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle status of a trip plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Planned,
    InProgress,
    Ready,
    Completed,
    Canceled,
}

impl PlanStatus {
    /// Database representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    /// Parse from the database representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(Self::Planned),
            "in_progress" => Some(Self::InProgress),
            "ready" => Some(Self::Ready),
            "completed" => Some(Self::Completed),
            "canceled" => Some(Self::Canceled),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A planned trip on a specific route, owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub route_id: Uuid,
    pub start_date: chrono::NaiveDate,
    pub end_date: Option<chrono::NaiveDate>,
    pub team_size: i64,
    pub status: PlanStatus,
    /// What the team wants out of the trip
    pub objectives: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Record of an ascent attempt, attached to a trip plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AscentLog {
    pub id: Uuid,
    pub plan_id: Uuid,
    /// Free-form outcome ("summited", "bailed", ...)
    pub outcome: String,
    pub time_hours: Option<f64>,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Minimal owner identity for plans and ascents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    /// SHA-256 hash of the bearer token, hex-encoded. Never serialized out.
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

// --- Request payloads ---

/// Request payload for creating a peak
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePeakRequest {
    pub name: String,
    pub region: Option<String>,
    pub elevation_m: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub grade: Option<String>,
    pub description: Option<String>,
}

/// Request payload for updating a peak. Provenance fields are not
/// updatable through the public API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePeakRequest {
    pub name: Option<String>,
    pub region: Option<String>,
    pub elevation_m: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub grade: Option<String>,
    pub description: Option<String>,
}

/// Request payload for creating a route
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRouteRequest {
    pub peak_id: Uuid,
    pub name: String,
    pub distance_km: Option<f64>,
    pub vert_gain_m: Option<f64>,
    pub grade: Option<String>,
    pub season: Option<String>,
    pub notes: Option<String>,
}

/// Request payload for updating a route
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRouteRequest {
    pub name: Option<String>,
    pub distance_km: Option<f64>,
    pub vert_gain_m: Option<f64>,
    pub grade: Option<String>,
    pub season: Option<String>,
    pub notes: Option<String>,
}

/// Request payload for creating a trip plan
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanRequest {
    pub route_id: Uuid,
    pub start_date: chrono::NaiveDate,
    pub end_date: Option<chrono::NaiveDate>,
    pub team_size: Option<i64>,
    pub status: Option<PlanStatus>,
    pub objectives: Option<String>,
    pub notes: Option<String>,
}

/// Request payload for updating a trip plan
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlanRequest {
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub team_size: Option<i64>,
    pub status: Option<PlanStatus>,
    pub objectives: Option<String>,
    pub notes: Option<String>,
}

/// Request payload for recording an ascent
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAscentRequest {
    pub plan_id: Uuid,
    pub outcome: String,
    pub time_hours: Option<f64>,
    pub notes: Option<String>,
}

/// Request payload for updating an ascent log
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAscentRequest {
    pub outcome: Option<String>,
    pub time_hours: Option<f64>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_status_round_trip() {
        for status in [
            PlanStatus::Planned,
            PlanStatus::InProgress,
            PlanStatus::Ready,
            PlanStatus::Completed,
            PlanStatus::Canceled,
        ] {
            assert_eq!(PlanStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_plan_status_rejects_unknown() {
        assert_eq!(PlanStatus::parse("summited"), None);
        assert_eq!(PlanStatus::parse(""), None);
    }
}
