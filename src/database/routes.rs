// ABOUTME: Database operations for climbing routes
// ABOUTME: CRUD with per-peak name uniqueness and peak filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{map_write_error, parse_datetime, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{CreateRouteRequest, Route, UpdateRouteRequest};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Database operations for routes
#[derive(Clone)]
pub struct RoutesManager {
    pool: SqlitePool,
}

impl RoutesManager {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new route on a peak
    ///
    /// # Errors
    ///
    /// `NotFound` when the peak does not exist; conflict when the route
    /// name is taken on that peak.
    pub async fn create(&self, request: &CreateRouteRequest) -> AppResult<Route> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("Route name is required"));
        }

        let peak_exists = sqlx::query("SELECT id FROM peaks WHERE id = $1")
            .bind(request.peak_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check peak: {e}")))?
            .is_some();
        if !peak_exists {
            return Err(AppError::not_found("Peak"));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO routes (id, peak_id, name, distance_km, vert_gain_m, grade, season,
                                notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ",
        )
        .bind(id.to_string())
        .bind(request.peak_id.to_string())
        .bind(name)
        .bind(request.distance_km)
        .bind(request.vert_gain_m)
        .bind(&request.grade)
        .bind(&request.season)
        .bind(&request.notes)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("Route", &e))?;

        Ok(Route {
            id,
            peak_id: request.peak_id,
            name: name.to_owned(),
            distance_km: request.distance_km,
            vert_gain_m: request.vert_gain_m,
            grade: request.grade.clone(),
            season: request.season.clone(),
            notes: request.notes.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a route by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<Route>> {
        let row = sqlx::query(
            r"
            SELECT id, peak_id, name, distance_km, vert_gain_m, grade, season, notes,
                   created_at, updated_at
            FROM routes WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get route: {e}")))?;

        row.map(|r| row_to_route(&r)).transpose()
    }

    /// List routes, optionally scoped to one peak
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self, peak_id: Option<Uuid>) -> AppResult<Vec<Route>> {
        let rows = sqlx::query(
            r"
            SELECT id, peak_id, name, distance_km, vert_gain_m, grade, season, notes,
                   created_at, updated_at
            FROM routes
            WHERE ($1 IS NULL OR peak_id = $1)
            ORDER BY name
            ",
        )
        .bind(peak_id.map(|id| id.to_string()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list routes: {e}")))?;

        rows.iter().map(row_to_route).collect()
    }

    /// Update a route
    ///
    /// # Errors
    ///
    /// `NotFound` when the route does not exist; conflict when renaming
    /// to a taken name on the same peak.
    pub async fn update(&self, id: Uuid, request: &UpdateRouteRequest) -> AppResult<Route> {
        let mut route = self
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Route"))?;

        if let Some(name) = &request.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::invalid_input("Route name cannot be empty"));
            }
            route.name = name.to_owned();
        }
        if let Some(distance_km) = request.distance_km {
            route.distance_km = Some(distance_km);
        }
        if let Some(vert_gain_m) = request.vert_gain_m {
            route.vert_gain_m = Some(vert_gain_m);
        }
        if let Some(grade) = &request.grade {
            route.grade = Some(grade.clone());
        }
        if let Some(season) = &request.season {
            route.season = Some(season.clone());
        }
        if let Some(notes) = &request.notes {
            route.notes = Some(notes.clone());
        }
        route.updated_at = Utc::now();

        sqlx::query(
            r"
            UPDATE routes
            SET name = $2, distance_km = $3, vert_gain_m = $4, grade = $5, season = $6,
                notes = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .bind(&route.name)
        .bind(route.distance_km)
        .bind(route.vert_gain_m)
        .bind(&route.grade)
        .bind(&route.season)
        .bind(&route.notes)
        .bind(route.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("Route", &e))?;

        Ok(route)
    }

    /// Delete a route
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete route: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_route(row: &SqliteRow) -> AppResult<Route> {
    let id_str: String = row.get("id");
    let peak_id_str: String = row.get("peak_id");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Ok(Route {
        id: parse_uuid(&id_str)?,
        peak_id: parse_uuid(&peak_id_str)?,
        name: row.get("name"),
        distance_km: row.get("distance_km"),
        vert_gain_m: row.get("vert_gain_m"),
        grade: row.get("grade"),
        season: row.get("season"),
        notes: row.get("notes"),
        created_at: parse_datetime(&created_at_str)?,
        updated_at: parse_datetime(&updated_at_str)?,
    })
}
