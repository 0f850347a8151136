// ABOUTME: Database operations for trip plans with owner scoping
// ABOUTME: Every query is constrained to the owning user
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{map_write_error, parse_datetime, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{CreatePlanRequest, PlanStatus, TripPlan, UpdatePlanRequest};
use chrono::{NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Database operations for trip plans
#[derive(Clone)]
pub struct PlansManager {
    pool: SqlitePool,
}

impl PlansManager {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a trip plan owned by a user
    ///
    /// # Errors
    ///
    /// `NotFound` when the route does not exist; invalid-input when the
    /// date window is inverted.
    pub async fn create(&self, user_id: Uuid, request: &CreatePlanRequest) -> AppResult<TripPlan> {
        if let Some(end_date) = request.end_date {
            if end_date < request.start_date {
                return Err(AppError::invalid_input(
                    "end_date cannot be before start_date",
                ));
            }
        }

        let route_exists = sqlx::query("SELECT id FROM routes WHERE id = $1")
            .bind(request.route_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check route: {e}")))?
            .is_some();
        if !route_exists {
            return Err(AppError::not_found("Route"));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let team_size = request.team_size.unwrap_or(1).max(1);
        let status = request.status.unwrap_or(PlanStatus::Planned);

        sqlx::query(
            r"
            INSERT INTO trip_plans (id, user_id, route_id, start_date, end_date, team_size,
                                    status, objectives, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(request.route_id.to_string())
        .bind(request.start_date.to_string())
        .bind(request.end_date.map(|d| d.to_string()))
        .bind(team_size)
        .bind(status.as_str())
        .bind(&request.objectives)
        .bind(&request.notes)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("TripPlan", &e))?;

        Ok(TripPlan {
            id,
            user_id,
            route_id: request.route_id,
            start_date: request.start_date,
            end_date: request.end_date,
            team_size,
            status,
            objectives: request.objectives.clone(),
            notes: request.notes.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a plan by ID for a specific owner
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<TripPlan>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, route_id, start_date, end_date, team_size, status,
                   objectives, notes, created_at, updated_at
            FROM trip_plans WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get plan: {e}")))?;

        row.map(|r| row_to_plan(&r)).transpose()
    }

    /// List plans for an owner with optional status and route filters
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(
        &self,
        user_id: Uuid,
        status: Option<PlanStatus>,
        route_id: Option<Uuid>,
    ) -> AppResult<Vec<TripPlan>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, route_id, start_date, end_date, team_size, status,
                   objectives, notes, created_at, updated_at
            FROM trip_plans
            WHERE user_id = $1
              AND ($2 IS NULL OR status = $2)
              AND ($3 IS NULL OR route_id = $3)
            ORDER BY start_date
            ",
        )
        .bind(user_id.to_string())
        .bind(status.map(PlanStatus::as_str))
        .bind(route_id.map(|id| id.to_string()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list plans: {e}")))?;

        rows.iter().map(row_to_plan).collect()
    }

    /// Update a plan owned by a user
    ///
    /// # Errors
    ///
    /// `NotFound` when the plan does not exist or belongs to another user
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: &UpdatePlanRequest,
    ) -> AppResult<TripPlan> {
        let mut plan = self
            .get(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("TripPlan"))?;

        if let Some(start_date) = request.start_date {
            plan.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            plan.end_date = Some(end_date);
        }
        if let Some(end_date) = plan.end_date {
            if end_date < plan.start_date {
                return Err(AppError::invalid_input(
                    "end_date cannot be before start_date",
                ));
            }
        }
        if let Some(team_size) = request.team_size {
            plan.team_size = team_size.max(1);
        }
        if let Some(status) = request.status {
            plan.status = status;
        }
        if let Some(objectives) = &request.objectives {
            plan.objectives = Some(objectives.clone());
        }
        if let Some(notes) = &request.notes {
            plan.notes = Some(notes.clone());
        }
        plan.updated_at = Utc::now();

        sqlx::query(
            r"
            UPDATE trip_plans
            SET start_date = $3, end_date = $4, team_size = $5, status = $6,
                objectives = $7, notes = $8, updated_at = $9
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(plan.start_date.to_string())
        .bind(plan.end_date.map(|d| d.to_string()))
        .bind(plan.team_size)
        .bind(plan.status.as_str())
        .bind(&plan.objectives)
        .bind(&plan.notes)
        .bind(plan.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("TripPlan", &e))?;

        Ok(plan)
    }

    /// Delete a plan owned by a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM trip_plans WHERE id = $1 AND user_id = $2")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete plan: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    value
        .parse()
        .map_err(|e| AppError::internal(format!("Invalid date: {e}")))
}

fn row_to_plan(row: &SqliteRow) -> AppResult<TripPlan> {
    let id_str: String = row.get("id");
    let user_id_str: String = row.get("user_id");
    let route_id_str: String = row.get("route_id");
    let start_date_str: String = row.get("start_date");
    let end_date_str: Option<String> = row.get("end_date");
    let status_str: String = row.get("status");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Ok(TripPlan {
        id: parse_uuid(&id_str)?,
        user_id: parse_uuid(&user_id_str)?,
        route_id: parse_uuid(&route_id_str)?,
        start_date: parse_date(&start_date_str)?,
        end_date: end_date_str.as_deref().map(parse_date).transpose()?,
        team_size: row.get("team_size"),
        status: PlanStatus::parse(&status_str)
            .ok_or_else(|| AppError::internal(format!("Invalid plan status: {status_str}")))?,
        objectives: row.get("objectives"),
        notes: row.get("notes"),
        created_at: parse_datetime(&created_at_str)?,
        updated_at: parse_datetime(&updated_at_str)?,
    })
}
