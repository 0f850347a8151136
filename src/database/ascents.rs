// ABOUTME: Database operations for ascent logs
// ABOUTME: Ownership is enforced through the plan the log belongs to
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{map_write_error, parse_datetime, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{AscentLog, CreateAscentRequest, UpdateAscentRequest};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Database operations for ascent logs
#[derive(Clone)]
pub struct AscentsManager {
    pool: SqlitePool,
}

impl AscentsManager {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an ascent on a plan the user owns
    ///
    /// # Errors
    ///
    /// `NotFound` when the plan does not exist or belongs to another user
    pub async fn create(&self, user_id: Uuid, request: &CreateAscentRequest) -> AppResult<AscentLog> {
        let outcome = request.outcome.trim();
        if outcome.is_empty() {
            return Err(AppError::invalid_input("Ascent outcome is required"));
        }

        let plan_owned = sqlx::query("SELECT id FROM trip_plans WHERE id = $1 AND user_id = $2")
            .bind(request.plan_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check plan: {e}")))?
            .is_some();
        if !plan_owned {
            return Err(AppError::not_found("TripPlan"));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO ascent_logs (id, plan_id, outcome, time_hours, notes, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(id.to_string())
        .bind(request.plan_id.to_string())
        .bind(outcome)
        .bind(request.time_hours)
        .bind(&request.notes)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("AscentLog", &e))?;

        Ok(AscentLog {
            id,
            plan_id: request.plan_id,
            outcome: outcome.to_owned(),
            time_hours: request.time_hours,
            notes: request.notes.clone(),
            recorded_at: now,
        })
    }

    /// Get an ascent log scoped through plan ownership
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<AscentLog>> {
        let row = sqlx::query(
            r"
            SELECT a.id, a.plan_id, a.outcome, a.time_hours, a.notes, a.recorded_at
            FROM ascent_logs a
            JOIN trip_plans p ON p.id = a.plan_id
            WHERE a.id = $1 AND p.user_id = $2
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ascent log: {e}")))?;

        row.map(|r| row_to_ascent(&r)).transpose()
    }

    /// List ascent logs for a user, optionally scoped to one plan
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self, user_id: Uuid, plan_id: Option<Uuid>) -> AppResult<Vec<AscentLog>> {
        let rows = sqlx::query(
            r"
            SELECT a.id, a.plan_id, a.outcome, a.time_hours, a.notes, a.recorded_at
            FROM ascent_logs a
            JOIN trip_plans p ON p.id = a.plan_id
            WHERE p.user_id = $1
              AND ($2 IS NULL OR a.plan_id = $2)
            ORDER BY a.recorded_at DESC
            ",
        )
        .bind(user_id.to_string())
        .bind(plan_id.map(|id| id.to_string()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ascent logs: {e}")))?;

        rows.iter().map(row_to_ascent).collect()
    }

    /// Update an ascent log scoped through plan ownership
    ///
    /// # Errors
    ///
    /// `NotFound` when the log does not exist or is not owned by the user
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: &UpdateAscentRequest,
    ) -> AppResult<AscentLog> {
        let mut log = self
            .get(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("AscentLog"))?;

        if let Some(outcome) = &request.outcome {
            let outcome = outcome.trim();
            if outcome.is_empty() {
                return Err(AppError::invalid_input("Ascent outcome cannot be empty"));
            }
            log.outcome = outcome.to_owned();
        }
        if let Some(time_hours) = request.time_hours {
            log.time_hours = Some(time_hours);
        }
        if let Some(notes) = &request.notes {
            log.notes = Some(notes.clone());
        }

        sqlx::query(
            r"
            UPDATE ascent_logs SET outcome = $2, time_hours = $3, notes = $4 WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .bind(&log.outcome)
        .bind(log.time_hours)
        .bind(&log.notes)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("AscentLog", &e))?;

        Ok(log)
    }

    /// Delete an ascent log scoped through plan ownership
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM ascent_logs
            WHERE id = $1
              AND plan_id IN (SELECT id FROM trip_plans WHERE user_id = $2)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete ascent log: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_ascent(row: &SqliteRow) -> AppResult<AscentLog> {
    let id_str: String = row.get("id");
    let plan_id_str: String = row.get("plan_id");
    let recorded_at_str: String = row.get("recorded_at");

    Ok(AscentLog {
        id: parse_uuid(&id_str)?,
        plan_id: parse_uuid(&plan_id_str)?,
        outcome: row.get("outcome"),
        time_hours: row.get("time_hours"),
        notes: row.get("notes"),
        recorded_at: parse_datetime(&recorded_at_str)?,
    })
}
