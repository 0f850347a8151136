// ABOUTME: Database operations for peak records
// ABOUTME: CRUD plus targeted column persistence used by snapshot application
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{map_write_error, parse_datetime, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{CreatePeakRequest, Peak, UpdatePeakRequest};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

const PEAK_COLUMNS: &str = "id, name, region, elevation_m, lat, lon, grade, description, \
     external_source, external_id, external_country, external_range, external_elevation_m, \
     external_retrieved_at, external_payload, created_at, updated_at";

/// Database operations for peaks
#[derive(Clone)]
pub struct PeaksManager {
    pool: SqlitePool,
}

impl PeaksManager {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new peak
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the name is taken, or a database
    /// error on other failures.
    pub async fn create(&self, request: &CreatePeakRequest) -> AppResult<Peak> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("Peak name is required"));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO peaks (id, name, region, elevation_m, lat, lon, grade, description,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ",
        )
        .bind(id.to_string())
        .bind(name)
        .bind(&request.region)
        .bind(request.elevation_m)
        .bind(request.lat)
        .bind(request.lon)
        .bind(&request.grade)
        .bind(&request.description)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("Peak", &e))?;

        Ok(Peak {
            id,
            name: name.to_owned(),
            region: request.region.clone(),
            elevation_m: request.elevation_m,
            lat: request.lat,
            lon: request.lon,
            grade: request.grade.clone(),
            description: request.description.clone(),
            external_source: None,
            external_id: None,
            external_country: None,
            external_range: None,
            external_elevation_m: None,
            external_retrieved_at: None,
            external_payload: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a peak by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<Peak>> {
        let row = sqlx::query(&format!("SELECT {PEAK_COLUMNS} FROM peaks WHERE id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get peak: {e}")))?;

        row.map(|r| row_to_peak(&r)).transpose()
    }

    /// List peaks with optional name-search, region and grade filters
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(
        &self,
        search: Option<&str>,
        region: Option<&str>,
        grade: Option<&str>,
    ) -> AppResult<Vec<Peak>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {PEAK_COLUMNS} FROM peaks
            WHERE ($1 IS NULL OR name LIKE '%' || $1 || '%')
              AND ($2 IS NULL OR region = $2)
              AND ($3 IS NULL OR grade = $3)
            ORDER BY name
            "
        ))
        .bind(search)
        .bind(region)
        .bind(grade)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list peaks: {e}")))?;

        rows.iter().map(row_to_peak).collect()
    }

    /// Update user-editable fields of a peak. Provenance fields are only
    /// written through [`Self::persist_columns`].
    ///
    /// # Errors
    ///
    /// `NotFound` when the peak does not exist; conflict when renaming to
    /// a taken name.
    pub async fn update(&self, id: Uuid, request: &UpdatePeakRequest) -> AppResult<Peak> {
        let mut peak = self
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Peak"))?;

        if let Some(name) = &request.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::invalid_input("Peak name cannot be empty"));
            }
            peak.name = name.to_owned();
        }
        if let Some(region) = &request.region {
            peak.region = Some(region.clone());
        }
        if let Some(elevation_m) = request.elevation_m {
            peak.elevation_m = Some(elevation_m);
        }
        if let Some(lat) = request.lat {
            peak.lat = Some(lat);
        }
        if let Some(lon) = request.lon {
            peak.lon = Some(lon);
        }
        if let Some(grade) = &request.grade {
            peak.grade = Some(grade.clone());
        }
        if let Some(description) = &request.description {
            peak.description = Some(description.clone());
        }
        peak.updated_at = Utc::now();

        sqlx::query(
            r"
            UPDATE peaks
            SET name = $2, region = $3, elevation_m = $4, lat = $5, lon = $6,
                grade = $7, description = $8, updated_at = $9
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .bind(&peak.name)
        .bind(&peak.region)
        .bind(peak.elevation_m)
        .bind(peak.lat)
        .bind(peak.lon)
        .bind(&peak.grade)
        .bind(&peak.description)
        .bind(peak.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("Peak", &e))?;

        Ok(peak)
    }

    /// Delete a peak
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM peaks WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete peak: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist only the named columns of a peak. Used by snapshot
    /// application so untouched columns are never rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error on unknown column names or database failure.
    pub async fn persist_columns(&self, peak: &Peak, columns: &[&str]) -> AppResult<()> {
        if columns.is_empty() {
            return Ok(());
        }

        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{col} = ${}", i + 2))
            .collect();
        let sql = format!(
            "UPDATE peaks SET {}, updated_at = ${} WHERE id = $1",
            assignments.join(", "),
            columns.len() + 2
        );

        let mut query = sqlx::query(&sql).bind(peak.id.to_string());
        for column in columns {
            query = match *column {
                "region" => query.bind(&peak.region),
                "elevation_m" => query.bind(peak.elevation_m),
                "lat" => query.bind(peak.lat),
                "lon" => query.bind(peak.lon),
                "description" => query.bind(&peak.description),
                "external_source" => query.bind(&peak.external_source),
                "external_id" => query.bind(&peak.external_id),
                "external_country" => query.bind(&peak.external_country),
                "external_range" => query.bind(&peak.external_range),
                "external_elevation_m" => query.bind(peak.external_elevation_m),
                "external_retrieved_at" => {
                    query.bind(peak.external_retrieved_at.map(|dt| dt.to_rfc3339()))
                }
                "external_payload" => query.bind(
                    peak.external_payload
                        .as_ref()
                        .map(std::string::ToString::to_string),
                ),
                other => {
                    return Err(AppError::internal(format!(
                        "Unknown peak column: {other}"
                    )))
                }
            };
        }
        query = query.bind(Utc::now().to_rfc3339());

        query
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to persist peak columns: {e}")))?;
        Ok(())
    }
}

fn row_to_peak(row: &SqliteRow) -> AppResult<Peak> {
    let id_str: String = row.get("id");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");
    let retrieved_at_str: Option<String> = row.get("external_retrieved_at");
    let payload_json: Option<String> = row.get("external_payload");

    Ok(Peak {
        id: parse_uuid(&id_str)?,
        name: row.get("name"),
        region: row.get("region"),
        elevation_m: row.get("elevation_m"),
        lat: row.get("lat"),
        lon: row.get("lon"),
        grade: row.get("grade"),
        description: row.get("description"),
        external_source: row.get("external_source"),
        external_id: row.get("external_id"),
        external_country: row.get("external_country"),
        external_range: row.get("external_range"),
        external_elevation_m: row.get("external_elevation_m"),
        external_retrieved_at: retrieved_at_str
            .as_deref()
            .map(parse_datetime)
            .transpose()?,
        external_payload: payload_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?,
        created_at: parse_datetime(&created_at_str)?,
        updated_at: parse_datetime(&updated_at_str)?,
    })
}
