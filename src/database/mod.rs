// ABOUTME: Database management over a SQLite pool with startup migrations
// ABOUTME: Exposes per-domain manager structs for peaks, routes, plans and ascents
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Database Management
//!
//! SQLite persistence for the planning domain. UUIDs and timestamps are
//! stored as TEXT (RFC 3339 for datetimes); external payloads as JSON
//! TEXT blobs. Migrations are simple `CREATE TABLE IF NOT EXISTS`
//! statements run at startup.

mod ascents;
mod peaks;
mod plans;
mod routes;
mod users;

pub use ascents::AscentsManager;
pub use peaks::PeaksManager;
pub use plans::PlansManager;
pub use routes::RoutesManager;
pub use users::UsersManager;

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

pub(crate) fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))
}

pub(crate) fn parse_datetime(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))
}

/// Map a sqlx error, turning UNIQUE violations into a conflict error
pub(crate) fn map_write_error(resource: &str, error: &sqlx::Error) -> AppError {
    let message = error.to_string();
    if message.contains("UNIQUE constraint failed") {
        AppError::already_exists(resource)
    } else {
        AppError::database(format!("Failed to write {resource}: {message}"))
    }
}

/// Database handle wrapping the connection pool
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open a database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or migrations fail.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // In-memory SQLite gives every pooled connection its own database,
        // so those pools must be capped at a single connection.
        let is_memory = database_url.contains(":memory:");
        let connection_options = if database_url.starts_with("sqlite:") && !is_memory {
            // Create the database file if it doesn't exist
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let max_connections = if is_memory { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Peaks manager
    #[must_use]
    pub fn peaks(&self) -> PeaksManager {
        PeaksManager::new(self.pool.clone())
    }

    /// Routes manager
    #[must_use]
    pub fn routes(&self) -> RoutesManager {
        RoutesManager::new(self.pool.clone())
    }

    /// Trip plans manager
    #[must_use]
    pub fn plans(&self) -> PlansManager {
        PlansManager::new(self.pool.clone())
    }

    /// Ascent logs manager
    #[must_use]
    pub fn ascents(&self) -> AscentsManager {
        AscentsManager::new(self.pool.clone())
    }

    /// Users manager
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                display_name TEXT,
                token_hash TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS peaks (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                region TEXT,
                elevation_m REAL,
                lat REAL,
                lon REAL,
                grade TEXT,
                description TEXT,
                external_source TEXT,
                external_id TEXT,
                external_country TEXT,
                external_range TEXT,
                external_elevation_m REAL,
                external_retrieved_at TEXT,
                external_payload TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS routes (
                id TEXT PRIMARY KEY,
                peak_id TEXT NOT NULL REFERENCES peaks(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                distance_km REAL,
                vert_gain_m REAL,
                grade TEXT,
                season TEXT,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(peak_id, name)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS trip_plans (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                route_id TEXT NOT NULL REFERENCES routes(id) ON DELETE CASCADE,
                start_date TEXT NOT NULL,
                end_date TEXT,
                team_size INTEGER NOT NULL DEFAULT 1,
                status TEXT NOT NULL DEFAULT 'planned',
                objectives TEXT,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS ascent_logs (
                id TEXT PRIMARY KEY,
                plan_id TEXT NOT NULL REFERENCES trip_plans(id) ON DELETE CASCADE,
                outcome TEXT NOT NULL,
                time_hours REAL,
                notes TEXT,
                recorded_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_routes_peak_id ON routes(peak_id)",
            "CREATE INDEX IF NOT EXISTS idx_trip_plans_user_id ON trip_plans(user_id)",
            "CREATE INDEX IF NOT EXISTS idx_trip_plans_route_id ON trip_plans(route_id)",
            "CREATE INDEX IF NOT EXISTS idx_ascent_logs_plan_id ON ascent_logs(plan_id)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        Ok(())
    }
}
