// ABOUTME: Database operations for users and bearer-token lookup
// ABOUTME: Tokens are stored as SHA-256 hashes, never in the clear
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{map_write_error, parse_datetime, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::User;
use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Database operations for users
#[derive(Clone)]
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Hash a bearer token for storage or lookup
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    /// Create a user with a bearer token; only the token hash is stored
    ///
    /// # Errors
    ///
    /// Conflict when the email or token is already registered.
    pub async fn create(
        &self,
        email: &str,
        display_name: Option<&str>,
        token: &str,
    ) -> AppResult<User> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::invalid_input("Email is required"));
        }
        if token.is_empty() {
            return Err(AppError::invalid_input("Token is required"));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let token_hash = Self::hash_token(token);

        sqlx::query(
            r"
            INSERT INTO users (id, email, display_name, token_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(id.to_string())
        .bind(email)
        .bind(display_name)
        .bind(&token_hash)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("User", &e))?;

        Ok(User {
            id,
            email: email.to_owned(),
            display_name: display_name.map(ToOwned::to_owned),
            token_hash,
            created_at: now,
        })
    }

    /// Look up a user by bearer token
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_by_token(&self, token: &str) -> AppResult<Option<User>> {
        let token_hash = Self::hash_token(token);
        let row = sqlx::query(
            "SELECT id, email, display_name, token_hash, created_at FROM users WHERE token_hash = $1",
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to look up user: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }
}

fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let id_str: String = row.get("id");
    let created_at_str: String = row.get("created_at");

    Ok(User {
        id: parse_uuid(&id_str)?,
        email: row.get("email"),
        display_name: row.get("display_name"),
        token_hash: row.get("token_hash"),
        created_at: parse_datetime(&created_at_str)?,
    })
}
