// ABOUTME: Bearer-token authentication backed by the users table
// ABOUTME: Thin collaborator that scopes plans and ascents to an owner
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use http::header::AUTHORIZATION;
use http::HeaderMap;

/// Extract the bearer token from request headers
fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(AppError::auth_required)?;
    let value = header
        .to_str()
        .map_err(|_| AppError::auth_invalid("Malformed Authorization header"))?;
    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::auth_invalid("Expected a bearer token"))
}

/// Resolve the authenticated user for a request
///
/// # Errors
///
/// `AuthRequired` without an Authorization header, `AuthInvalid` when the
/// token does not match any user.
pub async fn authenticate(database: &Database, headers: &HeaderMap) -> AppResult<User> {
    let token = bearer_token(headers)?;
    database
        .users()
        .get_by_token(token)
        .await?
        .ok_or_else(|| AppError::auth_invalid("Unknown bearer token"))
}
