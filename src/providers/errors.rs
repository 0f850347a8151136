// ABOUTME: Error taxonomy for external provider failures
// ABOUTME: Distinguishes empty results from transport failures and throttling
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{AppError, ErrorCode};
use thiserror::Error;

/// Failures raised by external provider clients.
///
/// `NotFound` means the provider answered but had no usable records,
/// which is distinct from a failed or throttled request.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider returned zero usable records
    #[error("{0}")]
    NotFound(String),

    /// The provider throttled the request (HTTP 429); never retried
    #[error("{0}")]
    RateLimited(String),

    /// Transport failure after exhausting retries, or a non-success status
    #[error("{0}")]
    RequestFailed(String),

    /// The provider answered with a body we could not interpret
    #[error("{0}")]
    InvalidResponse(String),

    /// The caller supplied an unusable query (e.g. empty search term)
    #[error("{0}")]
    InvalidQuery(String),
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::NotFound(msg) => Self::new(ErrorCode::ResourceNotFound, msg),
            ProviderError::RateLimited(msg) => Self::new(ErrorCode::ExternalRateLimited, msg),
            ProviderError::RequestFailed(msg) | ProviderError::InvalidResponse(msg) => {
                Self::new(ErrorCode::ExternalServiceError, msg)
            }
            ProviderError::InvalidQuery(msg) => Self::new(ErrorCode::InvalidInput, msg),
        }
    }
}
