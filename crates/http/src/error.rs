// SPDX-License-Identifier: Apache-2.0

//! Translates typed failures from the domain, store, and ingestion crates
//! into HTTP responses. This is the only layer in the coordinator that
//! knows about status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use edgemesh_domain::ValidationError;
use edgemesh_ingestion::IngestionError;
use edgemesh_store::StoreError;

/// Errors surfaced by any HTTP handler.
#[derive(Error, Debug)]
pub enum AppError {
    /// Schema bounds violated. Surfaces as 422.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unknown node or job id. Surfaces as 404.
    #[error(transparent)]
    NotFound(StoreNotFound),

    /// Illegal job transition. Surfaces as 409.
    #[error(transparent)]
    Conflict(StoreConflict),

    /// Missing or mismatched shared secret. Surfaces as 401.
    #[error("missing or invalid X-EdgeMesh-Secret header")]
    Unauthorized,
}

/// Wraps the `NotFound` variant of [`StoreError`] so `AppError` doesn't need
/// to re-derive `From<StoreError>` for both its 404 and 409 cases.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StoreNotFound(String);

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StoreConflict(String);

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound(StoreNotFound(err.to_string())),
            StoreError::Conflict { .. } => AppError::Conflict(StoreConflict(err.to_string())),
        }
    }
}

impl From<IngestionError> for AppError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::Validation(e) => AppError::Validation(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
