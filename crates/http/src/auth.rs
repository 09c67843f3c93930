// SPDX-License-Identifier: Apache-2.0

//! Shared-secret gate for requests that alter node state. Skipped entirely
//! when no secret is configured.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;
use crate::state::AppState;

const SECRET_HEADER: &str = "x-edgemesh-secret";

pub async fn require_agent_secret(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = &state.shared_secret else {
        return Ok(next.run(request).await);
    };

    let provided = headers
        .get(SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided != Some(expected.as_str()) {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
