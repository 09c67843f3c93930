// SPDX-License-Identifier: Apache-2.0

//! POST `/v1/agent/register`, POST `/v1/agent/heartbeat` — the only two
//! routes gated by the shared-secret middleware.

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::post;
use axum::{Json, Router};

use edgemesh_domain::Node;
use edgemesh_ingestion::{HeartbeatPayload, RegisterPayload};

use crate::auth::require_agent_secret;
use crate::error::AppError;
use crate::state::AppState;

pub(crate) fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/agent/register", post(register))
        .route("/v1/agent/heartbeat", post(heartbeat))
        .route_layer(middleware::from_fn_with_state(state, require_agent_secret))
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<Node>), AppError> {
    let node = state.ingestion.register(payload).await?;
    Ok((StatusCode::CREATED, Json(node)))
}

async fn heartbeat(
    State(state): State<AppState>,
    Json(payload): Json<HeartbeatPayload>,
) -> Result<(StatusCode, Json<edgemesh_bus::NodeUpdate>), AppError> {
    let event = state.ingestion.heartbeat(payload).await?;
    Ok((StatusCode::ACCEPTED, Json(event)))
}
