// SPDX-License-Identifier: Apache-2.0

//! GET `/health` — liveness probe.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new().route("/health", get(show_health))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn show_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
