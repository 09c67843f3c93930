// SPDX-License-Identifier: Apache-2.0

//! POST `/v1/simulate/schedule` — ranks candidate nodes for a task type
//! without creating a job.

use std::str::FromStr;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use edgemesh_domain::TaskType;
use edgemesh_scheduler::{rank_nodes, Candidate};

use crate::error::AppError;
use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new().route("/v1/simulate/schedule", post(simulate_schedule))
}

#[derive(Debug, Deserialize)]
struct ScheduleSimulationRequest {
    task_type: String,
}

#[derive(Serialize)]
struct ScheduleSimulationResponse {
    chosen_node_id: Option<String>,
    reason: Option<&'static str>,
    candidates: Vec<Candidate>,
}

async fn simulate_schedule(
    State(state): State<AppState>,
    Json(request): Json<ScheduleSimulationRequest>,
) -> Result<Json<ScheduleSimulationResponse>, AppError> {
    let task_type = TaskType::from_str(&request.task_type)?;
    let nodes = state.store.get_nodes().await;
    let candidates = rank_nodes(&nodes, task_type);

    let chosen = candidates.iter().find(|c| c.eligible);
    let (chosen_node_id, reason) = match chosen {
        Some(candidate) => (Some(candidate.node_id.clone()), None),
        None => (None, Some("No eligible nodes found")),
    };

    Ok(Json(ScheduleSimulationResponse {
        chosen_node_id,
        reason,
        candidates,
    }))
}
