// SPDX-License-Identifier: Apache-2.0

//! GET `/v1/nodes`, GET `/v1/nodes/{id}`, PUT `/v1/nodes/{id}/policy`.

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use edgemesh_domain::node::{NodeMetrics, NodePolicy};
use edgemesh_domain::{Node, ValidationError};

use crate::error::AppError;
use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/nodes", get(list_nodes))
        .route("/v1/nodes/{id}", get(get_node))
        .route("/v1/nodes/{id}/policy", put(update_policy))
}

async fn list_nodes(State(state): State<AppState>) -> Json<Vec<Node>> {
    Json(state.store.get_nodes().await)
}

#[derive(Debug, Deserialize)]
struct NodeDetailQuery {
    #[serde(default)]
    include_metrics_history: bool,
    history_limit: Option<u32>,
}

#[derive(Serialize)]
struct NodeDetailResponse {
    node: Node,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics_history: Option<Vec<NodeMetrics>>,
}

async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<NodeDetailQuery>,
) -> Result<Json<NodeDetailResponse>, AppError> {
    let node = state
        .store
        .get_node(&id)
        .await
        .ok_or_else(|| edgemesh_store::StoreError::NotFound {
            kind: "node",
            id: id.clone(),
        })?;

    let metrics_history = if query.include_metrics_history {
        let limit = query.history_limit.unwrap_or(20);
        let max = state.history_limit_max as u32;
        if !(1..=max).contains(&limit) {
            return Err(ValidationError::OutOfRange {
                field: "history_limit",
                min: 1,
                max,
                value: limit,
            }
            .into());
        }
        Some(state.history.get(&id, limit as usize).await)
    } else {
        None
    };

    Ok(Json(NodeDetailResponse { node, metrics_history }))
}

async fn update_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(policy): Json<NodePolicy>,
) -> Result<Json<Node>, AppError> {
    policy.validate()?;
    let now = chrono::Utc::now();
    let node = state.store.update_node_policy(&id, policy, now).await?;
    Ok(Json(node))
}
