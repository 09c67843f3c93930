// SPDX-License-Identifier: Apache-2.0

//! GET `/v1/cluster/summary` — aggregate fleet capacity and job activity.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use edgemesh_domain::{JobStatus, NodeStatus};
use edgemesh_scheduler::compute_effective_capacity;
use edgemesh_store::JobFilter;

use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new().route("/v1/cluster/summary", get(cluster_summary))
}

#[derive(Serialize)]
struct ClusterSummaryResponse {
    total_nodes: usize,
    online_nodes: usize,
    offline_nodes: usize,
    total_effective_cpu_threads: f64,
    total_effective_ram_gb: f64,
    total_effective_vram_gb: f64,
    active_running_jobs_total: usize,
}

async fn cluster_summary(State(state): State<AppState>) -> Json<ClusterSummaryResponse> {
    let nodes = state.store.get_nodes().await;

    let online_nodes = nodes.iter().filter(|n| n.status == NodeStatus::Online).count();
    let offline_nodes = nodes.iter().filter(|n| n.status == NodeStatus::Offline).count();

    let mut total_effective_cpu_threads = 0.0;
    let mut total_effective_ram_gb = 0.0;
    let mut total_effective_vram_gb = 0.0;
    for node in nodes.iter().filter(|n| n.status == NodeStatus::Online) {
        let cap = compute_effective_capacity(node);
        total_effective_cpu_threads += cap.effective_cpu_threads;
        total_effective_ram_gb += cap.effective_ram_gb;
        total_effective_vram_gb += cap.effective_vram_gb.unwrap_or(0.0);
    }

    let running_jobs = state
        .store
        .list_jobs(&JobFilter {
            status: Some(JobStatus::Running),
            ..Default::default()
        })
        .await;

    Json(ClusterSummaryResponse {
        total_nodes: nodes.len(),
        online_nodes,
        offline_nodes,
        total_effective_cpu_threads,
        total_effective_ram_gb,
        total_effective_vram_gb,
        active_running_jobs_total: running_jobs.len(),
    })
}
