// SPDX-License-Identifier: Apache-2.0

//! Wire payloads sent to the coordinator's `/v1/agent/*` routes. These
//! mirror `edgemesh-ingestion`'s `RegisterPayload`/`HeartbeatPayload` shapes
//! without depending on that crate — the agent only ever produces JSON, it
//! never parses the coordinator's domain types.

use serde::Serialize;

use edgemesh_domain::TaskType;

#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    pub node_id: String,
    pub display_name: String,
    pub ip: String,
    pub port: u16,
    pub capabilities: RegisterCapabilities,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterCapabilities {
    pub cpu_cores: Option<u32>,
    pub cpu_threads: Option<u32>,
    pub ram_total_gb: Option<f64>,
    pub gpu_name: Option<String>,
    pub vram_total_gb: Option<f64>,
    pub os: Option<String>,
    pub arch: Option<String>,
    pub task_types: Vec<TaskType>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeartbeatPayload {
    pub node_id: String,
    pub metrics: HeartbeatMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeartbeatMetrics {
    pub cpu_percent: f64,
    pub ram_used_gb: f64,
    pub ram_percent: f64,
    pub gpu_percent: Option<f64>,
    pub vram_used_gb: Option<f64>,
    pub running_jobs: u32,
}
