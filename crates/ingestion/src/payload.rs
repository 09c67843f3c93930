// SPDX-License-Identifier: Apache-2.0

//! Normalized request payloads accepted by the ingestion services. The HTTP
//! layer deserializes wire JSON into these directly (field names match the
//! canonical payload keys in the external interface).

use serde::Deserialize;
use serde_json::Value;

/// `POST /v1/agent/register` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPayload {
    pub node_id: String,
    pub display_name: String,
    pub ip: String,
    pub port: u16,
    #[serde(default)]
    pub capabilities: RegisterCapabilities,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterCapabilities {
    #[serde(default)]
    pub cpu_cores: Option<u32>,
    #[serde(default)]
    pub cpu_threads: Option<u32>,
    #[serde(default)]
    pub ram_total_gb: Option<f64>,
    #[serde(default)]
    pub gpu_name: Option<String>,
    #[serde(default)]
    pub vram_total_gb: Option<f64>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub task_types: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// `POST /v1/agent/heartbeat` body.
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatPayload {
    pub node_id: String,
    pub metrics: HeartbeatMetrics,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatMetrics {
    pub cpu_percent: f64,
    pub ram_used_gb: f64,
    pub ram_percent: f64,
    #[serde(default)]
    pub gpu_percent: Option<f64>,
    #[serde(default)]
    pub vram_used_gb: Option<f64>,
    #[serde(default)]
    pub running_jobs: u32,
    #[serde(default)]
    pub extra: Value,
}
