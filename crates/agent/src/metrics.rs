// SPDX-License-Identifier: Apache-2.0

//! Capability and metrics reporting. Real OS/GPU probing (`psutil`,
//! `nvidia-smi`) is out of scope here; a `MetricsSource` keeps that door
//! open without the coordinator ever caring which implementation is wired
//! in — it only ever sees the wire payload.

use edgemesh_domain::TaskType;

use crate::payload::{HeartbeatMetrics, RegisterCapabilities};

/// Produces the capability description sent at registration and the usage
/// sample sent on every heartbeat.
pub trait MetricsSource: Send + Sync {
    fn capabilities(&self) -> RegisterCapabilities;
    fn metrics(&self) -> HeartbeatMetrics;
}

/// A `MetricsSource` that reports fixed numbers, optionally overridden by
/// environment variables. This is the agent's only bundled implementation;
/// a real probe (reading `/proc`, shelling out to `nvidia-smi`, etc.) can
/// implement the same trait without touching the register/heartbeat loop.
pub struct StaticMetricsSource {
    capabilities: RegisterCapabilities,
}

impl StaticMetricsSource {
    /// Builds capabilities from environment overrides, falling back to a
    /// modest CPU-only profile when unset.
    pub fn from_env() -> Self {
        let has_gpu = env_f64("EDGE_MESH_VRAM_TOTAL_GB").is_some()
            || std::env::var("EDGE_MESH_GPU_NAME").is_ok();

        let task_types = if has_gpu {
            TaskType::ALL.to_vec()
        } else {
            TaskType::ALL
                .into_iter()
                .filter(|t| *t != TaskType::Inference)
                .collect()
        };

        StaticMetricsSource {
            capabilities: RegisterCapabilities {
                cpu_cores: env_u32("EDGE_MESH_CPU_CORES").or(Some(4)),
                cpu_threads: env_u32("EDGE_MESH_CPU_THREADS").or(Some(8)),
                ram_total_gb: env_f64("EDGE_MESH_RAM_TOTAL_GB").or(Some(16.0)),
                gpu_name: std::env::var("EDGE_MESH_GPU_NAME").ok(),
                vram_total_gb: env_f64("EDGE_MESH_VRAM_TOTAL_GB"),
                os: Some(std::env::consts::OS.to_string()),
                arch: Some(std::env::consts::ARCH.to_string()),
                task_types,
                labels: if has_gpu {
                    vec!["gpu".to_string()]
                } else {
                    vec!["cpu".to_string()]
                },
            },
        }
    }
}

impl MetricsSource for StaticMetricsSource {
    fn capabilities(&self) -> RegisterCapabilities {
        self.capabilities.clone()
    }

    fn metrics(&self) -> HeartbeatMetrics {
        let gpu_percent = env_f64("EDGE_MESH_GPU_PERCENT");
        let vram_used_gb = env_f64("EDGE_MESH_VRAM_USED_GB");

        HeartbeatMetrics {
            cpu_percent: env_f64("EDGE_MESH_CPU_PERCENT").unwrap_or(0.0),
            ram_used_gb: env_f64("EDGE_MESH_RAM_USED_GB").unwrap_or(0.0),
            ram_percent: env_f64("EDGE_MESH_RAM_PERCENT").unwrap_or(0.0),
            gpu_percent,
            vram_used_gb,
            running_jobs: env_u32("EDGE_MESH_RUNNING_JOBS").unwrap_or(0),
        }
    }
}

fn env_f64(var: &str) -> Option<f64> {
    std::env::var(var).ok().and_then(|v| v.parse().ok())
}

fn env_u32(var: &str) -> Option<u32> {
    std::env::var(var).ok().and_then(|v| v.parse().ok())
}
