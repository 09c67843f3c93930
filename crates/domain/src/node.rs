// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::node_status::NodeStatus;
use crate::role_preference::RolePreference;
use crate::task_type::TaskType;

const MAX_NODE_ID_LEN: usize = 128;

fn validate_percent(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::PercentOutOfRange {
            field,
            value: value.to_string(),
        })
    }
}

/// Stable identity fields for a node: primary key plus network location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeIdentity {
    pub node_id: String,
    pub display_name: String,
    pub ip: String,
    pub port: u16,
}

impl NodeIdentity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.node_id.trim().is_empty() {
            return Err(ValidationError::Empty { field: "node_id" });
        }
        if self.node_id.len() > MAX_NODE_ID_LEN {
            return Err(ValidationError::TooLong {
                field: "node_id",
                max: MAX_NODE_ID_LEN,
                actual: self.node_id.len(),
            });
        }
        Ok(())
    }
}

/// Static hardware/software description of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCapabilities {
    pub cpu_cores: Option<u32>,
    pub cpu_threads: Option<u32>,
    pub ram_total_gb: Option<f64>,
    pub gpu_name: Option<String>,
    pub vram_total_gb: Option<f64>,
    pub os: Option<String>,
    pub arch: Option<String>,
    pub task_types: BTreeSet<TaskType>,
    pub labels: Vec<String>,
}

impl NodeCapabilities {
    /// Derived rather than stored independently: true when either GPU field is set.
    pub fn has_gpu(&self) -> bool {
        self.gpu_name.is_some() || self.vram_total_gb.is_some()
    }
}

impl Default for NodeCapabilities {
    fn default() -> Self {
        NodeCapabilities {
            cpu_cores: None,
            cpu_threads: None,
            ram_total_gb: None,
            gpu_name: None,
            vram_total_gb: None,
            os: None,
            arch: None,
            task_types: TaskType::ALL.into_iter().collect(),
            labels: Vec::new(),
        }
    }
}

/// A single reported resource-usage sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    pub cpu_percent: f64,
    pub ram_used_gb: f64,
    pub ram_percent: f64,
    pub gpu_percent: Option<f64>,
    pub vram_used_gb: Option<f64>,
    pub running_jobs: u32,
    pub heartbeat_ts: DateTime<Utc>,
    #[serde(default)]
    pub extra: serde_json::Value,
}

impl NodeMetrics {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_percent("cpu_percent", self.cpu_percent)?;
        validate_percent("ram_percent", self.ram_percent)?;
        if let Some(gpu_percent) = self.gpu_percent {
            validate_percent("gpu_percent", gpu_percent)?;
        }
        Ok(())
    }
}

/// Operator-controlled caps and preferences affecting scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePolicy {
    pub enabled: bool,
    pub cpu_cap_percent: f64,
    pub gpu_cap_percent: Option<f64>,
    pub ram_cap_percent: f64,
    pub task_allowlist: BTreeSet<TaskType>,
    pub role_preference: RolePreference,
}

impl NodePolicy {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_percent("cpu_cap_percent", self.cpu_cap_percent)?;
        validate_percent("ram_cap_percent", self.ram_cap_percent)?;
        if let Some(gpu_cap_percent) = self.gpu_cap_percent {
            validate_percent("gpu_cap_percent", gpu_cap_percent)?;
        }
        Ok(())
    }
}

impl Default for NodePolicy {
    fn default() -> Self {
        NodePolicy {
            enabled: true,
            cpu_cap_percent: 100.0,
            gpu_cap_percent: None,
            ram_cap_percent: 100.0,
            task_allowlist: TaskType::ALL.into_iter().collect(),
            role_preference: RolePreference::Auto,
        }
    }
}

/// An edge host known to the coordinator: identity, capabilities, the most
/// recent metrics sample (if any), policy, and liveness status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub identity: NodeIdentity,
    pub capabilities: NodeCapabilities,
    pub metrics: Option<NodeMetrics>,
    pub policy: NodePolicy,
    pub status: NodeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl Node {
    /// Builds a freshly-inserted node: identity known, everything else at
    /// spec defaults, status UNKNOWN.
    pub fn new_identity_only(identity: NodeIdentity, now: DateTime<Utc>) -> Self {
        Node {
            identity,
            capabilities: NodeCapabilities::default(),
            metrics: None,
            policy: NodePolicy::default(),
            status: NodeStatus::Unknown,
            created_at: now,
            updated_at: now,
            last_seen: None,
        }
    }
}
