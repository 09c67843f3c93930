// SPDX-License-Identifier: Apache-2.0

//! Register and heartbeat services: the only two paths that may flip a node
//! from OFFLINE/UNKNOWN to ONLINE. Both validate, write through the store,
//! and (heartbeat only) fan out to the metrics history buffer and event bus.

pub mod error;
pub mod payload;
pub mod staleness;

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::Utc;

use edgemesh_bus::{EventBus, NodeUpdate};
use edgemesh_domain::node::{NodeCapabilities, NodeIdentity, NodeMetrics};
use edgemesh_domain::{Node, TaskType, ValidationError};
use edgemesh_history::MetricsHistory;
use edgemesh_store::Store;

pub use error::IngestionError;
pub use payload::{HeartbeatPayload, RegisterPayload};

/// Ties the store, metrics history, and event bus together behind the two
/// operations an agent calls.
#[derive(Clone)]
pub struct IngestionService {
    store: Store,
    history: MetricsHistory,
    bus: EventBus,
}

impl IngestionService {
    pub fn new(store: Store, history: MetricsHistory, bus: EventBus) -> Self {
        IngestionService { store, history, bus }
    }

    /// Validates and upserts identity + capabilities. Task types are taken
    /// from the payload if present (unknown values rejected with a
    /// validation error), else derived from free-form labels via lenient
    /// alias matching (unknown labels silently skipped), else defaulted to
    /// the full set.
    pub async fn register(&self, payload: RegisterPayload) -> Result<Node, IngestionError> {
        let identity = NodeIdentity {
            node_id: payload.node_id.clone(),
            display_name: payload.display_name,
            ip: payload.ip,
            port: payload.port,
        };
        identity.validate()?;

        let task_types = normalize_task_types(&payload.capabilities.task_types, &payload.capabilities.labels)?;

        let capabilities = NodeCapabilities {
            cpu_cores: payload.capabilities.cpu_cores,
            cpu_threads: payload.capabilities.cpu_threads,
            ram_total_gb: payload.capabilities.ram_total_gb,
            gpu_name: payload.capabilities.gpu_name,
            vram_total_gb: payload.capabilities.vram_total_gb,
            os: payload.capabilities.os,
            arch: payload.capabilities.arch,
            task_types,
            labels: payload.capabilities.labels,
        };

        let now = Utc::now();
        self.store
            .upsert_node_identity(&identity.node_id, identity.display_name, identity.ip, identity.port, now)
            .await;
        let node = self
            .store
            .upsert_node_capabilities(&payload.node_id, capabilities, now)
            .await;
        Ok(node)
    }

    /// Validates and records a metrics sample: store, history, then bus, in
    /// that order, so subscribers never observe an event whose node state
    /// hasn't yet been committed.
    pub async fn heartbeat(&self, payload: HeartbeatPayload) -> Result<NodeUpdate, IngestionError> {
        let metrics = NodeMetrics {
            cpu_percent: payload.metrics.cpu_percent,
            ram_used_gb: payload.metrics.ram_used_gb,
            ram_percent: payload.metrics.ram_percent,
            gpu_percent: payload.metrics.gpu_percent,
            vram_used_gb: payload.metrics.vram_used_gb,
            running_jobs: payload.metrics.running_jobs,
            heartbeat_ts: Utc::now(),
            extra: payload.metrics.extra,
        };
        metrics.validate()?;

        let now = Utc::now();
        let node = self
            .store
            .update_node_metrics(&payload.node_id, metrics.clone(), now)
            .await;
        self.history.append(&payload.node_id, metrics.clone()).await;

        let event = NodeUpdate {
            node_id: payload.node_id,
            status: node.status,
            metrics: Some(metrics),
            updated_at: node.updated_at,
        };
        self.bus.publish(event.clone());
        Ok(event)
    }
}

/// Task types supplied in the payload are parsed strictly: an unknown value
/// fails the whole request, matching the payload schema's `task_types:
/// list[TaskType]` field. Types derived from free-form labels are lenient
/// instead — unknown labels simply don't contribute a task type. Falls back
/// to the full set when neither source yields anything.
fn normalize_task_types(
    raw_task_types: &[String],
    labels: &[String],
) -> Result<BTreeSet<TaskType>, ValidationError> {
    if !raw_task_types.is_empty() {
        return raw_task_types.iter().map(|raw| TaskType::from_str(raw)).collect();
    }

    let from_labels: BTreeSet<TaskType> = labels
        .iter()
        .filter_map(|label| TaskType::parse_alias(label))
        .collect();
    if !from_labels.is_empty() {
        return Ok(from_labels);
    }

    Ok(TaskType::ALL.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{HeartbeatMetrics, RegisterCapabilities};

    fn service() -> IngestionService {
        IngestionService::new(Store::new(), MetricsHistory::new(256), EventBus::new(256))
    }

    #[tokio::test]
    async fn register_defaults_task_types_to_full_set_when_unspecified() {
        let svc = service();
        let node = svc
            .register(RegisterPayload {
                node_id: "node-1".into(),
                display_name: "n".into(),
                ip: "127.0.0.1".into(),
                port: 9100,
                capabilities: RegisterCapabilities::default(),
            })
            .await
            .unwrap();
        assert_eq!(node.capabilities.task_types.len(), TaskType::ALL.len());
    }

    #[tokio::test]
    async fn register_derives_task_types_from_labels_when_types_absent() {
        let svc = service();
        let node = svc
            .register(RegisterPayload {
                node_id: "node-1".into(),
                display_name: "n".into(),
                ip: "127.0.0.1".into(),
                port: 9100,
                capabilities: RegisterCapabilities {
                    labels: vec!["embed".into(), "gpu".into()],
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(node.capabilities.task_types, BTreeSet::from([TaskType::Embeddings]));
    }

    #[tokio::test]
    async fn register_rejects_unknown_task_type_in_payload() {
        let svc = service();
        let err = svc
            .register(RegisterPayload {
                node_id: "node-1".into(),
                display_name: "n".into(),
                ip: "127.0.0.1".into(),
                port: 9100,
                capabilities: RegisterCapabilities {
                    task_types: vec!["bogus".into()],
                    ..Default::default()
                },
            })
            .await
            .unwrap_err();
        assert!(matches!(err, IngestionError::Validation(_)));
    }

    #[tokio::test]
    async fn heartbeat_flips_node_online_and_publishes() {
        let svc = service();
        svc.register(RegisterPayload {
            node_id: "node-1".into(),
            display_name: "n".into(),
            ip: "127.0.0.1".into(),
            port: 9100,
            capabilities: RegisterCapabilities::default(),
        })
        .await
        .unwrap();

        let mut sub = svc.bus.subscribe();
        let event = svc
            .heartbeat(HeartbeatPayload {
                node_id: "node-1".into(),
                metrics: HeartbeatMetrics {
                    cpu_percent: 34.0,
                    ram_used_gb: 7.8,
                    ram_percent: 51.2,
                    gpu_percent: Some(40.0),
                    vram_used_gb: Some(6.0),
                    running_jobs: 1,
                    extra: serde_json::Value::Null,
                },
            })
            .await
            .unwrap();
        assert_eq!(event.node_id, "node-1");
        let received = sub.recv().await;
        assert_eq!(received.node_id, "node-1");
    }

    #[tokio::test]
    async fn heartbeat_rejects_out_of_range_percent() {
        let svc = service();
        let err = svc
            .heartbeat(HeartbeatPayload {
                node_id: "node-1".into(),
                metrics: HeartbeatMetrics {
                    cpu_percent: 150.0,
                    ram_used_gb: 1.0,
                    ram_percent: 1.0,
                    gpu_percent: None,
                    vram_used_gb: None,
                    running_jobs: 0,
                    extra: serde_json::Value::Null,
                },
            })
            .await;
        assert!(err.is_err());
    }
}
