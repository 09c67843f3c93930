// SPDX-License-Identifier: Apache-2.0

//! The authoritative in-memory store for node and job state.
//!
//! A single [`Store`] handle is shared across the coordinator process. It is
//! cheaply [`Clone`]able (an `Arc` around two `RwLock`-guarded maps) so every
//! component that needs to read or write node/job state holds its own copy
//! of the handle rather than reaching through ambient module state.

pub mod error;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use edgemesh_domain::job_status::allowed_transitions;
use edgemesh_domain::node::{NodeCapabilities, NodeIdentity, NodeMetrics, NodePolicy};
use edgemesh_domain::{Job, JobStatus, Node, NodeStatus, TaskType};

pub use error::StoreError;

#[derive(Default)]
struct Inner {
    nodes: RwLock<HashMap<String, Node>>,
    jobs: RwLock<HashMap<String, Job>>,
}

/// Handle to the shared node/job store. Clone and share freely; clones refer
/// to the same underlying state.
#[derive(Clone, Default)]
pub struct Store(Arc<Inner>);

/// Optional filters accepted by [`Store::list_jobs`].
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub task_type: Option<TaskType>,
    pub node_id: Option<String>,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-or-update identity fields. Leaves capabilities/metrics/policy
    /// at their existing values, or at defaults on first insert. Does not
    /// touch `last_seen` or `status`.
    pub async fn upsert_node_identity(
        &self,
        node_id: &str,
        display_name: String,
        ip: String,
        port: u16,
        now: DateTime<Utc>,
    ) -> Node {
        let mut nodes = self.0.nodes.write().await;
        let node = nodes.entry(node_id.to_string()).or_insert_with(|| {
            Node::new_identity_only(
                NodeIdentity {
                    node_id: node_id.to_string(),
                    display_name: display_name.clone(),
                    ip: ip.clone(),
                    port,
                },
                now,
            )
        });
        node.identity.display_name = display_name;
        node.identity.ip = ip;
        node.identity.port = port;
        node.updated_at = now;
        node.clone()
    }

    /// Replaces the capabilities blob. Auto-creates the node with defaults
    /// (an empty identity save for the id) if it does not exist yet.
    pub async fn upsert_node_capabilities(
        &self,
        node_id: &str,
        capabilities: NodeCapabilities,
        now: DateTime<Utc>,
    ) -> Node {
        let mut nodes = self.0.nodes.write().await;
        let node = nodes.entry(node_id.to_string()).or_insert_with(|| {
            Node::new_identity_only(
                NodeIdentity {
                    node_id: node_id.to_string(),
                    display_name: String::new(),
                    ip: String::new(),
                    port: 0,
                },
                now,
            )
        });
        node.capabilities = capabilities;
        node.updated_at = now;
        node.clone()
    }

    /// Replaces the node's metrics, flips status to ONLINE, and refreshes
    /// `last_seen` to the metrics' own timestamp. Auto-creates the node with
    /// defaults if it does not exist yet (see open question on task-type
    /// defaulting in DESIGN.md).
    pub async fn update_node_metrics(
        &self,
        node_id: &str,
        metrics: NodeMetrics,
        now: DateTime<Utc>,
    ) -> Node {
        let mut nodes = self.0.nodes.write().await;
        let node = nodes.entry(node_id.to_string()).or_insert_with(|| {
            Node::new_identity_only(
                NodeIdentity {
                    node_id: node_id.to_string(),
                    display_name: String::new(),
                    ip: String::new(),
                    port: 0,
                },
                now,
            )
        });
        node.last_seen = Some(metrics.heartbeat_ts);
        node.metrics = Some(metrics);
        node.status = NodeStatus::Online;
        node.updated_at = now;
        node.clone()
    }

    /// Replaces the node's policy. Fails with [`StoreError::NotFound`] if the
    /// node does not exist; callers validate the policy's field bounds
    /// before calling this (see `edgemesh_domain::node::NodePolicy::validate`).
    pub async fn update_node_policy(
        &self,
        node_id: &str,
        policy: NodePolicy,
        now: DateTime<Utc>,
    ) -> Result<Node, StoreError> {
        let mut nodes = self.0.nodes.write().await;
        let node = nodes
            .get_mut(node_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "node",
                id: node_id.to_string(),
            })?;
        node.policy = policy;
        node.updated_at = now;
        Ok(node.clone())
    }

    /// Looks up a single node by id.
    pub async fn get_node(&self, node_id: &str) -> Option<Node> {
        self.0.nodes.read().await.get(node_id).cloned()
    }

    /// All known nodes, ordered by `node_id` ascending.
    pub async fn get_nodes(&self) -> Vec<Node> {
        let nodes = self.0.nodes.read().await;
        let mut out: Vec<Node> = nodes.values().cloned().collect();
        out.sort_by(|a, b| a.identity.node_id.cmp(&b.identity.node_id));
        out
    }

    /// Demotes every node whose `last_seen` predates `now - stale_seconds`
    /// and whose status isn't already OFFLINE. Returns the changed nodes.
    pub async fn mark_offline_if_stale(
        &self,
        stale_seconds: i64,
        now: DateTime<Utc>,
    ) -> Vec<Node> {
        let threshold = now - chrono::Duration::seconds(stale_seconds);
        let mut nodes = self.0.nodes.write().await;
        let mut changed = Vec::new();
        for node in nodes.values_mut() {
            let is_stale = node.last_seen.is_some_and(|seen| seen < threshold);
            if is_stale && node.status != NodeStatus::Offline {
                node.status = NodeStatus::Offline;
                node.updated_at = now;
                changed.push(node.clone());
            }
        }
        changed.sort_by(|a, b| a.identity.node_id.cmp(&b.identity.node_id));
        changed
    }

    /// Inserts a freshly-created job. The caller is responsible for id
    /// uniqueness and field validation.
    pub async fn create_job(&self, job: Job) -> Job {
        let mut jobs = self.0.jobs.write().await;
        jobs.insert(job.id.clone(), job.clone());
        job
    }

    /// Looks up a single job by id.
    pub async fn get_job(&self, id: &str) -> Option<Job> {
        self.0.jobs.read().await.get(id).cloned()
    }

    /// Jobs matching every supplied filter, ordered by `created_at`
    /// descending then `id` ascending.
    pub async fn list_jobs(&self, filter: &JobFilter) -> Vec<Job> {
        let jobs = self.0.jobs.read().await;
        let mut out: Vec<Job> = jobs
            .values()
            .filter(|job| filter.status.is_none_or(|s| job.status == s))
            .filter(|job| filter.task_type.is_none_or(|t| job.task_type == t))
            .filter(|job| {
                filter
                    .node_id
                    .as_deref()
                    .is_none_or(|id| job.assigned_node_id.as_deref() == Some(id))
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        out
    }

    /// Sets (or clears) the assigned node on a job.
    pub async fn assign_job(
        &self,
        id: &str,
        node_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Job, StoreError> {
        let mut jobs = self.0.jobs.write().await;
        let job = jobs.get_mut(id).ok_or_else(|| StoreError::NotFound {
            kind: "job",
            id: id.to_string(),
        })?;
        job.assigned_node_id = node_id;
        job.updated_at = now;
        Ok(job.clone())
    }

    /// Enforces the job status FSM (see `edgemesh_domain::job_status`):
    /// fails with [`StoreError::NotFound`] for an unknown id, or
    /// [`StoreError::Conflict`] for an illegal transition. A self-transition
    /// is tolerated as a no-op save for `error`.
    pub async fn transition_job_status(
        &self,
        id: &str,
        new_status: JobStatus,
        error: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Job, StoreError> {
        let mut jobs = self.0.jobs.write().await;
        let job = jobs.get_mut(id).ok_or_else(|| StoreError::NotFound {
            kind: "job",
            id: id.to_string(),
        })?;

        if new_status == job.status {
            if let Some(error) = error {
                job.error = Some(error);
                job.updated_at = now;
            }
            return Ok(job.clone());
        }

        if !allowed_transitions(job.status).contains(&new_status) {
            return Err(StoreError::Conflict {
                id: id.to_string(),
                from: job.status.to_string(),
                to: new_status.to_string(),
            });
        }

        job.apply_transition(new_status, error, now);
        Ok(job.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn heartbeat_flips_node_online_and_sets_last_seen() {
        let store = Store::new();
        store
            .upsert_node_identity("node-1", "n".into(), "127.0.0.1".into(), 9100, now())
            .await;

        let metrics = NodeMetrics {
            cpu_percent: 10.0,
            ram_used_gb: 1.0,
            ram_percent: 20.0,
            gpu_percent: None,
            vram_used_gb: None,
            running_jobs: 0,
            heartbeat_ts: now(),
            extra: serde_json::Value::Null,
        };
        let node = store.update_node_metrics("node-1", metrics, now()).await;
        assert_eq!(node.status, NodeStatus::Online);
        assert_eq!(node.last_seen, Some(now()));
    }

    #[tokio::test]
    async fn stale_sweep_demotes_only_stale_nodes() {
        let store = Store::new();
        store
            .upsert_node_identity("node-1", "n".into(), "127.0.0.1".into(), 9100, now())
            .await;
        let old_metrics = NodeMetrics {
            cpu_percent: 1.0,
            ram_used_gb: 1.0,
            ram_percent: 1.0,
            gpu_percent: None,
            vram_used_gb: None,
            running_jobs: 0,
            heartbeat_ts: now() - chrono::Duration::seconds(120),
            extra: serde_json::Value::Null,
        };
        store
            .update_node_metrics("node-1", old_metrics, now() - chrono::Duration::seconds(120))
            .await;

        let changed = store.mark_offline_if_stale(60, now()).await;
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].status, NodeStatus::Offline);
    }

    #[tokio::test]
    async fn self_transition_on_terminal_status_is_tolerated_no_op() {
        let store = Store::new();
        let job = Job::new("job-1".into(), TaskType::Embeddings, None, now());
        store.create_job(job).await;

        store
            .transition_job_status("job-1", JobStatus::Running, None, now())
            .await
            .unwrap();
        let completed = store
            .transition_job_status("job-1", JobStatus::Completed, None, now())
            .await
            .unwrap();

        let repeated = store
            .transition_job_status("job-1", JobStatus::Completed, None, now())
            .await
            .unwrap();
        assert_eq!(repeated.attempts, completed.attempts);
        assert_eq!(repeated.completed_at, completed.completed_at);
    }

    #[tokio::test]
    async fn self_transition_on_running_does_not_increment_attempts() {
        let store = Store::new();
        let job = Job::new("job-1".into(), TaskType::Embeddings, None, now());
        store.create_job(job).await;

        let first = store
            .transition_job_status("job-1", JobStatus::Running, None, now())
            .await
            .unwrap();
        assert_eq!(first.attempts, 1);

        let repeated = store
            .transition_job_status("job-1", JobStatus::Running, None, now())
            .await
            .unwrap();
        assert_eq!(repeated.attempts, 1);
        assert_eq!(repeated.error, None);
    }

    #[tokio::test]
    async fn self_transition_updates_error_when_supplied() {
        let store = Store::new();
        let job = Job::new("job-1".into(), TaskType::Embeddings, None, now());
        store.create_job(job).await;
        store
            .transition_job_status("job-1", JobStatus::Running, None, now())
            .await
            .unwrap();

        let updated = store
            .transition_job_status(
                "job-1",
                JobStatus::Running,
                Some("still retrying".into()),
                now(),
            )
            .await
            .unwrap();
        assert_eq!(updated.error.as_deref(), Some("still retrying"));
        assert_eq!(updated.attempts, 1);
    }

    #[tokio::test]
    async fn transition_to_different_terminal_status_conflicts() {
        let store = Store::new();
        let job = Job::new("job-1".into(), TaskType::Embeddings, None, now());
        store.create_job(job).await;
        store
            .transition_job_status("job-1", JobStatus::Running, None, now())
            .await
            .unwrap();
        store
            .transition_job_status("job-1", JobStatus::Failed, None, now())
            .await
            .unwrap();

        let err = store
            .transition_job_status("job-1", JobStatus::Completed, None, now())
            .await;
        assert!(matches!(err, Err(StoreError::Conflict { .. })));
    }

    #[tokio::test]
    async fn missing_job_is_not_found() {
        let store = Store::new();
        let err = store
            .transition_job_status("nope", JobStatus::Running, None, now())
            .await;
        assert!(matches!(err, Err(StoreError::NotFound { .. })));
    }
}
