// SPDX-License-Identifier: Apache-2.0

//! A process-local, bounded-memory history of recent metrics samples per
//! node. Entries are value copies, independent of the authoritative store.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::Mutex;

use edgemesh_domain::node::NodeMetrics;

const DEFAULT_MAX_SAMPLES: usize = 256;

struct Inner {
    max_samples: usize,
    by_node: Mutex<HashMap<String, VecDeque<NodeMetrics>>>,
}

/// Handle to the shared metrics history. Cheaply [`Clone`]able.
#[derive(Clone)]
pub struct MetricsHistory(Arc<Inner>);

impl MetricsHistory {
    /// Creates a history buffer capped at `max_samples` entries per node.
    pub fn new(max_samples: usize) -> Self {
        MetricsHistory(Arc::new(Inner {
            max_samples,
            by_node: Mutex::new(HashMap::new()),
        }))
    }

    /// Appends a sample for `node_id`, evicting the oldest entry once the
    /// per-node ring is at capacity.
    pub async fn append(&self, node_id: &str, metrics: NodeMetrics) {
        let mut by_node = self.0.by_node.lock().await;
        let ring = by_node.entry(node_id.to_string()).or_default();
        if ring.len() >= self.0.max_samples {
            ring.pop_front();
        }
        ring.push_back(metrics);
    }

    /// Returns up to the last `limit` samples for `node_id`, oldest-first.
    /// An unknown node yields an empty list.
    pub async fn get(&self, node_id: &str, limit: usize) -> Vec<NodeMetrics> {
        let by_node = self.0.by_node.lock().await;
        match by_node.get(node_id) {
            Some(ring) => {
                let skip = ring.len().saturating_sub(limit);
                ring.iter().skip(skip).cloned().collect()
            }
            None => Vec::new(),
        }
    }
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SAMPLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn sample(cpu_percent: f64) -> NodeMetrics {
        NodeMetrics {
            cpu_percent,
            ram_used_gb: 1.0,
            ram_percent: 1.0,
            gpu_percent: None,
            vram_used_gb: None,
            running_jobs: 0,
            heartbeat_ts: DateTime::<Utc>::MIN_UTC,
            extra: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn ring_never_exceeds_max_samples() {
        let history = MetricsHistory::new(3);
        for i in 0..10 {
            history.append("node-1", sample(i as f64)).await;
        }
        let all = history.get("node-1", 100).await;
        assert_eq!(all.len(), 3);
        // oldest-first: the last 3 appended are 7, 8, 9
        assert_eq!(all[0].cpu_percent, 7.0);
        assert_eq!(all[2].cpu_percent, 9.0);
    }

    #[tokio::test]
    async fn get_caps_at_available_and_requested_limit() {
        let history = MetricsHistory::new(256);
        history.append("node-1", sample(1.0)).await;
        history.append("node-1", sample(2.0)).await;

        assert_eq!(history.get("node-1", 10).await.len(), 2);
        assert_eq!(history.get("node-1", 1).await.len(), 1);
        assert!(history.get("unknown-node", 10).await.is_empty());
    }
}
