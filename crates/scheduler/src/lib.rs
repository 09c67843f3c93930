// SPDX-License-Identifier: Apache-2.0

//! Pure eligibility filtering, weighted scoring, and capacity accounting
//! over node state. Nothing in this crate suspends or performs I/O: every
//! function is a total, deterministic function of its inputs.

use serde::Serialize;

use edgemesh_domain::node::Node;
use edgemesh_domain::{NodeStatus, RolePreference, TaskType};

struct Weights;

impl Weights {
    const CPU_HEADROOM: f64 = 45.0;
    const RAM_HEADROOM: f64 = 35.0;
    const GPU_HEADROOM: f64 = 20.0;
    const INFER_GPU_BONUS: f64 = 22.0;
    const CPU_TASK_CPU_NODE_BONUS: f64 = 12.0;
    const ROLE_MATCH_BONUS: f64 = 14.0;
    const ROLE_MISMATCH_PENALTY: f64 = 10.0;
    const RUNNING_JOBS_PENALTY: f64 = 2.0;
}

fn task_requires_gpu(task: TaskType) -> bool {
    task == TaskType::Inference
}

fn task_prefers_cpu(task: TaskType) -> bool {
    matches!(
        task,
        TaskType::Embeddings | TaskType::Index | TaskType::Tokenize | TaskType::Preprocess
    )
}

fn infer_role_match(role: RolePreference) -> bool {
    matches!(role, RolePreference::Auto | RolePreference::PreferInference)
}

fn cpu_role_match(role: RolePreference) -> bool {
    matches!(
        role,
        RolePreference::Auto | RolePreference::PreferEmbeddings | RolePreference::PreferPreprocess
    )
}

/// `max(0, 1 - min(percent / max(cap, 1), 2))`.
fn headroom(percent: f64, cap_percent: f64) -> f64 {
    let cap = cap_percent.max(1.0);
    let utilization_ratio = (percent / cap).min(2.0);
    (1.0 - utilization_ratio).max(0.0)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Effective hardware capacity after applying policy caps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveCapacity {
    pub effective_cpu_threads: f64,
    pub effective_ram_gb: f64,
    pub effective_vram_gb: Option<f64>,
}

/// Applies the node's policy caps to its raw capabilities.
pub fn compute_effective_capacity(node: &Node) -> EffectiveCapacity {
    let cpu_threads = node
        .capabilities
        .cpu_threads
        .or(node.capabilities.cpu_cores)
        .unwrap_or(0) as f64;
    let ram_total = node.capabilities.ram_total_gb.unwrap_or(0.0);
    let vram_total = node.capabilities.vram_total_gb;

    let effective_cpu_threads = round3(cpu_threads * (node.policy.cpu_cap_percent / 100.0));
    let effective_ram_gb = round3(ram_total * (node.policy.ram_cap_percent / 100.0));

    let effective_vram_gb = vram_total.map(|vram| {
        let gpu_cap = node.policy.gpu_cap_percent.unwrap_or(100.0);
        round3(vram * (gpu_cap / 100.0))
    });

    EffectiveCapacity {
        effective_cpu_threads,
        effective_ram_gb,
        effective_vram_gb,
    }
}

/// Evaluates every eligibility reason independently; `eligible` iff none
/// apply. A node with no recorded metrics (never heartbeated) is treated as
/// having 0% cpu/ram and no gpu reading, which combined with `node_not_online`
/// still excludes it.
pub fn evaluate_node_eligibility(node: &Node, task: TaskType) -> (bool, Vec<&'static str>) {
    let mut reasons = Vec::new();

    if !node.policy.enabled {
        reasons.push("policy_disabled");
    }
    if node.status != NodeStatus::Online {
        reasons.push("node_not_online");
    }
    if !node.policy.task_allowlist.contains(&task) {
        reasons.push("task_not_allowed");
    }

    let (cpu_percent, ram_percent, gpu_percent) = match &node.metrics {
        Some(metrics) => (metrics.cpu_percent, metrics.ram_percent, metrics.gpu_percent),
        None => (0.0, 0.0, None),
    };

    if cpu_percent > node.policy.cpu_cap_percent {
        reasons.push("cpu_over_cap");
    }
    if ram_percent > node.policy.ram_cap_percent {
        reasons.push("ram_over_cap");
    }

    if task_requires_gpu(task) {
        if !node.capabilities.has_gpu() {
            reasons.push("gpu_required");
        } else if let Some(gpu_percent) = gpu_percent {
            let gpu_cap = node.policy.gpu_cap_percent.unwrap_or(100.0);
            if gpu_percent > gpu_cap {
                reasons.push("gpu_over_cap");
            }
        }
    }

    (reasons.is_empty(), reasons)
}

/// Shorthand for callers that only need the boolean verdict.
pub fn is_node_eligible(node: &Node, task: TaskType) -> bool {
    evaluate_node_eligibility(node, task).0
}

/// Weighted placement score, rounded to 3 decimals. Higher is better. Does
/// not consider eligibility; callers filter ineligible nodes separately.
pub fn score_node(node: &Node, task: TaskType) -> f64 {
    let mut score = 0.0_f64;

    let (cpu_percent, ram_percent, gpu_percent, running_jobs) = match &node.metrics {
        Some(metrics) => (
            metrics.cpu_percent,
            metrics.ram_percent,
            metrics.gpu_percent,
            metrics.running_jobs,
        ),
        None => (0.0, 0.0, None, 0),
    };

    score += headroom(cpu_percent, node.policy.cpu_cap_percent) * Weights::CPU_HEADROOM;
    score += headroom(ram_percent, node.policy.ram_cap_percent) * Weights::RAM_HEADROOM;

    if task_requires_gpu(task) {
        if node.capabilities.has_gpu() {
            score += Weights::INFER_GPU_BONUS;
        }
        if let Some(gpu_percent) = gpu_percent {
            let gpu_cap = node.policy.gpu_cap_percent.unwrap_or(100.0);
            score += headroom(gpu_percent, gpu_cap) * Weights::GPU_HEADROOM;
        }
        if infer_role_match(node.policy.role_preference) {
            score += Weights::ROLE_MATCH_BONUS;
        } else {
            score -= Weights::ROLE_MISMATCH_PENALTY;
        }
    }

    if task_prefers_cpu(task) {
        if !node.capabilities.has_gpu() {
            score += Weights::CPU_TASK_CPU_NODE_BONUS;
        }
        if cpu_role_match(node.policy.role_preference) {
            score += Weights::ROLE_MATCH_BONUS;
        } else {
            score -= Weights::ROLE_MISMATCH_PENALTY;
        }
    }

    score -= running_jobs as f64 * Weights::RUNNING_JOBS_PENALTY;
    round3(score)
}

/// A scored candidate, as returned by [`rank_nodes`].
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub node_id: String,
    pub eligible: bool,
    pub score: f64,
    pub reasons: Vec<&'static str>,
}

/// Scores and ranks every node for `task`: eligible candidates first, each
/// group sorted by score descending. Ties beyond score break on `node_id`
/// ascending to keep placement deterministic.
pub fn rank_nodes(nodes: &[Node], task: TaskType) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = nodes
        .iter()
        .map(|node| {
            let (eligible, reasons) = evaluate_node_eligibility(node, task);
            Candidate {
                node_id: node.identity.node_id.clone(),
                eligible,
                score: score_node(node, task),
                reasons,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.eligible
            .cmp(&a.eligible)
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.node_id.cmp(&b.node_id))
    });
    candidates
}

/// Picks the best eligible node for `task`, or `None` if none qualify.
pub fn pick_node(nodes: &[Node], task: TaskType) -> Option<Candidate> {
    rank_nodes(nodes, task).into_iter().find(|c| c.eligible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use edgemesh_domain::node::{NodeCapabilities, NodeIdentity, NodeMetrics, NodePolicy};
    use std::collections::BTreeSet;

    fn build_node(has_gpu: bool, role_preference: RolePreference) -> Node {
        let now = DateTime::<Utc>::MIN_UTC;
        let task_allowlist: BTreeSet<TaskType> = [
            TaskType::Inference,
            TaskType::Embeddings,
            TaskType::Index,
            TaskType::Tokenize,
        ]
        .into_iter()
        .collect();

        Node {
            identity: NodeIdentity {
                node_id: "n1".into(),
                display_name: "Node 1".into(),
                ip: "127.0.0.1".into(),
                port: 9100,
            },
            capabilities: NodeCapabilities {
                cpu_cores: Some(8),
                cpu_threads: Some(16),
                ram_total_gb: Some(32.0),
                gpu_name: has_gpu.then(|| "NVIDIA".to_string()),
                vram_total_gb: has_gpu.then_some(24.0),
                os: Some("linux".into()),
                arch: Some("x86_64".into()),
                task_types: task_allowlist.clone(),
                labels: vec![if has_gpu { "gpu".into() } else { "cpu".into() }],
            },
            metrics: Some(NodeMetrics {
                cpu_percent: 20.0,
                ram_used_gb: 10.0,
                ram_percent: 30.0,
                gpu_percent: has_gpu.then_some(40.0),
                vram_used_gb: has_gpu.then_some(5.0),
                running_jobs: 1,
                heartbeat_ts: now,
                extra: serde_json::Value::Null,
            }),
            policy: NodePolicy {
                enabled: true,
                cpu_cap_percent: 50.0,
                gpu_cap_percent: Some(75.0),
                ram_cap_percent: 80.0,
                task_allowlist,
                role_preference,
            },
            status: NodeStatus::Online,
            created_at: now,
            updated_at: now,
            last_seen: Some(now),
        }
    }

    #[test]
    fn effective_capacity_applies_policy_caps() {
        let node = build_node(true, RolePreference::Auto);
        let cap = compute_effective_capacity(&node);
        assert_eq!(cap.effective_cpu_threads, 8.0);
        assert_eq!(cap.effective_ram_gb, 25.6);
        assert_eq!(cap.effective_vram_gb, Some(18.0));
    }

    #[test]
    fn eligible_node_has_no_reasons() {
        let node = build_node(true, RolePreference::Auto);
        assert!(is_node_eligible(&node, TaskType::Inference));
    }

    #[test]
    fn cpu_over_cap_makes_node_ineligible() {
        let mut node = build_node(true, RolePreference::Auto);
        node.metrics.as_mut().unwrap().cpu_percent = 60.0;
        let (eligible, reasons) = evaluate_node_eligibility(&node, TaskType::Inference);
        assert!(!eligible);
        assert!(reasons.contains(&"cpu_over_cap"));
    }

    #[test]
    fn infer_scoring_prefers_gpu_nodes() {
        let gpu_node = build_node(true, RolePreference::PreferInference);
        let cpu_node = build_node(false, RolePreference::PreferEmbeddings);
        assert!(score_node(&gpu_node, TaskType::Inference) > score_node(&cpu_node, TaskType::Inference));
    }

    #[test]
    fn embed_scoring_prefers_cpu_nodes_with_cpu_role() {
        let cpu_node = build_node(false, RolePreference::PreferEmbeddings);
        let gpu_node = build_node(true, RolePreference::PreferInference);
        assert!(
            score_node(&cpu_node, TaskType::Embeddings) > score_node(&gpu_node, TaskType::Embeddings)
        );
    }

    #[test]
    fn pick_node_returns_none_when_all_ineligible() {
        let mut node = build_node(true, RolePreference::Auto);
        node.policy.enabled = false;
        assert!(pick_node(&[node], TaskType::Inference).is_none());
    }
}
