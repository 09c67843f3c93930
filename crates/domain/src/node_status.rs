// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Liveness status of a [`crate::node::Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NodeStatus {
    /// Identity known, no heartbeat has ever been received.
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
    /// A heartbeat has been received within the staleness window.
    #[serde(rename = "ONLINE")]
    Online,
    /// No heartbeat has been received within the staleness window.
    #[serde(rename = "OFFLINE")]
    Offline,
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeStatus::Unknown => "UNKNOWN",
            NodeStatus::Online => "ONLINE",
            NodeStatus::Offline => "OFFLINE",
        };
        f.write_str(s)
    }
}
