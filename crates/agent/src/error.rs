// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Failures from a single register/heartbeat cycle. All of these are
/// treated as transient by the caller — the retry loop never distinguishes
/// them beyond logging.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("request to coordinator failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("coordinator rejected request with status {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to persist node id to {path}: {source}")]
    NodeIdPersistence {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
