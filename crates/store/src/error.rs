// SPDX-License-Identifier: Apache-2.0

//! Error types surfaced by store operations.

use thiserror::Error;

/// Errors that can occur while reading or writing node/job state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested node or job id has no record.
    #[error("no such {kind} '{id}'")]
    NotFound {
        /// `"node"` or `"job"`.
        kind: &'static str,
        /// The id that was not found.
        id: String,
    },

    /// The requested state transition is not legal from the record's current
    /// status.
    #[error("illegal transition for job '{id}': {from} -> {to}")]
    Conflict {
        /// The job id being transitioned.
        id: String,
        /// The job's current status, formatted for display.
        from: String,
        /// The rejected target status, formatted for display.
        to: String,
    },
}
