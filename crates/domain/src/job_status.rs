// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Lifecycle status of a [`crate::job::Job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    /// Created, possibly assigned to a node, not yet started.
    #[serde(rename = "QUEUED")]
    Queued,
    /// Actively executing on its assigned node.
    #[serde(rename = "RUNNING")]
    Running,
    /// Finished successfully. Terminal.
    #[serde(rename = "COMPLETED")]
    Completed,
    /// Finished with an error. Terminal.
    #[serde(rename = "FAILED")]
    Failed,
    /// Cancelled by an operator before or during execution. Terminal.
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl JobStatus {
    /// Terminal statuses admit no further transitions (besides the tolerated
    /// self-transition).
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Running => "RUNNING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for JobStatus {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "QUEUED" => Ok(JobStatus::Queued),
            "RUNNING" => Ok(JobStatus::Running),
            "COMPLETED" => Ok(JobStatus::Completed),
            "FAILED" => Ok(JobStatus::Failed),
            "CANCELLED" => Ok(JobStatus::Cancelled),
            other => Err(ValidationError::UnknownEnumValue {
                kind: "job_status",
                raw: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allowed job status transitions, keyed by current status.
///
/// `CANCELLED` is reachable from `QUEUED` and `RUNNING` (an explicit
/// resolution of an open question in the original design, see DESIGN.md);
/// all terminal statuses admit no outgoing transitions.
pub fn allowed_transitions(from: JobStatus) -> &'static [JobStatus] {
    match from {
        JobStatus::Queued => &[JobStatus::Running, JobStatus::Cancelled],
        JobStatus::Running => &[
            JobStatus::Completed,
            JobStatus::Failed,
            JobStatus::Cancelled,
        ],
        JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_have_no_outgoing_transitions() {
        for status in [
            JobStatus::Completed,
            JobStatus::Failed,
            JobStatus::Cancelled,
        ] {
            assert!(allowed_transitions(status).is_empty());
            assert!(status.is_terminal());
        }
    }

    #[test]
    fn queued_can_run_or_cancel() {
        let next = allowed_transitions(JobStatus::Queued);
        assert!(next.contains(&JobStatus::Running));
        assert!(next.contains(&JobStatus::Cancelled));
        assert!(!next.contains(&JobStatus::Completed));
    }
}
