// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::job_status::JobStatus;
use crate::task_type::TaskType;

const MAX_ID_LEN: usize = 128;
const MAX_PAYLOAD_REF_LEN: usize = 512;
const MAX_ERROR_LEN: usize = 2048;

/// The default error message recorded on a FAILED transition with no
/// supplied error.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Job failed";

/// A unit of work placed on (at most) one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub status: JobStatus,
    pub payload_ref: Option<String>,
    pub assigned_node_id: Option<String>,
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Job {
    /// Builds a newly-created, unassigned job in QUEUED status.
    pub fn new(id: String, task_type: TaskType, payload_ref: Option<String>, now: DateTime<Utc>) -> Self {
        Job {
            id,
            task_type,
            status: JobStatus::Queued,
            payload_ref,
            assigned_node_id: None,
            attempts: 0,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
            error: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::Empty { field: "id" });
        }
        if self.id.len() > MAX_ID_LEN {
            return Err(ValidationError::TooLong {
                field: "id",
                max: MAX_ID_LEN,
                actual: self.id.len(),
            });
        }
        if let Some(payload_ref) = &self.payload_ref {
            if payload_ref.len() > MAX_PAYLOAD_REF_LEN {
                return Err(ValidationError::TooLong {
                    field: "payload_ref",
                    max: MAX_PAYLOAD_REF_LEN,
                    actual: payload_ref.len(),
                });
            }
        }
        if let Some(error) = &self.error {
            if error.len() > MAX_ERROR_LEN {
                return Err(ValidationError::TooLong {
                    field: "error",
                    max: MAX_ERROR_LEN,
                    actual: error.len(),
                });
            }
        }
        Ok(())
    }

    /// Applies the §3 timestamp/attempt/error side effects of entering
    /// `next`. Does not check FSM legality; callers enforce that via
    /// [`crate::job_status::allowed_transitions`] before calling this.
    pub fn apply_transition(&mut self, next: JobStatus, error: Option<String>, now: DateTime<Utc>) {
        match next {
            JobStatus::Running => {
                self.attempts += 1;
                if self.started_at.is_none() {
                    self.started_at = Some(now);
                }
                self.error = None;
            }
            JobStatus::Completed => {
                if self.completed_at.is_none() {
                    self.completed_at = Some(now);
                }
                self.error = None;
            }
            JobStatus::Failed => {
                if self.completed_at.is_none() {
                    self.completed_at = Some(now);
                }
                self.error = Some(error.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()));
            }
            JobStatus::Cancelled => {
                if self.completed_at.is_none() {
                    self.completed_at = Some(now);
                }
                self.error = error;
            }
            JobStatus::Queued => {}
        }
        self.status = next;
        self.updated_at = now;
    }
}
