// SPDX-License-Identifier: Apache-2.0

//! Core entities, enumerations, and field-level validation rules shared by
//! every other EdgeMesh crate.

pub mod error;
pub mod job;
pub mod job_status;
pub mod node;
pub mod node_status;
pub mod role_preference;
pub mod task_type;

pub use error::ValidationError;
pub use job::Job;
pub use job_status::JobStatus;
pub use node::{Node, NodeCapabilities, NodeIdentity, NodeMetrics, NodePolicy};
pub use node_status::NodeStatus;
pub use role_preference::RolePreference;
pub use task_type::TaskType;
