// SPDX-License-Identifier: Apache-2.0

//! Environment-variable configuration for the coordinator and agent
//! binaries. See `SPEC_FULL.md` §6 for the authoritative variable list.

mod agent;
mod coordinator;
mod env;
pub mod error;

pub use agent::AgentSettings;
pub use coordinator::CoordinatorSettings;
pub use error::SettingsError;
