// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use crate::env::{env_or, parse_env_or};
use crate::error::SettingsError;

/// Agent process configuration, read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    pub coordinator_url: String,
    pub display_name: String,
    pub agent_port: u16,
    pub heartbeat_seconds: f64,
    pub log_level: String,
    pub node_id_file: PathBuf,
    /// `None` when `EDGE_MESH_SHARED_SECRET` is unset or blank.
    pub shared_secret: Option<String>,
}

impl AgentSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let coordinator_url = env_or("COORDINATOR_URL", "http://localhost:8000")
            .trim_end_matches('/')
            .to_string();

        let display_name = match std::env::var("DISPLAY_NAME") {
            Ok(value) if !value.trim().is_empty() => value,
            _ => hostname_fallback(),
        };

        let shared_secret = env_or("EDGE_MESH_SHARED_SECRET", "");
        let shared_secret = (!shared_secret.trim().is_empty())
            .then(|| shared_secret.trim().to_string());

        Ok(AgentSettings {
            coordinator_url,
            display_name,
            agent_port: parse_env_or("AGENT_PORT", 9100)?,
            heartbeat_seconds: parse_env_or("HEARTBEAT_SECONDS", 2.0)?,
            log_level: env_or("AGENT_LOG_LEVEL", "INFO"),
            node_id_file: PathBuf::from(env_or("NODE_ID_FILE", "state/node_id.txt")),
            shared_secret,
        })
    }
}

/// Falls back to the OS hostname, or `"edge-node"` if it cannot be read
/// (e.g. a non-UTF-8 hostname, or an unsupported platform).
fn hostname_fallback() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| "edge-node".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slash_from_coordinator_url() {
        // SAFETY: test-only process-wide env mutation, no concurrent access.
        unsafe {
            std::env::set_var("COORDINATOR_URL", "http://localhost:8000/");
        }
        let settings = AgentSettings::from_env().unwrap();
        assert_eq!(settings.coordinator_url, "http://localhost:8000");
        unsafe {
            std::env::remove_var("COORDINATOR_URL");
        }
    }
}
