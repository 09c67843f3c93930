// SPDX-License-Identifier: Apache-2.0

use crate::env::{env_or, parse_env_or};
use crate::error::SettingsError;

/// Coordinator process configuration, read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorSettings {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub heartbeat_ttl_seconds: u64,
    pub node_stale_seconds: i64,
    pub cors_origins: Vec<String>,
    pub db_url: String,
    /// `None` when `EDGE_MESH_SHARED_SECRET` is unset or blank: the shared
    /// secret check is then skipped entirely.
    pub shared_secret: Option<String>,
}

impl CoordinatorSettings {
    /// Reads configuration from the process environment, falling back to
    /// the documented defaults for anything unset.
    pub fn from_env() -> Result<Self, SettingsError> {
        let cors_raw = env_or("COORDINATOR_CORS_ORIGINS", "http://localhost:5173");
        let cors_origins = cors_raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let shared_secret = env_or("EDGE_MESH_SHARED_SECRET", "");
        let shared_secret = (!shared_secret.trim().is_empty())
            .then(|| shared_secret.trim().to_string());

        Ok(CoordinatorSettings {
            host: env_or("COORDINATOR_HOST", "0.0.0.0"),
            port: parse_env_or("COORDINATOR_PORT", 8000)?,
            log_level: env_or("COORDINATOR_LOG_LEVEL", "INFO"),
            heartbeat_ttl_seconds: parse_env_or("COORDINATOR_HEARTBEAT_TTL_SECONDS", 60)?,
            node_stale_seconds: parse_env_or("NODE_STALE_SECONDS", 15)?,
            cors_origins,
            db_url: env_or("COORDINATOR_DB_URL", "sqlite:///./coordinator.db"),
            shared_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        // SAFETY: test-only process-wide env mutation, no concurrent access.
        unsafe {
            std::env::remove_var("COORDINATOR_PORT");
            std::env::remove_var("NODE_STALE_SECONDS");
        }
        let settings = CoordinatorSettings::from_env().unwrap();
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.node_stale_seconds, 15);
        assert_eq!(settings.shared_secret, None);
    }

    #[test]
    fn cors_origins_splits_and_trims_comma_list() {
        // SAFETY: test-only process-wide env mutation, no concurrent access.
        unsafe {
            std::env::set_var("COORDINATOR_CORS_ORIGINS", "http://a.test, http://b.test");
        }
        let settings = CoordinatorSettings::from_env().unwrap();
        assert_eq!(settings.cors_origins, vec!["http://a.test", "http://b.test"]);
        unsafe {
            std::env::remove_var("COORDINATOR_CORS_ORIGINS");
        }
    }
}
