// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use crate::error::AgentError;

/// Loads the persisted node id from `path`, or mints a fresh `node-<uuid>`
/// and writes it back. The id survives process restarts so a node keeps its
/// identity across agent crashes and redeploys.
pub fn load_or_create(path: &Path) -> Result<String, AgentError> {
    let to_error = |source: std::io::Error| AgentError::NodeIdPersistence {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(to_error)?;
        }
    }

    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    let hex = uuid::Uuid::new_v4().simple().to_string();
    let node_id = format!("node-{}", &hex[..12]);
    std::fs::write(path, format!("{node_id}\n")).map_err(to_error)?;
    Ok(node_id)
}
