// SPDX-License-Identifier: Apache-2.0

//! The agent's register/heartbeat loop. Thin glue: it builds payloads from
//! a `MetricsSource`, posts them to the coordinator, and retries with
//! exponential backoff on any failure — re-registering from scratch each
//! time, since the coordinator may have forgotten the node in the meantime.

pub mod client;
pub mod error;
pub mod metrics;
pub mod node_id;
pub mod payload;

use std::time::Duration;

use tracing::{info, warn};

use client::CoordinatorClient;
use edgemesh_settings::AgentSettings;
use error::AgentError;
use metrics::MetricsSource;
use payload::{HeartbeatPayload, RegisterPayload};

const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

fn build_register_payload(node_id: &str, settings: &AgentSettings, source: &dyn MetricsSource) -> RegisterPayload {
    RegisterPayload {
        node_id: node_id.to_string(),
        display_name: settings.display_name.clone(),
        ip: "127.0.0.1".to_string(),
        port: settings.agent_port,
        capabilities: source.capabilities(),
    }
}

fn build_heartbeat_payload(node_id: &str, source: &dyn MetricsSource) -> HeartbeatPayload {
    HeartbeatPayload {
        node_id: node_id.to_string(),
        metrics: source.metrics(),
    }
}

/// Runs the register-then-heartbeat-forever loop. Never returns under
/// normal operation; only a process signal stops it (handled by the bin's
/// `main`).
pub async fn run(settings: AgentSettings, source: Box<dyn MetricsSource>) -> Result<(), AgentError> {
    let node_id = node_id::load_or_create(&settings.node_id_file)?;
    info!(node_id = %node_id, coordinator_url = %settings.coordinator_url, "agent_starting");

    let client = CoordinatorClient::new(settings.coordinator_url.clone(), settings.shared_secret.as_deref())?;

    let mut registered = false;
    let mut retry_delay = INITIAL_RETRY_DELAY;

    loop {
        let cycle_result = run_cycle(&client, &node_id, &settings, source.as_ref(), &mut registered).await;

        match cycle_result {
            Ok(()) => {
                retry_delay = INITIAL_RETRY_DELAY;
                tokio::time::sleep(Duration::from_secs_f64(settings.heartbeat_seconds)).await;
            }
            Err(err) => {
                warn!(node_id = %node_id, error = %err, retry_delay_seconds = retry_delay.as_secs_f64(), "agent_cycle_failed");
                registered = false;
                tokio::time::sleep(retry_delay).await;
                retry_delay = next_retry_delay(retry_delay);
            }
        }
    }
}

fn next_retry_delay(current: Duration) -> Duration {
    (current * 2).min(MAX_RETRY_DELAY)
}

async fn run_cycle(
    client: &CoordinatorClient,
    node_id: &str,
    settings: &AgentSettings,
    source: &dyn MetricsSource,
    registered: &mut bool,
) -> Result<(), AgentError> {
    if !*registered {
        let payload = build_register_payload(node_id, settings, source);
        client.register(&payload).await?;
        *registered = true;
        info!(node_id = %node_id, "agent_registered");
    }

    let payload = build_heartbeat_payload(node_id, source);
    client.heartbeat(&payload).await?;
    info!(node_id = %node_id, "heartbeat_sent");
    Ok(())
}
