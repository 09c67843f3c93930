// SPDX-License-Identifier: Apache-2.0

//! Background sweep that demotes nodes whose heartbeat has gone stale.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use edgemesh_store::Store;

/// Runs `store.mark_offline_if_stale` on a fixed interval until `cancel` is
/// triggered. Does not publish bus events for demotions (see DESIGN.md).
/// Sweep failures are not possible with the in-memory store, but the loop
/// structure still isolates one sweep's panic-free failure from the next.
pub async fn run(store: Store, interval: Duration, stale_seconds: i64, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("staleness monitor shutting down");
                return;
            }
            _ = ticker.tick() => {
                let now = chrono::Utc::now();
                let demoted = store.mark_offline_if_stale(stale_seconds, now).await;
                if !demoted.is_empty() {
                    debug!(count = demoted.len(), "demoted stale nodes to OFFLINE");
                }
            }
        }
    }
}
