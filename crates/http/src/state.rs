// SPDX-License-Identifier: Apache-2.0

use edgemesh_bus::EventBus;
use edgemesh_history::MetricsHistory;
use edgemesh_ingestion::IngestionService;
use edgemesh_store::Store;

/// Shared state for every HTTP handler. Cheaply [`Clone`]able: every field
/// is itself a handle around an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub history: MetricsHistory,
    pub bus: EventBus,
    pub ingestion: IngestionService,
    /// `None` disables the shared-secret check entirely.
    pub shared_secret: Option<String>,
    pub history_limit_max: usize,
}
