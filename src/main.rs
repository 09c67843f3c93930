// SPDX-License-Identifier: Apache-2.0

//! The coordinator binary: wires the in-memory store, metrics history,
//! event bus, ingestion service, staleness monitor, and HTTP server
//! together, then serves until a shutdown signal arrives.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use edgemesh_bus::EventBus;
use edgemesh_history::MetricsHistory;
use edgemesh_http::state::AppState;
use edgemesh_ingestion::IngestionService;
use edgemesh_settings::CoordinatorSettings;
use edgemesh_store::Store;

const METRICS_HISTORY_CAPACITY: usize = 256;
const EVENT_BUS_CAPACITY: usize = 256;
const STALENESS_SWEEP_INTERVAL: Duration = Duration::from_secs(5);
const HISTORY_LIMIT_MAX: usize = 500;

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level.to_lowercase()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let settings = CoordinatorSettings::from_env().expect("invalid coordinator configuration");
    init_tracing(&settings.log_level);

    let store = Store::new();
    let history = MetricsHistory::new(METRICS_HISTORY_CAPACITY);
    let bus = EventBus::new(EVENT_BUS_CAPACITY);
    let ingestion = IngestionService::new(store.clone(), history.clone(), bus.clone());

    let state = AppState {
        store: store.clone(),
        history,
        bus,
        ingestion,
        shared_secret: settings.shared_secret.clone(),
        history_limit_max: HISTORY_LIMIT_MAX,
    };

    let cancel = CancellationToken::new();

    let staleness_task = tokio::spawn(edgemesh_ingestion::staleness::run(
        store,
        STALENESS_SWEEP_INTERVAL,
        settings.node_stale_seconds,
        cancel.child_token(),
    ));

    let app = edgemesh_http::app(state, edgemesh_http::cors_layer(&settings.cors_origins));

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .expect("invalid COORDINATOR_HOST/COORDINATOR_PORT combination");
    let listener = TcpListener::bind(addr)
        .await
        .unwrap_or_else(|err| panic!("failed to bind {addr}: {err}"));

    tracing::info!(%addr, "coordinator listening");

    let shutdown_cancel = cancel.clone();
    let serve_result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            shutdown_cancel.cancel();
        })
        .await;

    cancel.cancel();
    let _ = staleness_task.await;

    if let Err(err) = serve_result {
        tracing::error!(error = %err, "coordinator server error");
        std::process::exit(1);
    }
}
