// SPDX-License-Identifier: Apache-2.0

//! The coordinator's HTTP surface: request routing and schema validation.
//! Every handler is thin glue over `edgemesh-store`, `edgemesh-scheduler`,
//! and `edgemesh-ingestion`; this crate owns none of the domain logic.

mod agent;
mod auth;
mod cluster;
pub mod error;
mod health;
mod jobs;
mod nodes;
mod simulate;
pub mod state;
mod stream;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Builds the full router: every route module merged, CORS and request
/// tracing layered on top.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(agent::routes(state.clone()))
        .merge(nodes::routes())
        .merge(simulate::routes())
        .merge(jobs::routes())
        .merge(cluster::routes())
        .merge(stream::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Builds a permissive-by-configuration CORS layer from the configured
/// origin list. An empty list disables cross-origin requests entirely.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    use axum::http::HeaderValue;

    if origins.is_empty() {
        return CorsLayer::new();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
