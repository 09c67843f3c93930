// SPDX-License-Identifier: Apache-2.0

//! GET `/v1/stream/nodes` — server-sent events of node update events.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use futures::stream::{self, Stream};

use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new().route("/v1/stream/nodes", get(stream_nodes))
}

async fn stream_nodes(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.bus.subscribe();
    let events = stream::unfold(subscription, |mut sub| async move {
        let event = sub.recv().await;
        let payload = serde_json::to_string(&event).unwrap_or_default();
        Some((Ok(Event::default().event("node_update").data(payload)), sub))
    });

    Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
