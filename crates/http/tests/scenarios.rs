// SPDX-License-Identifier: Apache-2.0

//! End-to-end exercises of the literal scenarios from the external
//! interface design (secret gate, heartbeat liveness, job FSM).

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use edgemesh_bus::EventBus;
use edgemesh_history::MetricsHistory;
use edgemesh_http::state::AppState;
use edgemesh_ingestion::IngestionService;
use edgemesh_store::Store;

fn test_state(shared_secret: Option<&str>) -> AppState {
    let store = Store::new();
    let history = MetricsHistory::new(256);
    let bus = EventBus::new(256);
    let ingestion = IngestionService::new(store.clone(), history.clone(), bus.clone());
    AppState {
        store,
        history,
        bus,
        ingestion,
        shared_secret: shared_secret.map(str::to_string),
        history_limit_max: 500,
    }
}

fn app(state: AppState) -> axum::Router {
    edgemesh_http::app(state, edgemesh_http::cors_layer(&[]))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn secret_gate_rejects_missing_header_then_accepts_registration() {
    let state = test_state(Some("s"));
    let app = app(state);

    let unauthorized = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/agent/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "node_id": "node-1",
                        "display_name": "n",
                        "ip": "127.0.0.1",
                        "port": 9100,
                        "capabilities": {"cpu_cores": 8, "cpu_threads": 16, "ram_total_gb": 32}
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

    let created = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/agent/register")
                .header("content-type", "application/json")
                .header("x-edgemesh-secret", "s")
                .body(Body::from(
                    json!({
                        "node_id": "node-1",
                        "display_name": "n",
                        "ip": "127.0.0.1",
                        "port": 9100,
                        "capabilities": {"cpu_cores": 8, "cpu_threads": 16, "ram_total_gb": 32}
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let list = app
        .oneshot(Request::builder().uri("/v1/nodes").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    let nodes = body_json(list).await;
    assert_eq!(nodes.as_array().unwrap().len(), 1);
    assert_eq!(nodes[0]["identity"]["node_id"], "node-1");
}

#[tokio::test]
async fn heartbeat_flips_node_online_and_updates_metrics() {
    let state = test_state(None);
    let app = app(state);

    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/agent/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "node_id": "node-1",
                        "display_name": "n",
                        "ip": "127.0.0.1",
                        "port": 9100,
                        "capabilities": {}
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let heartbeat = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/agent/heartbeat")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "node_id": "node-1",
                        "metrics": {
                            "cpu_percent": 34,
                            "ram_used_gb": 7.8,
                            "ram_percent": 51.2,
                            "gpu_percent": 40,
                            "vram_used_gb": 6,
                            "running_jobs": 1
                        }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(heartbeat.status(), StatusCode::ACCEPTED);

    let detail = app
        .oneshot(
            Request::builder()
                .uri("/v1/nodes/node-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let detail = body_json(detail).await;
    assert_eq!(detail["node"]["status"], "ONLINE");
    assert_eq!(detail["node"]["metrics"]["ram_used_gb"], 7.8);
}

#[tokio::test]
async fn job_fsm_enforces_terminal_conflict() {
    let state = test_state(None);
    let app = app(state);

    let created = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/jobs")
                .header("content-type", "application/json")
                .body(Body::from(json!({"task_type": "EMBED"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let job = body_json(created).await;
    assert_eq!(job["status"], "QUEUED");
    let job_id = job["id"].as_str().unwrap().to_string();

    let running = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/jobs/{job_id}/status"))
                .header("content-type", "application/json")
                .body(Body::from(json!({"status": "RUNNING"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(running.status(), StatusCode::OK);
    let running = body_json(running).await;
    assert_eq!(running["attempts"], 1);
    assert!(running["started_at"].is_string());

    let completed = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/jobs/{job_id}/status"))
                .header("content-type", "application/json")
                .body(Body::from(json!({"status": "COMPLETED"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(completed.status(), StatusCode::OK);

    // A different QUEUED job cannot jump straight to COMPLETED.
    let other_created = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/jobs")
                .header("content-type", "application/json")
                .body(Body::from(json!({"task_type": "EMBED"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let other_job = body_json(other_created).await;
    let other_id = other_job["id"].as_str().unwrap().to_string();

    let conflict = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/jobs/{other_id}/status"))
                .header("content-type", "application/json")
                .body(Body::from(json!({"status": "COMPLETED"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(conflict.status(), StatusCode::CONFLICT);
}
