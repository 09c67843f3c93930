// SPDX-License-Identifier: Apache-2.0

//! POST `/v1/jobs`, GET `/v1/jobs`, GET `/v1/jobs/{id}`,
//! POST `/v1/jobs/{id}/status`.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use edgemesh_domain::{Job, JobStatus, TaskType};
use edgemesh_scheduler::pick_node;
use edgemesh_store::JobFilter;

use crate::error::AppError;
use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/jobs", post(create_job).get(list_jobs))
        .route("/v1/jobs/{id}", get(get_job))
        .route("/v1/jobs/{id}/status", post(update_job_status))
}

#[derive(Debug, Deserialize)]
struct JobCreateRequest {
    task_type: String,
    payload_ref: Option<String>,
}

async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<JobCreateRequest>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let task_type = TaskType::from_str(&request.task_type)?;
    let nodes = state.store.get_nodes().await;
    let assigned_node_id = pick_node(&nodes, task_type).map(|c| c.node_id);

    let hex = uuid::Uuid::new_v4().simple().to_string();
    let id = format!("job-{}", &hex[..12]);
    let now = chrono::Utc::now();
    let mut job = Job::new(id, task_type, request.payload_ref, now);
    job.assigned_node_id = assigned_node_id;

    let job = state.store.create_job(job).await;
    Ok((StatusCode::CREATED, Json(job)))
}

#[derive(Debug, Deserialize)]
struct JobListQuery {
    status: Option<String>,
    task_type: Option<String>,
    node_id: Option<String>,
}

async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<Vec<Job>>, AppError> {
    let filter = JobFilter {
        status: query.status.map(|s| JobStatus::from_str(&s)).transpose()?,
        task_type: query
            .task_type
            .map(|t| TaskType::from_str(&t))
            .transpose()?,
        node_id: query.node_id,
    };
    Ok(Json(state.store.list_jobs(&filter).await))
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    let job = state
        .store
        .get_job(&id)
        .await
        .ok_or_else(|| edgemesh_store::StoreError::NotFound { kind: "job", id: id.clone() })?;
    Ok(Json(job))
}

#[derive(Debug, Deserialize)]
struct JobStatusUpdateRequest {
    status: String,
    error: Option<String>,
}

async fn update_job_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<JobStatusUpdateRequest>,
) -> Result<Json<Job>, AppError> {
    let new_status = JobStatus::from_str(&request.status)?;
    let now = chrono::Utc::now();
    let job = state
        .store
        .transition_job_status(&id, new_status, request.error, now)
        .await?;
    Ok(Json(job))
}
