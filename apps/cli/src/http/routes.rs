//! Route table and handlers for the HTTP control plane (§6 "External
//! interfaces").

use std::path::PathBuf;

use axum::extract::{Path, Query, State};
use axum::middleware::from_fn_with_state;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use flowmind_core::HumanTaskId;
use flowmind_tasks::HumanTask;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::middleware::{enforce_rate_limit, require_auth};
use crate::http::state::AppState;
use crate::runner;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/workflows/run", post(run_workflow))
        .route("/tasks", get(list_tasks))
        .route("/tasks/pending", get(pending_tasks))
        .route("/tasks/queue/stats", get(queue_stats))
        .route("/tasks/{id}", get(get_task))
        .route("/tasks/{id}/assign", post(assign_task))
        .route("/tasks/{id}/complete", post(complete_task))
        .route("/tasks/{id}/reject", post(reject_task))
        .layer(from_fn_with_state(state.clone(), require_auth));

    let api = if state.rate_limiter.is_some() {
        api.layer(from_fn_with_state(state.clone(), enforce_rate_limit))
    } else {
        api
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct RunWorkflowRequest {
    #[serde(rename = "filePath")]
    file_path: PathBuf,
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunWorkflowResponse {
    #[serde(rename = "runId")]
    run_id: String,
    status: String,
    message: String,
}

async fn run_workflow(
    State(state): State<AppState>,
    Json(payload): Json<RunWorkflowRequest>,
) -> Result<Json<RunWorkflowResponse>, ApiError> {
    let outcome = runner::run_workflow_file(&payload.file_path, payload.api_key, &state.collaborators).await?;
    Ok(Json(RunWorkflowResponse {
        run_id: outcome.run_id.to_string(),
        status: outcome.status.to_string(),
        message: outcome.message,
    }))
}

#[derive(Debug, Deserialize)]
struct TaskListQuery {
    role_id: Option<String>,
    assignee: Option<String>,
}

async fn list_tasks(State(state): State<AppState>, Query(query): Query<TaskListQuery>) -> Json<Vec<HumanTask>> {
    let role_id = query.role_id.and_then(|s| s.parse().ok());
    let tasks: Vec<HumanTask> = state
        .collaborators
        .task_queue
        .all()
        .await
        .into_iter()
        .filter(|task| role_id.is_none_or(|role_id| task.role_id == Some(role_id)))
        .filter(|task| query.assignee.as_deref().is_none_or(|a| task.assignee_id.as_deref() == Some(a)))
        .collect();
    Json(tasks)
}

#[derive(Debug, Deserialize)]
struct PendingQuery {
    role_id: Option<String>,
}

async fn pending_tasks(State(state): State<AppState>, Query(query): Query<PendingQuery>) -> Json<Vec<HumanTask>> {
    let role_id = query.role_id.and_then(|s| s.parse().ok());
    Json(state.collaborators.task_queue.get_pending_by_role(role_id).await)
}

async fn queue_stats(State(state): State<AppState>) -> Json<flowmind_tasks::TaskQueueStats> {
    Json(state.collaborators.task_queue.stats().await)
}

fn parse_task_id(raw: &str) -> Result<HumanTaskId, ApiError> {
    raw.parse().map_err(|_| ApiError::bad_request(format!("invalid task id: {raw}")))
}

async fn get_task(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<HumanTask>, ApiError> {
    let id = parse_task_id(&id)?;
    let task = state
        .collaborators
        .task_queue
        .get(id)
        .await
        .ok_or_else(|| ApiError::bad_request(format!("no such task: {id}")))?;
    Ok(Json(task))
}

#[derive(Debug, Deserialize)]
struct AssignRequest {
    user_id: String,
}

async fn assign_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AssignRequest>,
) -> Result<Json<HumanTask>, ApiError> {
    let id = parse_task_id(&id)?;
    let task = state.collaborators.task_queue.assign(id, body.user_id).await?;
    Ok(Json(task))
}

#[derive(Debug, Deserialize)]
struct CompleteRequest {
    result: Value,
}

async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CompleteRequest>,
) -> Result<Json<HumanTask>, ApiError> {
    let id = parse_task_id(&id)?;
    let task = state.collaborators.task_queue.complete(id, body.result).await?;
    Ok(Json(task))
}

#[derive(Debug, Deserialize)]
struct RejectRequest {
    reason: String,
}

async fn reject_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RejectRequest>,
) -> Result<Json<HumanTask>, ApiError> {
    let id = parse_task_id(&id)?;
    let task = state.collaborators.task_queue.reject(id, body.reason).await?;
    Ok(Json(task))
}
