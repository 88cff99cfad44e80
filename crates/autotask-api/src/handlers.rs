//! Route handler functions for all API endpoints.
//!
//! Each handler extracts query parameters via axum extractors, hands the
//! request to the dispatcher, and returns JSON responses.

use std::collections::HashMap;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use autotask_action::{ActionKind, TaskRequest};

use crate::error::ApiError;
use crate::state::AppState;

/// Response header carrying the id logged for a `/run` call.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub started_at: DateTime<Utc>,
    pub sandbox_root: String,
    pub action_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionInfo {
    pub trigger: String,
    pub kind: ActionKind,
    pub required_params: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionsResponse {
    pub actions: Vec<ActionInfo>,
}

// =============================================================================
// Handler functions
// =============================================================================

/// POST /run - resolve the `task` query parameter and run the action.
///
/// Every other query parameter is passed to the action. The body is the
/// response envelope; its status code becomes the HTTP status.
pub async fn run_task(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("run_task", request_id = %request_id);
    let request = TaskRequest::from_query(query);

    let envelope = async {
        tracing::info!(
            task = request.task.as_deref().unwrap_or_default(),
            params = request.params.len(),
            "Task received"
        );
        let envelope = state.dispatcher.dispatch(&request).await;
        tracing::info!(code = envelope.code, "Task finished");
        envelope
    }
    .instrument(span)
    .await;

    let status = StatusCode::from_u16(envelope.code)
        .map_err(|e| ApiError::Internal(format!("invalid status code: {}", e)))?;
    let mut response = (status, Json(envelope)).into_response();
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    Ok(response)
}

/// GET /health - service liveness and basic facts.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        started_at: state.started_at,
        sandbox_root: state.config.sandbox.root.clone(),
        action_count: state.dispatcher.registry().len(),
    })
}

/// GET /actions - the catalogue in matching order.
pub async fn list_actions(State(state): State<AppState>) -> Json<ActionsResponse> {
    let actions = state
        .dispatcher
        .actions()
        .into_iter()
        .map(|spec| ActionInfo {
            trigger: spec.trigger.to_string(),
            kind: spec.kind,
            required_params: spec.required_params.iter().map(|p| p.to_string()).collect(),
        })
        .collect();
    Json(ActionsResponse { actions })
}
