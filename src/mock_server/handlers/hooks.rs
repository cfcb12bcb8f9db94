//! Webhook endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::not_found;
use crate::mock_server::state::MockState;
use crate::{HookType, Webhook};

/// Body of webhook create and update requests.
#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    pub url: String,
    pub hook_type: HookType,
}

/// GET /projects/{hash_id}/hooks
pub async fn list_hooks(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(hash_id): Path<String>,
) -> Response {
    let state = state.read().await;

    match state.get_project(&hash_id) {
        Some(project) => {
            let hooks: Vec<Webhook> = project.webhooks.values().cloned().collect();
            (StatusCode::OK, Json(hooks)).into_response()
        }
        None => not_found("project"),
    }
}

/// POST /projects/{hash_id}/hooks
pub async fn create_hook(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(hash_id): Path<String>,
    Json(body): Json<WebhookBody>,
) -> Response {
    if body.url.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "message": "url can't be blank" })),
        )
            .into_response();
    }

    let mut state = state.write().await;

    match state.create_webhook(&hash_id, body.url, body.hook_type) {
        Some(hook) => (StatusCode::OK, Json(hook)).into_response(),
        None => not_found("project"),
    }
}

/// PUT /projects/{hash_id}/hooks/{id}
pub async fn update_hook(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, id)): Path<(String, u64)>,
    Json(body): Json<WebhookBody>,
) -> Response {
    let mut state = state.write().await;

    match state.update_webhook(&hash_id, id, body.url, body.hook_type) {
        Some(hook) => (StatusCode::OK, Json(hook.clone())).into_response(),
        None => not_found("webhook"),
    }
}

/// DELETE /projects/{hash_id}/hooks/{id}
pub async fn delete_hook(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, id)): Path<(String, u64)>,
) -> Response {
    let mut state = state.write().await;

    match state.delete_webhook(&hash_id, id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found("webhook"),
    }
}
