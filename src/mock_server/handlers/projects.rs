//! Project endpoint handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::ProjectPayload;

/// GET /projects
pub async fn list_projects(State(state): State<Arc<RwLock<MockState>>>) -> impl IntoResponse {
    let state = state.read().await;

    let projects: Vec<ProjectPayload> = state
        .projects
        .values()
        .map(|project| state.project_payload(project))
        .collect();

    (StatusCode::OK, Json(projects))
}
