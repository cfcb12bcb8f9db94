//! Server and deploy endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::{not_found, paginate, PageQuery};
use crate::mock_server::state::MockState;

/// GET /projects/{hash_id}/servers
///
/// Only the detail URL of each server is listed.
pub async fn list_servers(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(hash_id): Path<String>,
) -> Response {
    let state = state.read().await;

    let Some(project) = state.get_project(&hash_id) else {
        return not_found("project");
    };

    let listing: Vec<_> = project
        .servers
        .iter()
        .map(|server| {
            let record = state.server_record(project, server);
            serde_json::json!({
                "server_name": record.name,
                "server_url": record.url,
            })
        })
        .collect();

    (StatusCode::OK, Json(listing)).into_response()
}

/// GET /projects/{hash_id}/servers/{server_id}
pub async fn get_server(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, server_id)): Path<(String, u64)>,
) -> Response {
    let state = state.read().await;

    match (state.get_project(&hash_id), state.get_server(&hash_id, server_id)) {
        (Some(project), Some(server)) => {
            (StatusCode::OK, Json(state.server_record(project, server))).into_response()
        }
        _ => not_found("server"),
    }
}

/// GET /projects/{hash_id}/servers/{server_id}/deploys
///
/// Deploys are served newest first, a page at a time.
pub async fn server_history(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, server_id)): Path<(String, u64)>,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;

    let (Some(project), Some(server)) = (
        state.get_project(&hash_id),
        state.get_server(&hash_id, server_id),
    ) else {
        return not_found("server");
    };

    let newest_first: Vec<_> = server.deploys.iter().rev().cloned().collect();
    let (deploys, header) = paginate(&newest_first, query.page, state.page_size);
    let deploys: Vec<_> = deploys
        .iter()
        .map(|deploy| state.deploy_record(project, server, deploy))
        .collect();

    (
        StatusCode::OK,
        header,
        Json(serde_json::json!({
            "server_name": server.name,
            "deploys": deploys,
        })),
    )
        .into_response()
}

/// GET /projects/{hash_id}/servers/{server_id}/deploys/{number}
pub async fn get_deploy(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, server_id, number)): Path<(String, u64, u64)>,
) -> Response {
    let state = state.read().await;
    deploy_response(&state, &hash_id, server_id, number)
}

/// GET /projects/{hash_id}/servers/{server_id}/deploys/{number}/log
pub async fn deploy_log(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, server_id, number)): Path<(String, u64, u64)>,
) -> Response {
    let state = state.read().await;

    let Some(deploy) = state
        .get_server(&hash_id, server_id)
        .and_then(|server| server.deploys.iter().find(|d| d.number == number))
    else {
        return not_found("deploy");
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "threads": MockState::threads_for(&deploy.result),
        })),
    )
        .into_response()
}

/// GET /projects/{hash_id}/servers/{server_id}/deploys/{number}/stop
pub async fn stop_deploy(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, server_id, number)): Path<(String, u64, u64)>,
) -> Response {
    let mut state = state.write().await;

    if state.stop_deploy(&hash_id, server_id, number).is_none() {
        return not_found("deploy");
    }
    deploy_response(&state, &hash_id, server_id, number)
}

fn deploy_response(state: &MockState, hash_id: &str, server_id: u64, number: u64) -> Response {
    let (Some(project), Some(server)) = (
        state.get_project(hash_id),
        state.get_server(hash_id, server_id),
    ) else {
        return not_found("server");
    };

    match server.deploys.iter().find(|d| d.number == number) {
        Some(deploy) => (
            StatusCode::OK,
            Json(state.deploy_record(project, server, deploy)),
        )
            .into_response(),
        None => not_found("deploy"),
    }
}
