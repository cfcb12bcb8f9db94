//! Branch and build endpoint handlers.

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

/// GET /projects/{hash_id}/branches/{branch_id}
///
/// Builds are served newest first, a page at a time.
pub async fn branch_history(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, branch_id)): Path<(String, u64)>,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;

    let (Some(project), Some(branch)) = (
        state.get_project(&hash_id),
        state.get_branch(&hash_id, branch_id),
    ) else {
        return not_found("branch");
    };

    let newest_first: Vec<_> = branch.builds.iter().rev().cloned().collect();
    let (builds, header) = paginate(&newest_first, query.page, state.page_size);
    let builds: Vec<_> = builds
        .iter()
        .map(|build| state.build_record(project, branch, build))
        .collect();

    (
        StatusCode::OK,
        header,
        Json(serde_json::json!({
            "branch_name": branch.name,
            "branch_url": state.branch_record(project, branch).url,
            "builds": builds,
        })),
    )
        .into_response()
}

/// GET /projects/{hash_id}/branches/{branch_id}/status
pub async fn branch_status(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, branch_id)): Path<(String, u64)>,
) -> Response {
    let state = state.read().await;

    let (Some(project), Some(branch)) = (
        state.get_project(&hash_id),
        state.get_branch(&hash_id, branch_id),
    ) else {
        return not_found("branch");
    };
    let Some(build) = branch.builds.last() else {
        return not_found("build");
    };

    let record = state.build_record(project, branch, build);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "branch_name": branch.name,
            "result": record.result,
            "build_number": record.number,
            "build_url": record.url,
        })),
    )
        .into_response()
}

/// POST /projects/{hash_id}/branches/{branch_id}/build
pub async fn rebuild_branch(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, branch_id)): Path<(String, u64)>,
) -> Response {
    let mut state = state.write().await;

    if state.rebuild(&hash_id, branch_id).is_none() {
        return not_found("branch");
    }
    build_response(&state, &hash_id, branch_id, None)
}

/// GET /projects/{hash_id}/branches/{branch_id}/builds/{number}
pub async fn build_information(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, branch_id, number)): Path<(String, u64, u64)>,
) -> Response {
    let state = state.read().await;

    let Some(build) = state
        .get_branch(&hash_id, branch_id)
        .and_then(|branch| branch.builds.iter().find(|b| b.number == number))
    else {
        return not_found("build");
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "number": build.number,
            "result": build.result,
            "commits": build.commits,
        })),
    )
        .into_response()
}

/// GET /projects/{hash_id}/branches/{branch_id}/builds/{number}/log
pub async fn build_log(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, branch_id, number)): Path<(String, u64, u64)>,
) -> Response {
    let state = state.read().await;

    let Some(build) = state
        .get_branch(&hash_id, branch_id)
        .and_then(|branch| branch.builds.iter().find(|b| b.number == number))
    else {
        return not_found("build");
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "threads": MockState::threads_for(&build.result),
        })),
    )
        .into_response()
}

/// POST /projects/{hash_id}/branches/{branch_id}/builds/{number}/stop
pub async fn stop_build(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((hash_id, branch_id, number)): Path<(String, u64, u64)>,
) -> Response {
    let mut state = state.write().await;

    if state.stop_build(&hash_id, branch_id, number).is_none() {
        return not_found("build");
    }
    build_response(&state, &hash_id, branch_id, Some(number))
}

/// Render one build of a branch (the latest when `number` is `None`).
fn build_response(state: &MockState, hash_id: &str, branch_id: u64, number: Option<u64>) -> Response {
    let (Some(project), Some(branch)) = (
        state.get_project(hash_id),
        state.get_branch(hash_id, branch_id),
    ) else {
        return not_found("branch");
    };
    let build = match number {
        Some(number) => branch.builds.iter().find(|b| b.number == number),
        None => branch.builds.last(),
    };
    match build {
        Some(build) => (
            StatusCode::OK,
            Json(state.build_record(project, branch, build)),
        )
            .into_response(),
        None => not_found("build"),
    }
}
