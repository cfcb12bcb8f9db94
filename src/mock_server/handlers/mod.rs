//! HTTP request handlers for the mock server.

pub mod branches;
pub mod hooks;
pub mod projects;
pub mod servers;

pub use branches::*;
pub use hooks::*;
pub use projects::*;
pub use servers::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::pagination::PAGINATION_HEADER;
use crate::Pagination;

/// Query parameters accepted by history endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

/// 404 with a JSON error body.
pub(crate) fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not found",
            "message": format!("No {what} found")
        })),
    )
        .into_response()
}

/// Slice `items` to the requested page and describe it in a `Pagination`
/// header.
pub(crate) fn paginate<T: Clone>(
    items: &[T],
    page: Option<u32>,
    page_size: usize,
) -> (Vec<T>, [(&'static str, String); 1]) {
    let total_pages = items.len().div_ceil(page_size).max(1);
    let current_page = (page.unwrap_or(1).max(1) as usize).min(total_pages);

    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    let slice = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    let descriptor = Pagination {
        total_pages: total_pages as u32,
        current_page: current_page as u32,
        total_entries: Some(items.len() as u64),
        per_page: Some(page_size as u32),
    };
    let header = serde_json::to_string(&descriptor).unwrap_or_default();

    (slice, [(PAGINATION_HEADER, header)])
}
