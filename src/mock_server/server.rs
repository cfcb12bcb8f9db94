//! Mock Semaphore API server.
//!
//! Provides an axum-based HTTP server that simulates the Semaphore API.

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::Fixtures;
use super::handlers;
use super::state::MockState;

/// A mock Semaphore API server for testing.
///
/// The server runs in the background and can be used to test the Semaphore
/// client against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Fixtures::default_scenario()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(mut state: MockState) -> Self {
        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");
        let url = format!("http://{}", addr);

        state.base_url = url.clone();
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Server error");
        });

        Self {
            url,
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `SemaphoreClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Project routes
            .route("/projects", get(handlers::list_projects))
            // Branch and build routes
            .route(
                "/projects/:hash_id/branches/:branch_id",
                get(handlers::branch_history),
            )
            .route(
                "/projects/:hash_id/branches/:branch_id/status",
                get(handlers::branch_status),
            )
            .route(
                "/projects/:hash_id/branches/:branch_id/build",
                post(handlers::rebuild_branch),
            )
            .route(
                "/projects/:hash_id/branches/:branch_id/builds/:number",
                get(handlers::build_information),
            )
            .route(
                "/projects/:hash_id/branches/:branch_id/builds/:number/log",
                get(handlers::build_log),
            )
            .route(
                "/projects/:hash_id/branches/:branch_id/builds/:number/stop",
                post(handlers::stop_build),
            )
            // Server and deploy routes
            .route("/projects/:hash_id/servers", get(handlers::list_servers))
            .route(
                "/projects/:hash_id/servers/:server_id",
                get(handlers::get_server),
            )
            .route(
                "/projects/:hash_id/servers/:server_id/deploys",
                get(handlers::server_history),
            )
            .route(
                "/projects/:hash_id/servers/:server_id/deploys/:number",
                get(handlers::get_deploy),
            )
            .route(
                "/projects/:hash_id/servers/:server_id/deploys/:number/log",
                get(handlers::deploy_log),
            )
            .route(
                "/projects/:hash_id/servers/:server_id/deploys/:number/stop",
                get(handlers::stop_deploy),
            )
            // Webhook routes
            .route(
                "/projects/:hash_id/hooks",
                get(handlers::list_hooks).post(handlers::create_hook),
            )
            .route(
                "/projects/:hash_id/hooks/:id",
                put(handlers::update_hook).delete(handlers::delete_hook),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

#[derive(Debug, Deserialize)]
struct AuthQuery {
    auth_token: Option<String>,
}

/// Reject requests whose `auth_token` does not match the required token.
async fn require_token(
    State(state): State<Arc<RwLock<MockState>>>,
    Query(query): Query<AuthQuery>,
    request: Request,
    next: Next,
) -> Response {
    let required = state.read().await.required_token.clone();

    match required {
        Some(token) if query.auth_token.as_deref() != Some(token.as_str()) => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "message": "Invalid auth token" })),
        )
            .into_response(),
        _ => next.run(request).await,
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
