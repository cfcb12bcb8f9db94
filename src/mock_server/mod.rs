//! Mock Semaphore API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Semaphore
//! API for integration and end-to-end testing. Unlike wiremock which mocks at
//! the HTTP level per-test, this server maintains state across requests:
//! rebuilds append builds, stops change results and webhooks persist.
//!
//! # Example
//!
//! ```ignore
//! use semaphoreapi::mock_server::MockServer;
//! use semaphoreapi::{Semaphore, SemaphoreClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = SemaphoreClient::new("test-token", server.url()).unwrap();
//!     let mut semaphore = Semaphore::connect(client).await.unwrap();
//!
//!     // Server comes with default fixtures
//!     let project = semaphore.project("semaphoreci4j").await.unwrap().unwrap();
//!     assert!(project.branch("develop").is_some());
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::Fixtures;
pub use server::MockServer;
pub use state::{
    BranchFixture, BuildFixture, DeployFixture, MockState, ProjectFixture, ServerFixture,
    DEFAULT_PAGE_SIZE,
};
