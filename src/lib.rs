//! Semaphore CI API client library.
//!
//! A Rust library for navigating the Semaphore CI REST API as a lazy
//! resource graph: projects own branches, servers and webhooks; branches
//! own builds; builds own commits and threads; servers own deploys.
//! Child collections are fetched on first access, merged across every
//! page the API reports, and cached until refreshed or mutated.
//!
//! # Quick Start
//!
//! ```no_run
//! use semaphoreapi::{HookType, Refresh, Semaphore};
//!
//! #[tokio::main]
//! async fn main() -> semaphoreapi::Result<()> {
//!     // Connect with SEMAPHORE_API_TOKEN from the environment
//!     let mut semaphore = Semaphore::from_env().await?;
//!
//!     let project = semaphore
//!         .project("semaphoreci4j")
//!         .await?
//!         .expect("project exists");
//!
//!     // Builds are fetched once, across every page
//!     if let Some(branch) = project.branch_mut("develop") {
//!         let builds = branch.builds().await?;
//!         println!("{} builds on develop", builds.len());
//!     }
//!
//!     // Mutations keep the cached webhooks in step
//!     let hook = project
//!         .create_webhook("https://example.com/hook", HookType::PostBuild)
//!         .await?;
//!     project.delete_webhook(&hook).await?;
//!
//!     // Drop every cached child and fetch again
//!     project.refresh().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`HttpConnection`] - One authenticated exchange; [`SemaphoreClient`] is
//!   the `reqwest` implementation
//! - [`Transport`] - Shared handle every node uses to fetch and mutate
//! - [`Lazy`] - A cell that is either unfetched or populated
//! - [`Collection`] - Entities keyed by their natural [`Keyed`] key
//! - [`Refresh`] - Invalidate and reload a node's children
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `SEMAPHORE_API_TOKEN` (required) - Your Semaphore auth token
//! - `SEMAPHORE_API_URL` (optional) - Base URL (defaults to `https://semaphoreci.com/api/v1`)

mod client;
mod collection;
mod error;
mod lazy;
mod models;
mod pagination;
mod registry;
mod traits;
mod transport;

pub mod cli;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::SemaphoreClient;
pub use collection::Collection;
pub use error::{Result, SemaphoreError};
pub use lazy::Lazy;
pub use pagination::{fetch_merged, page_url, Pagination, MAX_PAGES, PAGINATION_HEADER};
pub use registry::Semaphore;
pub use transport::{ApiResponse, HttpConnection, Method, Transport};

// Re-export traits
pub use traits::{Keyed, Merge, Refresh};

// Re-export models
pub use models::{
    // Project types
    Project,
    ProjectPayload,
    ProjectRecord,
    // Branch and build types
    Branch,
    BranchRecord,
    Build,
    BuildRecord,
    BuildThread,
    Command,
    Commit,
    // Server and deploy types
    Deploy,
    DeployRecord,
    Server,
    ServerRecord,
    // Webhook types
    HookType,
    Webhook,
};
