//! Refresh trait for reloading cached collections.

use async_trait::async_trait;

use crate::error::Result;

/// Discard cached data and fetch it again.
///
/// After a successful refresh every lazily loaded collection of the node is
/// populated with fresh data. If a fetch fails, the affected collection is
/// left unpopulated and will be fetched on next access.
///
/// # Example
///
/// ```ignore
/// use semaphoreapi::{Refresh, Semaphore};
///
/// let mut semaphore = Semaphore::from_env().await?;
/// let branch = semaphore
///     .project("semaphoreci4j")
///     .await?
///     .and_then(|p| p.branch_mut("develop"))
///     .expect("branch exists");
/// branch.refresh().await?;
/// ```
#[async_trait]
pub trait Refresh {
    /// Reload cached data from the API.
    ///
    /// # Errors
    ///
    /// Returns the first request error encountered.
    async fn refresh(&mut self) -> Result<()>;
}
