//! Branch model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::error::Result;
use crate::lazy::Lazy;
use crate::models::build::{BranchHistory, Build};
use crate::models::replace_in_path;
use crate::pagination::fetch_merged;
use crate::traits::{Keyed, Refresh};
use crate::transport::{Method, Transport};

/// Scalar fields of a branch, as sent by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRecord {
    /// Branch name, unique within the project.
    #[serde(rename = "branch_name")]
    pub name: String,
    /// Branch page on semaphoreci.com.
    #[serde(rename = "branch_url")]
    pub url: String,
    /// API URL of the branch status.
    #[serde(rename = "branch_status_url")]
    pub status_url: String,
    /// API URL yielding the branch's builds.
    #[serde(rename = "branch_history_url")]
    pub history_url: String,
}

/// A project branch.
///
/// Builds are fetched on first access, following every page of the branch
/// history, and cached until [`refresh`](Refresh::refresh).
#[derive(Debug, Clone)]
pub struct Branch {
    record: BranchRecord,
    transport: Transport,
    builds: Lazy<Collection<Build>>,
}

impl Branch {
    pub(crate) fn new(record: BranchRecord, transport: Transport) -> Self {
        Self {
            record,
            transport,
            builds: Lazy::new(),
        }
    }

    /// Scalar fields of the branch.
    pub fn record(&self) -> &BranchRecord {
        &self.record
    }

    /// Branch name.
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Builds of the branch.
    ///
    /// # Errors
    ///
    /// Returns an error if any page of the branch history fails.
    pub async fn builds(&mut self) -> Result<&Collection<Build>> {
        Ok(&*self.load_builds().await?)
    }

    /// The build with the given number.
    pub async fn build(&mut self, number: u64) -> Result<Option<&mut Build>> {
        Ok(self.load_builds().await?.get_mut(&number))
    }

    /// The latest build, which reflects the branch's current status.
    pub async fn status(&mut self) -> Result<Option<&mut Build>> {
        Ok(self.load_builds().await?.last_mut())
    }

    /// Rebuild the last revision of the branch, then reload its builds.
    ///
    /// # Errors
    ///
    /// Returns an error if the rebuild request or the reload fails.
    #[tracing::instrument(skip(self), fields(branch = %self.record.name))]
    pub async fn rebuild_last_revision(&mut self) -> Result<()> {
        self.transport
            .execute(Method::Post, &self.rebuild_url(), None)
            .await?;
        self.refresh().await
    }

    /// URL that rebuilds the last revision of this branch.
    pub fn rebuild_url(&self) -> String {
        replace_in_path(&self.record.status_url, "/status", "/build")
    }

    async fn load_builds(&mut self) -> Result<&mut Collection<Build>> {
        let transport = &self.transport;
        let url = self.record.history_url.as_str();
        self.builds
            .get_or_fetch(move || fetch_builds(transport, url))
            .await
    }
}

async fn fetch_builds(transport: &Transport, url: &str) -> Result<Collection<Build>> {
    let history: BranchHistory = fetch_merged(transport, url).await?;
    Ok(history
        .builds
        .into_iter()
        .map(|record| Build::new(record, transport.clone()))
        .collect())
}

#[async_trait]
impl Refresh for Branch {
    async fn refresh(&mut self) -> Result<()> {
        self.builds.invalidate();
        self.load_builds().await?;
        Ok(())
    }
}

impl Keyed for Branch {
    type Key = String;

    fn key(&self) -> String {
        self.record.name.clone()
    }
}

impl PartialEq for Branch {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}
