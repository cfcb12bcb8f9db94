//! Server model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::error::Result;
use crate::lazy::Lazy;
use crate::models::deploy::{Deploy, DeployRecord, ServerHistory};
use crate::pagination::fetch_merged;
use crate::traits::{Keyed, Refresh};
use crate::transport::Transport;

/// Scalar fields of a deployment server, as sent by the API.
///
/// A server has no single natural key; the whole record identifies it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServerRecord {
    #[serde(rename = "server_name")]
    pub name: String,
    #[serde(rename = "server_url")]
    pub url: String,
    #[serde(rename = "server_status_url")]
    pub status_url: String,
    /// API URL yielding the server's deploys.
    #[serde(rename = "server_history_url")]
    pub history_url: String,
    /// Deployment method (e.g. "heroku", "capistrano").
    #[serde(default)]
    pub deployment_method: Option<String>,
    /// Deployment strategy ("automatic" or "manual").
    #[serde(default)]
    pub strategy: Option<String>,
    /// Branch deployed automatically, if any.
    #[serde(default)]
    pub branch_name: Option<String>,
}

/// Entry of the project server listing; only the detail URL is used.
#[derive(Debug, Deserialize)]
pub(crate) struct ServerListing {
    pub server_url: String,
}

/// A deployment server of a project.
#[derive(Debug, Clone)]
pub struct Server {
    record: ServerRecord,
    transport: Transport,
    deploys: Lazy<Collection<Deploy>>,
}

impl Server {
    pub(crate) fn new(record: ServerRecord, transport: Transport) -> Self {
        Self {
            record,
            transport,
            deploys: Lazy::new(),
        }
    }

    /// Scalar fields of the server.
    pub fn record(&self) -> &ServerRecord {
        &self.record
    }

    /// Server name.
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Deploys of the server.
    ///
    /// # Errors
    ///
    /// Returns an error if any page of the server history fails.
    pub async fn deploys(&mut self) -> Result<&Collection<Deploy>> {
        Ok(&*self.load_deploys().await?)
    }

    /// The deploy with the given number.
    pub async fn deploy(&mut self, number: u64) -> Result<Option<&mut Deploy>> {
        Ok(self.load_deploys().await?.get_mut(&number))
    }

    /// The latest deploy, which reflects the server's current status.
    pub async fn status(&mut self) -> Result<Option<&mut Deploy>> {
        Ok(self.load_deploys().await?.last_mut())
    }

    /// Stop a deploy and swap the cached entry for the stopped one.
    ///
    /// Returns `None` without any request if `deploy` is not among the
    /// cached deploys.
    ///
    /// # Errors
    ///
    /// Returns an error if the stop request fails.
    #[tracing::instrument(skip(self, deploy), fields(server = %self.record.name, deploy = deploy.number()))]
    pub async fn stop_deploy(&mut self, deploy: &Deploy) -> Result<Option<Deploy>> {
        let cached = self
            .deploys
            .peek()
            .is_some_and(|deploys| deploys.contains(deploy));
        if !cached {
            tracing::debug!("deploy not cached, skipping stop");
            return Ok(None);
        }

        let (record, _) = self
            .transport
            .fetch_one::<DeployRecord>(&deploy.stop_url())
            .await?;
        let stopped = Deploy::new(record, self.transport.clone());

        if let Some(deploys) = self.deploys.peek_mut() {
            deploys.remove(&deploy.number());
            deploys.insert(stopped.clone());
        }

        Ok(Some(stopped))
    }

    async fn load_deploys(&mut self) -> Result<&mut Collection<Deploy>> {
        let transport = &self.transport;
        let url = self.record.history_url.as_str();
        self.deploys
            .get_or_fetch(move || fetch_deploys(transport, url))
            .await
    }
}

async fn fetch_deploys(transport: &Transport, url: &str) -> Result<Collection<Deploy>> {
    let history: ServerHistory = fetch_merged(transport, url).await?;
    Ok(history
        .deploys
        .into_iter()
        .map(|record| Deploy::new(record, transport.clone()))
        .collect())
}

#[async_trait]
impl Refresh for Server {
    async fn refresh(&mut self) -> Result<()> {
        self.deploys.invalidate();
        self.load_deploys().await?;
        Ok(())
    }
}

impl Keyed for Server {
    type Key = ServerRecord;

    fn key(&self) -> ServerRecord {
        self.record.clone()
    }
}

impl PartialEq for Server {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}
