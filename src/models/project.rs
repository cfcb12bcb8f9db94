//! Project model.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::error::{Result, SemaphoreError};
use crate::lazy::Lazy;
use crate::models::branch::{Branch, BranchRecord};
use crate::models::server::{Server, ServerListing, ServerRecord};
use crate::models::webhook::{HookType, Webhook, WebhookParams};
use crate::traits::{Keyed, Refresh};
use crate::transport::{Method, Transport};

/// Scalar fields of a project, as sent by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Numeric project ID.
    pub id: u64,
    /// Hash ID used in every sub-resource URL.
    pub hash_id: String,
    /// Project name, unique per account.
    pub name: String,
    /// Owner account.
    pub owner: String,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
    /// Project page on semaphoreci.com.
    pub html_url: String,
}

/// A project entry of the project listing: scalar fields plus branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPayload {
    #[serde(flatten)]
    pub record: ProjectRecord,
    #[serde(default)]
    pub branches: Vec<BranchRecord>,
}

/// A Semaphore project.
///
/// Branches arrive with the project listing. Servers and webhooks are
/// fetched on first access and cached; webhook mutations keep the cache in
/// step with the API without re-fetching.
#[derive(Debug, Clone)]
pub struct Project {
    record: ProjectRecord,
    transport: Transport,
    branches: Collection<Branch>,
    servers: Lazy<Collection<Server>>,
    webhooks: Lazy<Collection<Webhook>>,
}

impl Project {
    pub(crate) fn new(payload: ProjectPayload, transport: Transport) -> Self {
        let branches = payload
            .branches
            .into_iter()
            .map(|record| Branch::new(record, transport.clone()))
            .collect();
        Self {
            record: payload.record,
            transport,
            branches,
            servers: Lazy::new(),
            webhooks: Lazy::new(),
        }
    }

    /// Scalar fields of the project.
    pub fn record(&self) -> &ProjectRecord {
        &self.record
    }

    /// Project name.
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Project hash ID.
    pub fn hash_id(&self) -> &str {
        &self.record.hash_id
    }

    /// Branches of the project.
    pub fn branches(&self) -> &Collection<Branch> {
        &self.branches
    }

    /// The branch with the given name.
    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.get(name)
    }

    /// The branch with the given name, mutably (to load its builds).
    pub fn branch_mut(&mut self, name: &str) -> Option<&mut Branch> {
        self.branches.get_mut(name)
    }

    /// Deployment servers of the project.
    ///
    /// # Errors
    ///
    /// Returns an error if the server listing or any server request fails.
    pub async fn servers(&mut self) -> Result<&Collection<Server>> {
        Ok(&*self.load_servers().await?)
    }

    /// The server with the given name.
    pub async fn server(&mut self, name: &str) -> Result<Option<&mut Server>> {
        Ok(self
            .load_servers()
            .await?
            .iter_mut()
            .find(|server| server.name() == name))
    }

    /// Webhooks of the project.
    ///
    /// # Errors
    ///
    /// Returns an error if the webhook listing fails.
    pub async fn webhooks(&mut self) -> Result<&Collection<Webhook>> {
        Ok(&*self.load_webhooks().await?)
    }

    /// The webhook with the given ID.
    pub async fn webhook(&mut self, id: u64) -> Result<Option<&Webhook>> {
        Ok(self.load_webhooks().await?.get(&id))
    }

    /// Create a webhook and add it to the cached webhooks.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the webhook.
    #[tracing::instrument(skip(self), fields(project = %self.record.name))]
    pub async fn create_webhook(&mut self, url: &str, hook_type: HookType) -> Result<Webhook> {
        let body = serde_json::to_value(WebhookParams { url, hook_type })?;
        let hook: Webhook = self
            .transport
            .mutate_expecting(Method::Post, &self.hooks_url()?, Some(&body))
            .await?;

        if let Some(webhooks) = self.webhooks.peek_mut() {
            webhooks.insert(hook.clone());
        }
        Ok(hook)
    }

    /// Update a cached webhook.
    ///
    /// Returns `None` without any request if `existing` is not among the
    /// cached webhooks.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the update.
    #[tracing::instrument(skip(self, existing), fields(project = %self.record.name, hook = existing.id))]
    pub async fn update_webhook(
        &mut self,
        existing: &Webhook,
        url: &str,
        hook_type: HookType,
    ) -> Result<Option<Webhook>> {
        if !self.is_cached_webhook(existing) {
            tracing::debug!("webhook not cached, skipping update");
            return Ok(None);
        }

        let body = serde_json::to_value(WebhookParams { url, hook_type })?;
        let url = self.hook_url(existing)?;
        let updated: Webhook = self
            .transport
            .mutate_expecting(Method::Put, &url, Some(&body))
            .await?;

        if let Some(webhooks) = self.webhooks.peek_mut() {
            webhooks.remove(&updated.id);
            webhooks.insert(updated.clone());
        }
        Ok(Some(updated))
    }

    /// Delete a cached webhook.
    ///
    /// Returns `false` without any request if `hook` is not among the cached
    /// webhooks.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete request fails.
    #[tracing::instrument(skip(self, hook), fields(project = %self.record.name, hook = hook.id))]
    pub async fn delete_webhook(&mut self, hook: &Webhook) -> Result<bool> {
        if !self.is_cached_webhook(hook) {
            tracing::debug!("webhook not cached, skipping delete");
            return Ok(false);
        }

        self.transport
            .execute(Method::Delete, &self.hook_url(hook)?, None)
            .await?;

        if let Some(webhooks) = self.webhooks.peek_mut() {
            webhooks.remove(&hook.id);
        }
        Ok(true)
    }

    fn is_cached_webhook(&self, hook: &Webhook) -> bool {
        self.webhooks
            .peek()
            .is_some_and(|webhooks| webhooks.contains(hook))
    }

    fn hooks_url(&self) -> Result<String> {
        self.project_url("hooks")
    }

    fn hook_url(&self, hook: &Webhook) -> Result<String> {
        Ok(format!("{}/{}", self.hooks_url()?, hook.id))
    }

    fn servers_url(&self) -> Result<String> {
        self.project_url("servers")
    }

    fn project_url(&self, resource: &str) -> Result<String> {
        let encoded_hash_id = urlencoding::encode(&self.record.hash_id);
        self.transport
            .api_url(&format!("projects/{encoded_hash_id}/{resource}"))
    }

    async fn load_servers(&mut self) -> Result<&mut Collection<Server>> {
        let url = self.servers_url()?;
        let transport = &self.transport;
        self.servers
            .get_or_fetch(move || async move {
                let listing: Vec<ServerListing> = transport.fetch_many(&url).await?;
                let mut servers = Collection::new();
                for entry in listing {
                    let (record, _) = transport.fetch_one::<ServerRecord>(&entry.server_url).await?;
                    servers.insert(Server::new(record, transport.clone()));
                }
                Ok::<_, SemaphoreError>(servers)
            })
            .await
    }

    async fn load_webhooks(&mut self) -> Result<&mut Collection<Webhook>> {
        let url = self.hooks_url()?;
        let transport = &self.transport;
        self.webhooks
            .get_or_fetch(move || async move {
                let hooks: Vec<Webhook> = transport.fetch_many(&url).await?;
                Ok::<_, SemaphoreError>(hooks.into_iter().collect())
            })
            .await
    }
}

#[async_trait]
impl Refresh for Project {
    async fn refresh(&mut self) -> Result<()> {
        self.servers.invalidate();
        self.webhooks.invalidate();
        self.load_servers().await?;
        self.load_webhooks().await?;
        Ok(())
    }
}

impl Keyed for Project {
    type Key = String;

    fn key(&self) -> String {
        self.record.name.clone()
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}
