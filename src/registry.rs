//! Root of the resource graph.

use async_trait::async_trait;

use crate::client::SemaphoreClient;
use crate::collection::Collection;
use crate::error::Result;
use crate::lazy::Lazy;
use crate::models::{Project, ProjectPayload};
use crate::traits::Refresh;
use crate::transport::{HttpConnection, Transport};

/// Entry point to the Semaphore API: every project of the account, by name.
///
/// Every node reachable from here shares this registry's [`Transport`].
///
/// # Example
///
/// ```no_run
/// use semaphoreapi::Semaphore;
///
/// # async fn example() -> semaphoreapi::Result<()> {
/// let mut semaphore = Semaphore::from_env().await?;
///
/// if let Some(project) = semaphore.project("semaphoreci4j").await? {
///     if let Some(branch) = project.branch_mut("develop") {
///         let builds = branch.builds().await?;
///         println!("{} builds on develop", builds.len());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Semaphore {
    transport: Transport,
    projects: Lazy<Collection<Project>>,
}

impl Semaphore {
    /// Create a registry over `connection`. Projects are fetched on first use.
    pub fn new<C: HttpConnection + 'static>(connection: C) -> Self {
        Self::with_transport(Transport::new(connection))
    }

    /// Create a registry over an existing transport.
    pub fn with_transport(transport: Transport) -> Self {
        Self {
            transport,
            projects: Lazy::new(),
        }
    }

    /// Create a registry and fetch the project listing right away.
    ///
    /// # Errors
    ///
    /// Returns an error if the project listing fails (e.g. a bad token).
    pub async fn connect<C: HttpConnection + 'static>(connection: C) -> Result<Self> {
        let mut semaphore = Self::new(connection);
        semaphore.load_projects().await?;
        Ok(semaphore)
    }

    /// Connect with a [`SemaphoreClient`] configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `SEMAPHORE_API_TOKEN` is not set or the project
    /// listing fails.
    pub async fn from_env() -> Result<Self> {
        Self::connect(SemaphoreClient::from_env()?).await
    }

    /// The transport shared by every node of this registry.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// All projects, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the project listing has to be fetched and fails.
    pub async fn projects(&mut self) -> Result<&Collection<Project>> {
        Ok(&*self.load_projects().await?)
    }

    /// The project with the given name.
    pub async fn project(&mut self, name: &str) -> Result<Option<&mut Project>> {
        Ok(self.load_projects().await?.get_mut(name))
    }

    async fn load_projects(&mut self) -> Result<&mut Collection<Project>> {
        let transport = &self.transport;
        self.projects
            .get_or_fetch(move || fetch_projects(transport))
            .await
    }
}

#[tracing::instrument(skip(transport))]
async fn fetch_projects(transport: &Transport) -> Result<Collection<Project>> {
    let url = transport.api_url("projects")?;
    let payloads: Vec<ProjectPayload> = transport.fetch_many(&url).await?;
    tracing::debug!(count = payloads.len(), "fetched project listing");

    Ok(payloads
        .into_iter()
        .map(|payload| Project::new(payload, transport.clone()))
        .collect())
}

#[async_trait]
impl Refresh for Semaphore {
    async fn refresh(&mut self) -> Result<()> {
        self.projects.invalidate();
        self.load_projects().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::testing::{page, ScriptedConnection};

    fn listing(names: &[&str]) -> serde_json::Value {
        let projects: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                json!({
                    "id": i,
                    "hash_id": format!("hash-{i}"),
                    "name": name,
                    "owner": "devfort",
                    "created_at": null,
                    "updated_at": null,
                    "html_url": format!("https://semaphoreci.com/devfort/{name}"),
                    "branches": []
                })
            })
            .collect();
        json!(projects)
    }

    #[tokio::test]
    async fn test_projects_populated_lazily() {
        let connection = ScriptedConnection::new(vec![page(listing(&["a", "b"]), None)]);
        let requests = connection.requests();
        let mut semaphore = Semaphore::new(connection);

        assert!(requests.lock().unwrap().is_empty());
        assert_eq!(semaphore.projects().await.unwrap().len(), 2);
        assert!(semaphore.project("a").await.unwrap().is_some());
        assert!(semaphore.project("c").await.unwrap().is_none());
        assert_eq!(requests.lock().unwrap().len(), 1);
        assert_eq!(
            requests.lock().unwrap()[0].1,
            "http://semaphore.test/api/v1/projects"
        );
    }

    #[tokio::test]
    async fn test_refresh_replaces_mapping() {
        let connection = ScriptedConnection::new(vec![
            page(listing(&["a"]), None),
            page(listing(&["b", "c"]), None),
        ]);
        let mut semaphore = Semaphore::connect(connection).await.unwrap();
        assert!(semaphore.project("a").await.unwrap().is_some());

        semaphore.refresh().await.unwrap();

        assert!(semaphore.project("a").await.unwrap().is_none());
        assert_eq!(semaphore.projects().await.unwrap().len(), 2);
    }
}
