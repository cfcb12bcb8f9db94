//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Semaphore API server.
//! Entities are stored without URLs; records are rendered against the
//! server's base URL at request time, so every URL handed to the client
//! points back at the mock.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    BranchRecord, BuildRecord, BuildThread, Command, Commit, DeployRecord, HookType,
    ProjectPayload, ProjectRecord, ServerRecord, Webhook,
};

/// Default number of entries per history page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// A project and everything it owns.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    pub id: u64,
    pub hash_id: String,
    pub name: String,
    pub owner: String,
    pub branches: Vec<BranchFixture>,
    pub servers: Vec<ServerFixture>,
    pub webhooks: BTreeMap<u64, Webhook>,
}

/// A branch and its build history (oldest first).
#[derive(Debug, Clone)]
pub struct BranchFixture {
    pub id: u64,
    pub name: String,
    pub builds: Vec<BuildFixture>,
}

/// A build with the commits it includes.
#[derive(Debug, Clone)]
pub struct BuildFixture {
    pub number: u64,
    pub result: String,
    pub commits: Vec<Commit>,
}

/// A deployment server and its deploy history (oldest first).
#[derive(Debug, Clone)]
pub struct ServerFixture {
    pub id: u64,
    pub name: String,
    pub deployment_method: Option<String>,
    pub strategy: Option<String>,
    pub branch_name: Option<String>,
    pub deploys: Vec<DeployFixture>,
}

/// A single deploy.
#[derive(Debug, Clone)]
pub struct DeployFixture {
    pub number: u64,
    pub result: String,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug)]
pub struct MockState {
    /// Projects indexed by hash ID.
    pub projects: BTreeMap<String, ProjectFixture>,

    /// Entries per page on history endpoints.
    pub page_size: usize,

    /// Optional authentication token. If set, requests must carry it as
    /// the `auth_token` query parameter.
    pub required_token: Option<String>,

    /// Base URL the server is reachable at, without trailing slash.
    pub base_url: String,

    next_hook_id: u64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            projects: BTreeMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            required_token: None,
            base_url: String::new(),
            next_hook_id: 1,
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a project to the state.
    pub fn with_project(mut self, project: ProjectFixture) -> Self {
        let max_hook = project.webhooks.keys().max().copied().unwrap_or(0);
        self.next_hook_id = self.next_hook_id.max(max_hook + 1);
        self.projects.insert(project.hash_id.clone(), project);
        self
    }

    /// Set the number of entries per history page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Get a project by hash ID.
    pub fn get_project(&self, hash_id: &str) -> Option<&ProjectFixture> {
        self.projects.get(hash_id)
    }

    /// Get a project by hash ID, mutably.
    pub fn get_project_mut(&mut self, hash_id: &str) -> Option<&mut ProjectFixture> {
        self.projects.get_mut(hash_id)
    }

    /// Get a branch of a project.
    pub fn get_branch(&self, hash_id: &str, branch_id: u64) -> Option<&BranchFixture> {
        self.get_project(hash_id)?
            .branches
            .iter()
            .find(|b| b.id == branch_id)
    }

    /// Get a deployment server of a project.
    pub fn get_server(&self, hash_id: &str, server_id: u64) -> Option<&ServerFixture> {
        self.get_project(hash_id)?
            .servers
            .iter()
            .find(|s| s.id == server_id)
    }

    /// Append a pending build to a branch, as a rebuild does.
    pub fn rebuild(&mut self, hash_id: &str, branch_id: u64) -> Option<&BuildFixture> {
        let branch = self
            .get_project_mut(hash_id)?
            .branches
            .iter_mut()
            .find(|b| b.id == branch_id)?;

        let number = branch.builds.iter().map(|b| b.number).max().unwrap_or(0) + 1;
        let commits = branch
            .builds
            .last()
            .map(|b| b.commits.clone())
            .unwrap_or_default();
        branch.builds.push(BuildFixture {
            number,
            result: "pending".to_string(),
            commits,
        });
        branch.builds.last()
    }

    /// Mark a build as stopped.
    pub fn stop_build(
        &mut self,
        hash_id: &str,
        branch_id: u64,
        number: u64,
    ) -> Option<&BuildFixture> {
        let build = self
            .get_project_mut(hash_id)?
            .branches
            .iter_mut()
            .find(|b| b.id == branch_id)?
            .builds
            .iter_mut()
            .find(|b| b.number == number)?;
        build.result = "stopped".to_string();
        Some(&*build)
    }

    /// Mark a deploy as stopped.
    pub fn stop_deploy(
        &mut self,
        hash_id: &str,
        server_id: u64,
        number: u64,
    ) -> Option<&DeployFixture> {
        let deploy = self
            .get_project_mut(hash_id)?
            .servers
            .iter_mut()
            .find(|s| s.id == server_id)?
            .deploys
            .iter_mut()
            .find(|d| d.number == number)?;
        deploy.result = "stopped".to_string();
        Some(&*deploy)
    }

    /// Register a webhook and return it with its assigned ID.
    pub fn create_webhook(
        &mut self,
        hash_id: &str,
        url: String,
        hook_type: HookType,
    ) -> Option<Webhook> {
        let id = self.next_hook_id;
        let project = self.projects.get_mut(hash_id)?;
        let hook = Webhook { id, url, hook_type };
        project.webhooks.insert(id, hook.clone());
        self.next_hook_id += 1;
        Some(hook)
    }

    /// Replace a webhook's URL and type.
    pub fn update_webhook(
        &mut self,
        hash_id: &str,
        id: u64,
        url: String,
        hook_type: HookType,
    ) -> Option<&Webhook> {
        let hook = self.get_project_mut(hash_id)?.webhooks.get_mut(&id)?;
        hook.url = url;
        hook.hook_type = hook_type;
        Some(&*hook)
    }

    /// Remove a webhook.
    pub fn delete_webhook(&mut self, hash_id: &str, id: u64) -> Option<Webhook> {
        self.get_project_mut(hash_id)?.webhooks.remove(&id)
    }

    // =========================================================================
    // Wire rendering
    // =========================================================================

    fn project_base(&self, project: &ProjectFixture) -> String {
        let hash_id = urlencoding::encode(&project.hash_id);
        format!("{}/projects/{hash_id}", self.base_url)
    }

    /// Render a project listing entry.
    pub fn project_payload(&self, project: &ProjectFixture) -> ProjectPayload {
        ProjectPayload {
            record: ProjectRecord {
                id: project.id,
                hash_id: project.hash_id.clone(),
                name: project.name.clone(),
                owner: project.owner.clone(),
                created_at: None,
                updated_at: None,
                html_url: format!("{}/{}/{}", self.base_url, project.owner, project.name),
            },
            branches: project
                .branches
                .iter()
                .map(|b| self.branch_record(project, b))
                .collect(),
        }
    }

    /// Render a branch record.
    pub fn branch_record(&self, project: &ProjectFixture, branch: &BranchFixture) -> BranchRecord {
        let api = format!("{}/branches/{}", self.project_base(project), branch.id);
        BranchRecord {
            name: branch.name.clone(),
            url: format!(
                "{}/{}/{}/branches/{}",
                self.base_url, project.owner, project.name, branch.name
            ),
            status_url: format!("{api}/status"),
            history_url: api,
        }
    }

    /// Render a build record.
    pub fn build_record(
        &self,
        project: &ProjectFixture,
        branch: &BranchFixture,
        build: &BuildFixture,
    ) -> BuildRecord {
        let api = format!(
            "{}/branches/{}/builds/{}",
            self.project_base(project),
            branch.id,
            build.number
        );
        BuildRecord {
            url: format!(
                "{}/{}/{}/branches/{}/builds/{}",
                self.base_url, project.owner, project.name, branch.name, build.number
            ),
            log_url: format!("{api}/log"),
            info_url: api,
            number: build.number,
            result: build.result.clone(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Render a server record.
    pub fn server_record(&self, project: &ProjectFixture, server: &ServerFixture) -> ServerRecord {
        let api = format!("{}/servers/{}", self.project_base(project), server.id);
        ServerRecord {
            name: server.name.clone(),
            url: api.clone(),
            status_url: format!("{api}/status"),
            history_url: format!("{api}/deploys"),
            deployment_method: server.deployment_method.clone(),
            strategy: server.strategy.clone(),
            branch_name: server.branch_name.clone(),
        }
    }

    /// Render a deploy record.
    pub fn deploy_record(
        &self,
        project: &ProjectFixture,
        server: &ServerFixture,
        deploy: &DeployFixture,
    ) -> DeployRecord {
        let api = format!(
            "{}/servers/{}/deploys/{}",
            self.project_base(project),
            server.id,
            deploy.number
        );
        DeployRecord {
            number: deploy.number,
            result: deploy.result.clone(),
            created_at: None,
            updated_at: None,
            started_at: None,
            finished_at: None,
            html_url: format!(
                "{}/{}/{}/servers/{}/deploys/{}",
                self.base_url, project.owner, project.name, server.name, deploy.number
            ),
            log_url: format!("{api}/log"),
            url: api,
        }
    }

    /// Threads of a build or deploy: one job running its setup and the
    /// result-bearing command.
    pub fn threads_for(result: &str) -> Vec<BuildThread> {
        let exit = if result == "failed" { 1 } else { 0 };
        vec![BuildThread {
            number: 1,
            commands: vec![
                Command {
                    name: "bundle install".to_string(),
                    result: 0,
                    output: "Bundle complete!".to_string(),
                    start_time: None,
                    finish_time: None,
                    duration: Some("00:05".to_string()),
                },
                Command {
                    name: "bundle exec rake".to_string(),
                    result: exit,
                    output: format!("build {result}"),
                    start_time: None,
                    finish_time: None,
                    duration: Some("00:42".to_string()),
                },
            ],
        }]
    }
}
