//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use std::collections::BTreeMap;

use crate::{Commit, HookType, Webhook};

use super::state::{
    BranchFixture, BuildFixture, DeployFixture, MockState, ProjectFixture, ServerFixture,
};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Project Fixtures
    // =========================================================================

    /// Create a project with no branches, servers or webhooks.
    pub fn minimal_project(hash_id: &str, name: &str) -> ProjectFixture {
        ProjectFixture {
            id: 1,
            hash_id: hash_id.to_string(),
            name: name.to_string(),
            owner: "devfort".to_string(),
            branches: vec![],
            servers: vec![],
            webhooks: BTreeMap::new(),
        }
    }

    /// Create a project with a single branch carrying `builds` builds.
    pub fn project_with_builds(
        hash_id: &str,
        name: &str,
        branch: &str,
        builds: u64,
    ) -> ProjectFixture {
        let mut project = Self::minimal_project(hash_id, name);
        project.branches.push(Self::branch(1, branch, builds));
        project
    }

    // =========================================================================
    // Branch and Build Fixtures
    // =========================================================================

    /// Create a branch with builds numbered `1..=builds`, all passed.
    pub fn branch(id: u64, name: &str, builds: u64) -> BranchFixture {
        BranchFixture {
            id,
            name: name.to_string(),
            builds: (1..=builds).map(Self::build).collect(),
        }
    }

    /// Create a passed build with one commit.
    pub fn build(number: u64) -> BuildFixture {
        BuildFixture {
            number,
            result: "passed".to_string(),
            commits: vec![Self::commit(number)],
        }
    }

    /// Create a commit whose SHA is derived from `seed`.
    pub fn commit(seed: u64) -> Commit {
        let id = format!("{seed:040x}");
        Commit {
            url: format!("https://github.com/devfort/semaphoreci4j/commit/{id}"),
            id,
            author_name: "Dev Fort".to_string(),
            author_email: "dev@devfort.example".to_string(),
            message: format!("Change number {seed}\n\nLonger description."),
            timestamp: None,
        }
    }

    // =========================================================================
    // Server and Deploy Fixtures
    // =========================================================================

    /// Create a manual deployment server with deploys numbered `1..=deploys`.
    pub fn server(id: u64, name: &str, deploys: u64) -> ServerFixture {
        ServerFixture {
            id,
            name: name.to_string(),
            deployment_method: Some("custom".to_string()),
            strategy: Some("manual".to_string()),
            branch_name: None,
            deploys: (1..=deploys)
                .map(|number| DeployFixture {
                    number,
                    result: "passed".to_string(),
                })
                .collect(),
        }
    }

    /// Create a webhook.
    pub fn webhook(id: u64, url: &str, hook_type: HookType) -> Webhook {
        Webhook {
            id,
            url: url.to_string(),
            hook_type,
        }
    }

    // =========================================================================
    // Scenario Fixtures
    // =========================================================================

    /// Create a complete test scenario.
    ///
    /// `semaphoreci4j` has a `develop` branch with 35 builds (two pages at
    /// the default page size, the last one pending), a `master` branch with
    /// 3 builds, a `production` server with 4 deploys (the last one pending)
    /// and one webhook.
    pub fn default_scenario() -> MockState {
        let mut develop = Self::branch(1, "develop", 35);
        if let Some(last) = develop.builds.last_mut() {
            last.result = "pending".to_string();
        }

        let mut production = Self::server(1, "production", 4);
        if let Some(last) = production.deploys.last_mut() {
            last.result = "pending".to_string();
        }

        let mut project = Self::minimal_project("project-hash-id", "semaphoreci4j");
        project.branches = vec![develop, Self::branch(2, "master", 3)];
        project.servers = vec![production];
        project.webhooks.insert(
            1,
            Self::webhook(1, "https://hooks.devfort.example/semaphore", HookType::PostBuild),
        );

        let mut other = Self::project_with_builds("other-hash-id", "devfort-site", "main", 2);
        other.id = 2;

        MockState::new().with_project(project).with_project(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_shape() {
        let state = Fixtures::default_scenario();

        let project = state.get_project("project-hash-id").unwrap();
        assert_eq!(project.name, "semaphoreci4j");
        assert_eq!(project.branches[0].builds.len(), 35);
        assert_eq!(project.branches[0].builds[34].result, "pending");
        assert_eq!(project.webhooks.len(), 1);
        assert_eq!(state.projects.len(), 2);
    }

    #[test]
    fn test_commit_ids_are_distinct() {
        assert_ne!(Fixtures::commit(1).id, Fixtures::commit(2).id);
        assert_eq!(Fixtures::commit(1).id.len(), 40);
    }
}
