//! Commit model.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::traits::{Keyed, Merge};

/// A commit included in a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit SHA.
    pub id: String,
    /// Commit URL on the git host.
    pub url: String,
    /// Author name.
    pub author_name: String,
    /// Author email.
    pub author_email: String,
    /// Commit message.
    pub message: String,
    /// Commit timestamp.
    #[serde(default)]
    pub timestamp: Option<DateTime<FixedOffset>>,
}

impl Commit {
    /// First line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

impl Keyed for Commit {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Build information envelope (`build_info_url`).
#[derive(Debug, Deserialize)]
pub(crate) struct BuildInformation {
    #[serde(default)]
    pub commits: Vec<Commit>,
}

impl Merge for BuildInformation {
    fn merge(&mut self, next: Self) {
        self.commits.extend(next.commits);
    }
}
