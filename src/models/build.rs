//! Build model.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::error::Result;
use crate::lazy::Lazy;
use crate::models::commit::{BuildInformation, Commit};
use crate::models::replace_in_path;
use crate::models::thread::{BuildThread, ThreadLog};
use crate::pagination::fetch_merged;
use crate::traits::{Keyed, Merge, Refresh};
use crate::transport::{Method, Transport};

/// Scalar fields of a build, as sent by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    /// Build page on semaphoreci.com.
    #[serde(rename = "build_url")]
    pub url: String,
    /// API URL yielding the build's commits.
    #[serde(rename = "build_info_url")]
    pub info_url: String,
    /// API URL yielding the build's threads.
    #[serde(rename = "build_log_url")]
    pub log_url: String,
    /// Build number, unique within the branch.
    #[serde(rename = "build_number")]
    pub number: u64,
    /// Result (e.g. "passed", "failed", "stopped", "pending").
    pub result: String,
    /// When the build started.
    #[serde(default)]
    pub started_at: Option<DateTime<FixedOffset>>,
    /// When the build finished.
    #[serde(default)]
    pub finished_at: Option<DateTime<FixedOffset>>,
}

/// A branch build.
///
/// Commits and threads are fetched on first access and cached.
#[derive(Debug, Clone)]
pub struct Build {
    record: BuildRecord,
    transport: Transport,
    commits: Lazy<Collection<Commit>>,
    threads: Lazy<Collection<BuildThread>>,
}

impl Build {
    pub(crate) fn new(record: BuildRecord, transport: Transport) -> Self {
        Self {
            record,
            transport,
            commits: Lazy::new(),
            threads: Lazy::new(),
        }
    }

    /// Scalar fields of the build.
    pub fn record(&self) -> &BuildRecord {
        &self.record
    }

    /// Build number.
    pub fn number(&self) -> u64 {
        self.record.number
    }

    /// Build result.
    pub fn result(&self) -> &str {
        &self.record.result
    }

    /// Commits included in the build.
    ///
    /// # Errors
    ///
    /// Returns an error if the build information request fails.
    pub async fn commits(&mut self) -> Result<&Collection<Commit>> {
        let transport = &self.transport;
        let url = self.record.info_url.as_str();
        let commits = self
            .commits
            .get_or_fetch(move || fetch_commits(transport, url))
            .await?;
        Ok(&*commits)
    }

    /// Threads of the build, with their commands.
    ///
    /// # Errors
    ///
    /// Returns an error if the build log request fails.
    pub async fn threads(&mut self) -> Result<&Collection<BuildThread>> {
        let transport = &self.transport;
        let url = self.record.log_url.as_str();
        let threads = self
            .threads
            .get_or_fetch(move || fetch_threads(transport, url))
            .await?;
        Ok(&*threads)
    }

    /// Stop the build, then reload its commits and threads.
    ///
    /// # Errors
    ///
    /// Returns an error if the stop request or either reload fails.
    #[tracing::instrument(skip(self), fields(build = self.record.number))]
    pub async fn stop(&mut self) -> Result<()> {
        self.transport
            .execute(Method::Post, &self.stop_url(), None)
            .await?;
        self.refresh().await
    }

    /// URL that stops this build.
    pub fn stop_url(&self) -> String {
        replace_in_path(&self.record.log_url, "/log", "/stop")
    }
}

async fn fetch_commits(transport: &Transport, url: &str) -> Result<Collection<Commit>> {
    let info: BuildInformation = fetch_merged(transport, url).await?;
    Ok(info.commits.into_iter().collect())
}

pub(crate) async fn fetch_threads(
    transport: &Transport,
    url: &str,
) -> Result<Collection<BuildThread>> {
    let log: ThreadLog = fetch_merged(transport, url).await?;
    Ok(log.threads.into_iter().collect())
}

#[async_trait]
impl Refresh for Build {
    async fn refresh(&mut self) -> Result<()> {
        self.commits.invalidate();
        self.threads.invalidate();
        self.commits().await?;
        self.threads().await?;
        Ok(())
    }
}

impl Keyed for Build {
    type Key = u64;

    fn key(&self) -> u64 {
        self.record.number
    }
}

impl PartialEq for Build {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}

/// Branch history envelope (`branch_history_url`).
#[derive(Debug, Deserialize)]
pub(crate) struct BranchHistory {
    #[serde(default)]
    pub builds: Vec<BuildRecord>,
}

impl Merge for BranchHistory {
    fn merge(&mut self, next: Self) {
        self.builds.extend(next.builds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedConnection;

    fn record_json() -> serde_json::Value {
        serde_json::json!({
            "build_url": "https://semaphoreci.com/devfort/semaphoreci4j/branches/develop/builds/35",
            "build_info_url": "https://semaphoreci.com/api/v1/projects/project-hash-id/1428889/builds/35",
            "build_log_url": "https://semaphoreci.com/api/v1/projects/project-hash-id/1428889/builds/35/log",
            "build_number": 35,
            "result": "stopped",
            "started_at": "2017-12-27T16:16:49+01:00",
            "finished_at": "2017-12-27T16:18:01+01:00"
        })
    }

    #[test]
    fn test_record_round_trip() {
        let record: BuildRecord = serde_json::from_value(record_json()).unwrap();
        assert_eq!(record.number, 35);
        assert_eq!(serde_json::to_value(&record).unwrap(), record_json());
    }

    #[test]
    fn test_timestamp_formats() {
        let mut json = record_json();
        for stamp in [
            "2017-12-27T16:16:49+01:00",
            "2017-12-27T15:16:49Z",
            "2017-12-27T15:16:49.123Z",
            "2017-12-27T16:16:49.123456+01:00",
        ] {
            json["started_at"] = serde_json::Value::from(stamp);
            let record: BuildRecord = serde_json::from_value(json.clone()).unwrap();
            assert_eq!(serde_json::to_value(&record).unwrap()["started_at"], stamp);
        }

        // Fractions are written with 3, 6 or 9 digits; the instant is kept
        json["started_at"] = serde_json::Value::from("2017-12-27T15:17:05.50Z");
        let record: BuildRecord = serde_json::from_value(json).unwrap();
        let written = serde_json::to_value(&record).unwrap();
        assert_eq!(written["started_at"], "2017-12-27T15:17:05.500Z");
        let reread: BuildRecord = serde_json::from_value(written).unwrap();
        assert_eq!(reread.started_at, record.started_at);
    }

    #[test]
    fn test_pending_build_has_no_timestamps() {
        let mut json = record_json();
        json["started_at"] = serde_json::Value::Null;
        json["finished_at"] = serde_json::Value::Null;
        let record: BuildRecord = serde_json::from_value(json).unwrap();
        assert!(record.finished_at.is_none());
    }

    #[test]
    fn test_stop_url() {
        let record: BuildRecord = serde_json::from_value(record_json()).unwrap();
        let build = Build::new(record, Transport::new(ScriptedConnection::new(vec![])));
        assert_eq!(
            build.stop_url(),
            "https://semaphoreci.com/api/v1/projects/project-hash-id/1428889/builds/35/stop"
        );
    }

    #[test]
    fn test_equality_ignores_cache_state() {
        let record: BuildRecord = serde_json::from_value(record_json()).unwrap();
        let transport = Transport::new(ScriptedConnection::new(vec![]));
        let mut cached = Build::new(record.clone(), transport.clone());
        cached.threads = Lazy::populated(Collection::new());
        assert_eq!(cached, Build::new(record, transport));
    }
}
