//! Deploy model.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::error::Result;
use crate::lazy::Lazy;
use crate::models::build::fetch_threads;
use crate::models::thread::BuildThread;
use crate::traits::{Keyed, Merge, Refresh};
use crate::transport::Transport;

/// Scalar fields of a deploy, as sent by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployRecord {
    /// Deploy number, unique within the server.
    pub number: u64,
    /// Result (e.g. "passed", "failed", "stopped", "pending").
    pub result: String,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub started_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<FixedOffset>>,
    /// Deploy page on semaphoreci.com.
    pub html_url: String,
    /// API URL of the deploy.
    #[serde(rename = "deploy_url")]
    pub url: String,
    /// API URL yielding the deploy's threads.
    #[serde(rename = "deploy_log_url")]
    pub log_url: String,
}

/// A deploy to a server.
#[derive(Debug, Clone)]
pub struct Deploy {
    record: DeployRecord,
    transport: Transport,
    threads: Lazy<Collection<BuildThread>>,
}

impl Deploy {
    pub(crate) fn new(record: DeployRecord, transport: Transport) -> Self {
        Self {
            record,
            transport,
            threads: Lazy::new(),
        }
    }

    /// Scalar fields of the deploy.
    pub fn record(&self) -> &DeployRecord {
        &self.record
    }

    /// Deploy number.
    pub fn number(&self) -> u64 {
        self.record.number
    }

    /// Deploy result.
    pub fn result(&self) -> &str {
        &self.record.result
    }

    /// Threads of the deploy, with their commands.
    ///
    /// # Errors
    ///
    /// Returns an error if the deploy log request fails.
    pub async fn threads(&mut self) -> Result<&Collection<BuildThread>> {
        let transport = &self.transport;
        let url = self.record.log_url.as_str();
        let threads = self
            .threads
            .get_or_fetch(move || fetch_threads(transport, url))
            .await?;
        Ok(&*threads)
    }

    /// URL that stops this deploy: the deploy URL without its query,
    /// followed by `/stop`.
    pub fn stop_url(&self) -> String {
        let base = self.record.url.split('?').next().unwrap_or_default();
        format!("{base}/stop")
    }
}

#[async_trait]
impl Refresh for Deploy {
    async fn refresh(&mut self) -> Result<()> {
        self.threads.invalidate();
        self.threads().await?;
        Ok(())
    }
}

impl Keyed for Deploy {
    type Key = u64;

    fn key(&self) -> u64 {
        self.record.number
    }
}

impl PartialEq for Deploy {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}

/// Server history envelope (`server_history_url`).
#[derive(Debug, Deserialize)]
pub(crate) struct ServerHistory {
    #[serde(default)]
    pub deploys: Vec<DeployRecord>,
}

impl Merge for ServerHistory {
    fn merge(&mut self, next: Self) {
        self.deploys.extend(next.deploys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedConnection;

    fn record_json() -> serde_json::Value {
        serde_json::json!({
            "number": 1,
            "result": "passed",
            "created_at": "2017-12-27T16:20:05+01:00",
            "updated_at": "2017-12-27T16:21:40+01:00",
            "started_at": "2017-12-27T16:20:12+01:00",
            "finished_at": "2017-12-27T16:21:40+01:00",
            "html_url": "https://semaphoreci.com/devfort/semaphoreci4j/servers/production/deploys/1",
            "deploy_url": "https://semaphoreci.com/api/v1/projects/project-hash-id/servers/2/deploys/1?auth_token=valid-token",
            "deploy_log_url": "https://semaphoreci.com/api/v1/projects/project-hash-id/servers/2/deploys/1/log?auth_token=valid-token"
        })
    }

    #[test]
    fn test_record_round_trip() {
        let record: DeployRecord = serde_json::from_value(record_json()).unwrap();
        assert_eq!(record.number, 1);
        assert_eq!(serde_json::to_value(&record).unwrap(), record_json());
    }

    #[test]
    fn test_stop_url_strips_query() {
        let record: DeployRecord = serde_json::from_value(record_json()).unwrap();
        let deploy = Deploy::new(record, Transport::new(ScriptedConnection::new(vec![])));
        assert_eq!(
            deploy.stop_url(),
            "https://semaphoreci.com/api/v1/projects/project-hash-id/servers/2/deploys/1/stop"
        );
    }

    #[test]
    fn test_history_merge() {
        let mut first: ServerHistory =
            serde_json::from_value(serde_json::json!({"deploys": [record_json()]})).unwrap();
        let second: ServerHistory = serde_json::from_value(serde_json::json!({})).unwrap();
        first.merge(second);
        assert_eq!(first.deploys.len(), 1);
    }
}
