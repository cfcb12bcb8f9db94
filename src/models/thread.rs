//! Build thread and command models.
//!
//! Threads come back whole from a build or deploy log: their commands are
//! part of the same response and never fetched separately.

use serde::{Deserialize, Deserializer, Serialize};

use crate::traits::{Keyed, Merge};

/// One command executed in a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// The command line.
    pub name: String,
    /// Exit code. The API sends it as a string; numbers are accepted too.
    #[serde(deserialize_with = "result_code")]
    pub result: i32,
    /// Captured output.
    #[serde(default)]
    pub output: String,
    /// When the command started.
    #[serde(default)]
    pub start_time: Option<String>,
    /// When the command finished.
    #[serde(default)]
    pub finish_time: Option<String>,
    /// Wall-clock duration as reported by the API (e.g. "00:02").
    #[serde(default)]
    pub duration: Option<String>,
}

impl Command {
    /// Returns true if the command exited with status 0.
    pub fn succeeded(&self) -> bool {
        self.result == 0
    }
}

fn result_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Number(i32),
        Text(String),
    }

    match Code::deserialize(deserializer)? {
        Code::Number(n) => Ok(n),
        Code::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// A thread of a build or deploy, with its commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildThread {
    /// Thread number within its build or deploy.
    pub number: u32,
    /// Commands in execution order.
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl BuildThread {
    /// Returns true if every command succeeded.
    pub fn succeeded(&self) -> bool {
        self.commands.iter().all(Command::succeeded)
    }
}

impl Keyed for BuildThread {
    type Key = u32;

    fn key(&self) -> u32 {
        self.number
    }
}

/// Log envelope shared by builds and deploys (`*_log_url`).
#[derive(Debug, Deserialize)]
pub(crate) struct ThreadLog {
    #[serde(default)]
    pub threads: Vec<BuildThread>,
}

impl Merge for ThreadLog {
    fn merge(&mut self, next: Self) {
        self.threads.extend(next.threads);
    }
}
