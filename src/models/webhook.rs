//! Project webhook model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::traits::Keyed;

/// Events a webhook fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookType {
    /// After every build.
    PostBuild,
    /// After every deploy.
    PostDeploy,
    /// After builds and deploys.
    All,
}

impl HookType {
    /// Wire name of the hook type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostBuild => "post_build",
            Self::PostDeploy => "post_deploy",
            Self::All => "all",
        }
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post_build" => Ok(Self::PostBuild),
            "post_deploy" => Ok(Self::PostDeploy),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unknown hook type '{other}': expected post_build, post_deploy or all"
            )),
        }
    }
}

/// A webhook registered on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    /// Webhook ID.
    pub id: u64,
    /// Target URL.
    pub url: String,
    /// Events the hook fires on.
    pub hook_type: HookType,
}

impl Keyed for Webhook {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }
}

/// Request body for creating or updating a webhook.
#[derive(Debug, Serialize)]
pub(crate) struct WebhookParams<'a> {
    pub url: &'a str,
    pub hook_type: HookType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_round_trip() {
        let json = serde_json::json!({
            "id": 1,
            "url": "https://example.com/hook",
            "hook_type": "post_build"
        });
        let hook: Webhook = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(hook.hook_type, HookType::PostBuild);
        assert_eq!(serde_json::to_value(&hook).unwrap(), json);
    }

    #[test]
    fn test_hook_type_from_str() {
        assert_eq!("all".parse::<HookType>().unwrap(), HookType::All);
        assert_eq!(HookType::PostDeploy.to_string(), "post_deploy");
        assert!("nightly".parse::<HookType>().is_err());
    }

    #[test]
    fn test_params_serialize() {
        let params = WebhookParams {
            url: "http://www.yahoo.com",
            hook_type: HookType::All,
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({"url": "http://www.yahoo.com", "hook_type": "all"})
        );
    }
}
