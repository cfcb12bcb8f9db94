//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the semaphoreapi binary.

use clap::{Parser, Subcommand};

use crate::HookType;

/// Semaphore CI command-line interface.
#[derive(Parser, Debug)]
#[command(name = "semaphoreapi", about = "Semaphore CI API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the projects of the account.
    Projects,

    /// List the branches of a project.
    Branches {
        /// Project name.
        project: String,
    },

    /// List the builds of a branch.
    Builds {
        /// Project name.
        project: String,
        /// Branch name.
        branch: String,
    },

    /// List the commits of a build.
    Commits {
        /// Project name.
        project: String,
        /// Branch name.
        branch: String,
        /// Build number.
        number: u64,
    },

    /// List the deployment servers of a project.
    Servers {
        /// Project name.
        project: String,
    },

    /// List the deploys of a server.
    Deploys {
        /// Project name.
        project: String,
        /// Server name.
        server: String,
    },

    /// List the webhooks of a project.
    Webhooks {
        /// Project name.
        project: String,
    },

    /// Rebuild the last revision of a branch.
    Rebuild {
        /// Project name.
        project: String,
        /// Branch name.
        branch: String,
    },

    /// Stop a running build.
    StopBuild {
        /// Project name.
        project: String,
        /// Branch name.
        branch: String,
        /// Build number.
        number: u64,
    },

    /// Stop a running deploy.
    StopDeploy {
        /// Project name.
        project: String,
        /// Server name.
        server: String,
        /// Deploy number.
        number: u64,
    },

    /// Register a webhook on a project.
    CreateWebhook {
        /// Project name.
        project: String,
        /// Target URL.
        url: String,
        /// Events the hook fires on (post_build, post_deploy or all).
        #[arg(long = "type", default_value = "post_build")]
        hook_type: HookType,
    },

    /// Remove a webhook from a project.
    DeleteWebhook {
        /// Project name.
        project: String,
        /// Webhook ID.
        id: u64,
    },
}
