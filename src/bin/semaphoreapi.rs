//! Semaphore CI API CLI binary.
//!
//! A command-line interface for navigating and driving Semaphore CI.

use clap::Parser;
use semaphoreapi::cli::{Cli, Command as CliCommand};
use semaphoreapi::output::PrettyPrint;
use semaphoreapi::{
    Branch, Build, Collection, Commit, Deploy, Keyed, Project, Semaphore, SemaphoreClient,
    SemaphoreError, Server, Webhook,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match SemaphoreClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set SEMAPHORE_API_TOKEN environment variable");
            return ExitCode::FAILURE;
        }
    };

    let mut semaphore = Semaphore::new(client);

    match run(&mut semaphore, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(semaphore: &mut Semaphore, cli: Cli) -> semaphoreapi::Result<()> {
    let json = cli.json;

    match cli.command {
        CliCommand::Projects => {
            let projects = semaphore.projects().await?;
            output_records(projects, json, |p| p.record(), ProjectRow::from)?;
        }
        CliCommand::Branches { project } => {
            let project = find_project(semaphore, &project).await?;
            output_records(project.branches(), json, |b| b.record(), BranchRow::from)?;
        }
        CliCommand::Builds { project, branch } => {
            let project = find_project(semaphore, &project).await?;
            let branch = find_branch(project, &branch)?;
            let builds = branch.builds().await?;
            output_records(builds, json, |b| b.record(), BuildRow::from)?;
        }
        CliCommand::Commits {
            project,
            branch,
            number,
        } => {
            let project = find_project(semaphore, &project).await?;
            let branch = find_branch(project, &branch)?;
            let build = find_build(branch, number).await?;
            let commits = build.commits().await?;
            output_records(commits, json, |c| c, CommitRow::from)?;
        }
        CliCommand::Servers { project } => {
            let project = find_project(semaphore, &project).await?;
            let servers = project.servers().await?;
            output_records(servers, json, |s| s.record(), ServerRow::from)?;
        }
        CliCommand::Deploys { project, server } => {
            let project = find_project(semaphore, &project).await?;
            let server = find_server(project, &server).await?;
            let deploys = server.deploys().await?;
            output_records(deploys, json, |d| d.record(), DeployRow::from)?;
        }
        CliCommand::Webhooks { project } => {
            let project = find_project(semaphore, &project).await?;
            let webhooks = project.webhooks().await?;
            output_records(webhooks, json, |w| w, WebhookRow::from)?;
        }
        CliCommand::Rebuild { project, branch } => {
            let project = find_project(semaphore, &project).await?;
            let branch = find_branch(project, &branch)?;
            branch.rebuild_last_revision().await?;
            match branch.status().await? {
                Some(build) => output_single(&*build, build.record(), json)?,
                None => eprintln!("Rebuild requested; branch has no builds yet"),
            }
        }
        CliCommand::StopBuild {
            project,
            branch,
            number,
        } => {
            let project = find_project(semaphore, &project).await?;
            let branch = find_branch(project, &branch)?;
            let build = find_build(branch, number).await?;
            build.stop().await?;
            output_single(&*build, build.record(), json)?;
        }
        CliCommand::StopDeploy {
            project,
            server,
            number,
        } => {
            let project = find_project(semaphore, &project).await?;
            let server = find_server(project, &server).await?;
            let deploy = server
                .deploy(number)
                .await?
                .cloned()
                .ok_or_else(|| SemaphoreError::entity_not_found("deploy", number))?;
            if let Some(stopped) = server.stop_deploy(&deploy).await? {
                output_single(&stopped, stopped.record(), json)?;
            }
        }
        CliCommand::CreateWebhook {
            project,
            url,
            hook_type,
        } => {
            let project = find_project(semaphore, &project).await?;
            let hook = project.create_webhook(&url, hook_type).await?;
            output_single(&hook, &hook, json)?;
        }
        CliCommand::DeleteWebhook { project, id } => {
            let project = find_project(semaphore, &project).await?;
            let hook = project
                .webhook(id)
                .await?
                .cloned()
                .ok_or_else(|| SemaphoreError::entity_not_found("webhook", id))?;
            if project.delete_webhook(&hook).await? {
                eprintln!("Deleted webhook #{id}");
            }
        }
    }
    Ok(())
}

async fn find_project<'a>(
    semaphore: &'a mut Semaphore,
    name: &str,
) -> semaphoreapi::Result<&'a mut Project> {
    semaphore
        .project(name)
        .await?
        .ok_or_else(|| SemaphoreError::entity_not_found("project", name))
}

fn find_branch<'a>(project: &'a mut Project, name: &str) -> semaphoreapi::Result<&'a mut Branch> {
    project
        .branch_mut(name)
        .ok_or_else(|| SemaphoreError::entity_not_found("branch", name))
}

async fn find_build(branch: &mut Branch, number: u64) -> semaphoreapi::Result<&mut Build> {
    branch
        .build(number)
        .await?
        .ok_or_else(|| SemaphoreError::entity_not_found("build", number))
}

async fn find_server<'a>(
    project: &'a mut Project,
    name: &str,
) -> semaphoreapi::Result<&'a mut Server> {
    project
        .server(name)
        .await?
        .ok_or_else(|| SemaphoreError::entity_not_found("server", name))
}

fn output_single<T: PrettyPrint, S: Serialize>(
    item: &T,
    record: &S,
    json: bool,
) -> semaphoreapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_records<'a, T, S, R, F, G>(
    items: &'a Collection<T>,
    json: bool,
    to_record: F,
    to_row: G,
) -> semaphoreapi::Result<()>
where
    T: Keyed + 'a,
    S: Serialize + ?Sized + 'a,
    R: Tabled,
    F: Fn(&'a T) -> &'a S,
    G: Fn(&'a T) -> R,
{
    if json {
        let records: Vec<&S> = items.iter().map(to_record).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} total", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ProjectRow {
    name: String,
    owner: String,
    branches: usize,
    hash_id: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            name: p.name().to_string(),
            owner: p.record().owner.clone(),
            branches: p.branches().len(),
            hash_id: p.hash_id().to_string(),
        }
    }
}

#[derive(Tabled)]
struct BranchRow {
    name: String,
    url: String,
}

impl From<&Branch> for BranchRow {
    fn from(b: &Branch) -> Self {
        Self {
            name: b.name().to_string(),
            url: b.record().url.clone(),
        }
    }
}

#[derive(Tabled)]
struct BuildRow {
    number: u64,
    result: String,
    started: String,
}

impl From<&Build> for BuildRow {
    fn from(b: &Build) -> Self {
        Self {
            number: b.number(),
            result: b.result().to_string(),
            started: b
                .record()
                .started_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct CommitRow {
    id: String,
    author: String,
    message: String,
}

impl From<&Commit> for CommitRow {
    fn from(c: &Commit) -> Self {
        Self {
            id: c.id.chars().take(10).collect(),
            author: c.author_name.clone(),
            message: c.summary().to_string(),
        }
    }
}

#[derive(Tabled)]
struct ServerRow {
    name: String,
    method: String,
    strategy: String,
}

impl From<&Server> for ServerRow {
    fn from(s: &Server) -> Self {
        let record = s.record();
        Self {
            name: record.name.clone(),
            method: record.deployment_method.clone().unwrap_or_default(),
            strategy: record.strategy.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct DeployRow {
    number: u64,
    result: String,
    finished: String,
}

impl From<&Deploy> for DeployRow {
    fn from(d: &Deploy) -> Self {
        Self {
            number: d.number(),
            result: d.result().to_string(),
            finished: d
                .record()
                .finished_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct WebhookRow {
    id: u64,
    #[tabled(rename = "type")]
    hook_type: String,
    url: String,
}

impl From<&Webhook> for WebhookRow {
    fn from(w: &Webhook) -> Self {
        Self {
            id: w.id,
            hook_type: w.hook_type.to_string(),
            url: w.url.clone(),
        }
    }
}
