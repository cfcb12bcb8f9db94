//! Basic example demonstrating the Semaphore API client.
//!
//! Run with:
//! ```
//! SEMAPHORE_API_TOKEN=your-token cargo run --example basic
//! ```

use semaphoreapi::{Semaphore, SemaphoreClient};

#[tokio::main]
async fn main() -> semaphoreapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Semaphore client...");
    let client = SemaphoreClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    let mut semaphore = Semaphore::connect(client).await?;

    // List projects with their branches
    println!("\n--- Listing Projects ---");
    let names: Vec<String> = semaphore.projects().await?.keys().cloned().collect();
    println!("Found {} projects", names.len());

    for project in semaphore.projects().await?.iter() {
        println!(
            "  - {} ({} branches)",
            project.name(),
            project.branches().len()
        );
    }

    // Walk the first project
    let Some(first) = names.first() else {
        println!("\nDone!");
        return Ok(());
    };
    let Some(project) = semaphore.project(first).await? else {
        return Ok(());
    };

    println!("\n--- Branches of {} ---", project.name());
    let branch_names: Vec<String> = project.branches().keys().cloned().collect();
    for name in &branch_names {
        let Some(branch) = project.branch_mut(name) else {
            continue;
        };
        let builds = branch.builds().await?;
        let latest = builds
            .last()
            .map(|b| format!("#{} {}", b.number(), b.result()))
            .unwrap_or_else(|| "no builds".to_string());
        println!("  - {} ({} builds, latest {})", name, builds.len(), latest);
    }

    // Commits and threads of the latest build on the first branch
    let first_branch = branch_names.first().cloned().unwrap_or_default();
    if let Some(branch) = project.branch_mut(&first_branch) {
        if let Some(build) = branch.status().await? {
            println!("\n--- Build #{} ---", build.number());
            for commit in build.commits().await?.iter() {
                let short = &commit.id[..commit.id.len().min(10)];
                println!("  {} {}", short, commit.summary());
            }
            for thread in build.threads().await?.iter() {
                let status = if thread.succeeded() { "ok" } else { "failed" };
                println!(
                    "  thread {}: {} commands, {}",
                    thread.number,
                    thread.commands.len(),
                    status
                );
            }
        }
    }

    // Servers and their latest deploy
    println!("\n--- Servers ---");
    let server_names: Vec<String> = project
        .servers()
        .await?
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    for name in &server_names {
        if let Some(server) = project.server(name).await? {
            let latest = server
                .status()
                .await?
                .map(|d| format!("#{} {}", d.number(), d.result()))
                .unwrap_or_else(|| "never deployed".to_string());
            println!("  - {} (latest {})", name, latest);
        }
    }

    // Webhooks
    println!("\n--- Webhooks ---");
    for hook in project.webhooks().await?.iter() {
        println!("  - #{} {} -> {}", hook.id, hook.hook_type, hook.url);
    }

    println!("\nDone!");
    Ok(())
}
