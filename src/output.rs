//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use chrono::{DateTime, FixedOffset};

use crate::{Build, Deploy, Project, Server, Webhook};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn timestamp(value: &DateTime<FixedOffset>) -> String {
    value.format("%Y-%m-%d %H:%M:%S %:z").to_string()
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let record = self.record();
        let header = format!("Project: {}/{}", record.owner, record.name);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Hash ID:        {}", record.hash_id),
            format!("Branches:       {}", self.branches().len()),
            format!("URL:            {}", record.html_url),
        ];

        if let Some(ref updated) = record.updated_at {
            lines.push(format!("Updated:        {}", timestamp(updated)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Build {
    fn pretty_print(&self) -> String {
        let record = self.record();
        let header = format!("Build #{}", record.number);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Result:         {}", record.result),
        ];

        if let Some(ref started) = record.started_at {
            lines.push(format!("Started:        {}", timestamp(started)));
        }

        if let Some(ref finished) = record.finished_at {
            lines.push(format!("Finished:       {}", timestamp(finished)));
        }

        lines.push(format!("URL:            {}", record.url));

        lines.join("\n")
    }
}

impl PrettyPrint for Deploy {
    fn pretty_print(&self) -> String {
        let record = self.record();
        let header = format!("Deploy #{}", record.number);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Result:         {}", record.result),
        ];

        if let Some(ref started) = record.started_at {
            lines.push(format!("Started:        {}", timestamp(started)));
        }

        if let Some(ref finished) = record.finished_at {
            lines.push(format!("Finished:       {}", timestamp(finished)));
        }

        lines.push(format!("URL:            {}", record.html_url));

        lines.join("\n")
    }
}

impl PrettyPrint for Server {
    fn pretty_print(&self) -> String {
        let record = self.record();
        let header = format!("Server: {}", record.name);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider];

        if let Some(ref method) = record.deployment_method {
            lines.push(format!("Method:         {}", method));
        }

        if let Some(ref strategy) = record.strategy {
            lines.push(format!("Strategy:       {}", strategy));
        }

        if let Some(ref branch) = record.branch_name {
            lines.push(format!("Branch:         {}", branch));
        }

        lines.push(format!("URL:            {}", record.url));

        lines.join("\n")
    }
}

impl PrettyPrint for Webhook {
    fn pretty_print(&self) -> String {
        let header = format!("Webhook #{}", self.id);
        let divider = "─".repeat(header.len().max(30));

        [
            header,
            divider,
            format!("Type:           {}", self.hook_type),
            format!("URL:            {}", self.url),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HookType;

    #[test]
    fn test_webhook_pretty_print_format() {
        let hook = Webhook {
            id: 42,
            url: "https://example.com/hook".to_string(),
            hook_type: HookType::PostDeploy,
        };

        let output = hook.pretty_print();
        assert!(output.starts_with("Webhook #42"));
        assert!(output.contains("Type:           post_deploy"));
        assert!(output.contains("https://example.com/hook"));
    }

    #[test]
    fn test_timestamp_keeps_offset() {
        let value = DateTime::parse_from_rfc3339("2014-07-25T14:48:10+02:00").unwrap();
        assert_eq!(timestamp(&value), "2014-07-25 14:48:10 +02:00");
    }
}
