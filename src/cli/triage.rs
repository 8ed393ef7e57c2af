//! Triage command: backfills submodule labels across existing issues.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use clap::Parser;
use tracing::info;

use crate::classifier::Classifier;
use crate::github::{GitHubClient, IssueQuery, IssueState, IssueTracker};
use crate::triage::{TriageDriver, TriagePlan};
use crate::utils::{check_github_token, check_registry, github_api_url, Settings};

/// Parses a `--since` value into an ISO 8601 UTC timestamp.
///
/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub(crate) fn parse_since(s: &str) -> Result<String> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(format!("{date}T00:00:00Z"));
    }

    let timestamp = DateTime::parse_from_rfc3339(s).map_err(|_| {
        anyhow::anyhow!("Invalid --since value '{s}'. Expected YYYY-MM-DD or an RFC 3339 timestamp")
    })?;
    Ok(timestamp
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Triage command options.
#[derive(Parser)]
pub struct TriageCommand {
    /// Repository as owner/repo.
    #[arg(long, value_name = "OWNER/REPO")]
    pub repo: String,

    /// Issue state to scan.
    #[arg(long, value_enum, default_value_t = IssueState::Open)]
    pub state: IssueState,

    /// Maximum number of issues to process.
    #[arg(long, default_value_t = 500)]
    pub max: usize,

    /// Only issues updated since this date (e.g. 2025-01-01 or 2025-01-01T00:00:00Z).
    #[arg(long, value_name = "DATE", value_parser = parse_since)]
    pub since: Option<String>,

    /// Only prints planned actions without applying changes.
    #[arg(long)]
    pub dry_run: bool,

    /// Path to the .gitmodules file (defaults to the repository root).
    #[arg(long, value_name = "FILE")]
    pub gitmodules: Option<PathBuf>,
}

impl TriageCommand {
    /// Executes the triage command.
    pub async fn execute(self) -> Result<()> {
        let token = check_github_token()?;
        let records = check_registry(self.gitmodules.as_deref())
            .context("Cannot triage without a submodule registry")?;
        let mapper = Settings::load()?.label_mapper();

        let client = GitHubClient::with_base_url(&self.repo, token, &github_api_url())?;
        let query = IssueQuery {
            state: self.state,
            since: self.since.clone(),
            max: self.max,
        };
        let issues = client
            .list_issues(&query)
            .await
            .with_context(|| format!("Failed to list issues for {}", self.repo))?;
        println!("Found {} issues to analyze", issues.len());

        let classifier = Classifier::new(&records);
        let mut driver = TriageDriver::new(&client, &classifier, &mapper).dry_run(self.dry_run);
        driver.ensure_registry_labels(&records).await;
        let summary = driver.run(&issues, print_plan).await;

        info!(
            skipped = summary.skipped,
            planned = summary.planned,
            "Triage complete"
        );
        println!(
            "Applied triage to {} issues (state={}, dry_run={})",
            summary.labeled, self.state, self.dry_run
        );

        if !summary.failed.is_empty() {
            for failure in &summary.failed {
                eprintln!("Issue #{}: {}", failure.number, failure.error);
            }
            anyhow::bail!("Triage failed for {} issue(s)", summary.failed.len());
        }
        Ok(())
    }
}

/// Prints the planned labels and comment for one issue.
fn print_plan(plan: &TriagePlan) {
    println!("{}", format_plan(plan));
}

/// Formats a plan; labels are listed sorted and comma-separated.
fn format_plan(plan: &TriagePlan) -> String {
    format!(
        "Issue #{}: {}\n  + Labels: {}\n  + Comment: {}",
        plan.number,
        plan.title,
        plan.desired_labels.join(", "),
        plan.comment
    )
}
