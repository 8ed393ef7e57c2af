//! Analyze command: classifies one issue and prints a report.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing::debug;

use crate::classifier::Classifier;
use crate::github::{GitHubClient, Issue, IssueTracker};
use crate::report::{ErrorReport, IssueReport, OutputFormat};
use crate::utils::{check_github_token, check_registry, github_api_url, Settings};

/// Analyze command options.
#[derive(Parser)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["input_file", "issue"])
))]
pub struct AnalyzeCommand {
    /// Repository as owner/repo (required with --issue).
    #[arg(long, value_name = "OWNER/REPO", requires = "issue")]
    pub repo: Option<String>,

    /// Issue number to fetch from GitHub.
    #[arg(long, value_name = "NUMBER", requires = "repo")]
    pub issue: Option<u64>,

    /// Analyzes a local text file instead of calling the API.
    #[arg(long, value_name = "FILE", conflicts_with = "repo")]
    pub input_file: Option<PathBuf>,

    /// Label to attach to the local input (repeatable).
    #[arg(long = "label", value_name = "LABEL", requires = "input_file")]
    pub labels: Vec<String>,

    /// Includes evidence details in the output.
    #[arg(long)]
    pub print_evidence: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Path to the .gitmodules file (defaults to the repository root).
    #[arg(long, value_name = "FILE")]
    pub gitmodules: Option<PathBuf>,
}

impl AnalyzeCommand {
    /// Executes the analyze command.
    pub async fn execute(self) -> Result<()> {
        // A missing or empty registry is reported as a result, not a failure
        let records = match check_registry(self.gitmodules.as_deref()) {
            Ok(records) => records,
            Err(e) => {
                debug!(error = %e, "Registry unavailable");
                println!("{}", self.format.render(&ErrorReport::new(&e))?.trim_end());
                return Ok(());
            }
        };

        let settings = Settings::load()?;
        let issue = self.load_issue().await?;

        let result = Classifier::new(&records).classify(&issue.body, &issue.labels);
        let report = IssueReport::new(
            &issue,
            result,
            &settings.label_mapper(),
            self.print_evidence,
        );

        println!("{}", self.format.render(&report)?.trim_end());
        Ok(())
    }

    /// Reads the issue from the local file or the GitHub API.
    async fn load_issue(&self) -> Result<Issue> {
        if let Some(path) = &self.input_file {
            return read_local_issue(path, &self.labels);
        }

        let (Some(repo), Some(number)) = (&self.repo, self.issue) else {
            anyhow::bail!("Either --input-file or both --repo and --issue must be provided");
        };

        let token = check_github_token()?;
        let client = GitHubClient::with_base_url(repo, token, &github_api_url())?;
        client
            .get_issue(number)
            .await
            .with_context(|| format!("Failed to fetch issue #{number} from {repo}"))
    }
}

/// Builds an issue from a local file; the title is the file name.
fn read_local_issue(path: &Path, labels: &[String]) -> Result<Issue> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let title = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Issue {
        number: None,
        title,
        labels: labels.to_vec(),
        body,
    })
}
