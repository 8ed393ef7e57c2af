//! GitHub issue tracker access.
//!
//! The triage driver talks to the tracker only through [`IssueTracker`], so
//! tests can substitute an in-memory implementation for [`GitHubClient`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod client;
pub mod error;

#[cfg(test)]
pub(crate) mod test_utils;

pub use client::GitHubClient;
pub use error::GitHubError;

/// Default GitHub REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Issue data needed for classification and triage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number, absent for locally supplied text.
    pub number: Option<u64>,
    /// Issue title.
    pub title: String,
    /// Names of labels already applied, in tracker order.
    pub labels: Vec<String>,
    /// Issue body, empty when the tracker has none.
    pub body: String,
}

/// Issue state filter for listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum IssueState {
    /// Open issues only.
    #[default]
    Open,
    /// Closed issues only.
    Closed,
    /// Open and closed issues.
    All,
}

impl IssueState {
    /// Returns the API query value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueQuery {
    /// State filter.
    pub state: IssueState,
    /// Only issues updated at or after this ISO 8601 timestamp.
    pub since: Option<String>,
    /// Maximum number of issues to return.
    pub max: usize,
}

impl Default for IssueQuery {
    fn default() -> Self {
        Self {
            state: IssueState::Open,
            since: None,
            max: 500,
        }
    }
}

/// Label to create in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSpec {
    /// Label name.
    pub name: String,
    /// Hex color without `#`.
    pub color: String,
    /// Label description.
    pub description: String,
}

impl LabelSpec {
    /// Color used for labels created without an explicit one.
    pub const DEFAULT_COLOR: &'static str = "f9d0c4";

    /// Creates a label spec with the default color and no description.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Self::DEFAULT_COLOR.to_string(),
            description: String::new(),
        }
    }

    /// Creates a label spec with an explicit color and description.
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            description: description.into(),
        }
    }
}

/// Result of a label creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOutcome {
    /// The label was created.
    Created,
    /// The label already existed.
    AlreadyExists,
}

/// Repository identifier of the form `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl FromStr for RepoSlug {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(GitHubError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Boxed future returned by tracker operations.
pub type TrackerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Trait for issue tracker clients.
pub trait IssueTracker: Send + Sync {
    /// Lists issues, excluding pull requests.
    fn list_issues<'a>(&'a self, query: &'a IssueQuery) -> TrackerFuture<'a, Vec<Issue>>;

    /// Fetches one issue.
    fn get_issue(&self, number: u64) -> TrackerFuture<'_, Issue>;

    /// Creates a label; an existing label is not an error.
    fn create_label<'a>(&'a self, label: &'a LabelSpec) -> TrackerFuture<'a, LabelOutcome>;

    /// Adds labels to an issue.
    fn add_labels<'a>(&'a self, number: u64, labels: &'a [String]) -> TrackerFuture<'a, ()>;

    /// Posts a comment on an issue.
    fn add_comment<'a>(&'a self, number: u64, body: &'a str) -> TrackerFuture<'a, ()>;
}
