//! GitHub REST API client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::{
    GitHubError, Issue, IssueQuery, IssueTracker, LabelOutcome, LabelSpec, RepoSlug,
    TrackerFuture, DEFAULT_API_URL,
};

/// HTTP timeout for GitHub API requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Issues fetched per page when listing.
const PAGE_SIZE: usize = 100;

/// GitHub API version header value.
const API_VERSION: &str = "2022-11-28";

/// User agent sent with every request.
const USER_AGENT: &str = "submodule-triage";

/// Issue as returned by the GitHub API.
#[derive(Deserialize)]
struct WireIssue {
    number: Option<u64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    labels: Vec<WireLabel>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

/// Label entry of an issue; the API may return objects or bare names.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireLabel {
    Object {
        #[serde(default)]
        name: String,
    },
    Name(String),
}

impl From<WireIssue> for Issue {
    fn from(wire: WireIssue) -> Self {
        Self {
            number: wire.number,
            title: wire.title.unwrap_or_default(),
            labels: wire
                .labels
                .into_iter()
                .map(|label| match label {
                    WireLabel::Object { name } | WireLabel::Name(name) => name,
                })
                .collect(),
            body: wire.body.unwrap_or_default(),
        }
    }
}

/// Request body for adding labels.
#[derive(Serialize)]
struct AddLabelsRequest<'a> {
    labels: &'a [String],
}

/// Request body for posting a comment.
#[derive(Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

/// GitHub REST API client bound to one repository.
pub struct GitHubClient {
    /// HTTP client for API requests.
    client: Client,
    /// API root, e.g. `https://api.github.com`.
    base_url: Url,
    /// Target repository.
    repo: RepoSlug,
    /// Bearer token for authentication.
    token: String,
}

impl GitHubClient {
    /// Creates a client against the public GitHub API.
    pub fn new(repo: &str, token: String) -> Result<Self> {
        Self::with_base_url(repo, token, DEFAULT_API_URL)
    }

    /// Creates a client against a custom API root.
    pub fn with_base_url(repo: &str, token: String, base_url: &str) -> Result<Self> {
        let repo: RepoSlug = repo.parse()?;
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid GitHub API URL: {base_url}"))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            repo,
            token,
        })
    }

    /// Returns the repository this client targets.
    pub fn repo(&self) -> &RepoSlug {
        &self.repo
    }

    /// Builds `<base>/repos/<owner>/<repo>/<segments...>`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("GitHub API URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(["repos", self.repo.owner.as_str(), self.repo.name.as_str()])
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Sends a request and returns the response when its status is a success.
    async fn send(
        &self,
        method: Method,
        url: Url,
        builder: RequestBuilder,
    ) -> Result<reqwest::Response, GitHubError> {
        let response = builder
            .send()
            .await
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|e| {
                debug!("Failed to read error response body: {e}");
                String::new()
            });
            return Err(GitHubError::RequestFailed {
                method: method.as_str().to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(url = %url, "GET");
        let builder = self.request(Method::GET, url.clone());
        let response = self.send(Method::GET, url, builder).await?;
        let value = response
            .json()
            .await
            .map_err(|e| GitHubError::InvalidResponseFormat(e.to_string()))?;
        Ok(value)
    }

    async fn post_json<B: Serialize + Sync>(&self, url: Url, body: &B) -> Result<(), GitHubError> {
        debug!(url = %url, "POST");
        let builder = self.request(Method::POST, url.clone()).json(body);
        self.send(Method::POST, url, builder).await?;
        Ok(())
    }

    async fn fetch_issues(&self, query: &IssueQuery) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        if query.max == 0 {
            return Ok(issues);
        }

        let mut page = 1_usize;
        loop {
            let mut url = self.endpoint(&["issues"])?;
            {
                let mut pairs = url.query_pairs_mut();
                pairs
                    .append_pair("state", query.state.as_str())
                    .append_pair("per_page", &PAGE_SIZE.to_string())
                    .append_pair("page", &page.to_string());
                if let Some(since) = &query.since {
                    pairs.append_pair("since", since);
                }
            }

            let batch: Vec<WireIssue> = self.get_json(url).await?;
            if batch.is_empty() {
                break;
            }
            debug!(page, count = batch.len(), "Fetched issue page");

            for wire in batch {
                if wire.pull_request.is_some() {
                    continue;
                }
                issues.push(Issue::from(wire));
                if issues.len() >= query.max {
                    info!(count = issues.len(), "Reached issue limit");
                    return Ok(issues);
                }
            }
            page += 1;
        }

        info!(count = issues.len(), repo = %self.repo, "Listed issues");
        Ok(issues)
    }
}

impl IssueTracker for GitHubClient {
    fn list_issues<'a>(&'a self, query: &'a IssueQuery) -> TrackerFuture<'a, Vec<Issue>> {
        Box::pin(self.fetch_issues(query))
    }

    fn get_issue(&self, number: u64) -> TrackerFuture<'_, Issue> {
        Box::pin(async move {
            let url = self.endpoint(&["issues", &number.to_string()])?;
            let wire: WireIssue = self.get_json(url).await?;
            Ok(Issue::from(wire))
        })
    }

    fn create_label<'a>(&'a self, label: &'a LabelSpec) -> TrackerFuture<'a, LabelOutcome> {
        Box::pin(async move {
            let url = self.endpoint(&["labels"])?;
            match self.post_json(url, label).await {
                Ok(()) => {
                    info!(label = %label.name, "Created label");
                    Ok(LabelOutcome::Created)
                }
                Err(e) if e.status() == Some(StatusCode::UNPROCESSABLE_ENTITY.as_u16()) => {
                    debug!(label = %label.name, "Label already exists");
                    Ok(LabelOutcome::AlreadyExists)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    fn add_labels<'a>(&'a self, number: u64, labels: &'a [String]) -> TrackerFuture<'a, ()> {
        Box::pin(async move {
            let url = self.endpoint(&["issues", &number.to_string(), "labels"])?;
            self.post_json(url, &AddLabelsRequest { labels }).await?;
            info!(issue = number, ?labels, "Added labels");
            Ok(())
        })
    }

    fn add_comment<'a>(&'a self, number: u64, body: &'a str) -> TrackerFuture<'a, ()> {
        Box::pin(async move {
            let url = self.endpoint(&["issues", &number.to_string(), "comments"])?;
            self.post_json(url, &CommentRequest { body }).await?;
            info!(issue = number, "Posted comment");
            Ok(())
        })
    }
}
