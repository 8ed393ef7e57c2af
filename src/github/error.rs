//! GitHub-specific error handling.

use thiserror::Error;

/// GitHub API specific errors.
#[derive(Error, Debug)]
pub enum GitHubError {
    /// API token not found in environment variables or settings.
    #[error("GITHUB_TOKEN or GH_TOKEN must be set to call the GitHub API")]
    TokenNotFound,

    /// Repository argument is not of the form `owner/repo`.
    #[error("Invalid repository '{0}'. Expected owner/repo")]
    InvalidRepository(String),

    /// GitHub API answered with a non-success status.
    #[error("{method} {url} failed: HTTP {status} {body}")]
    RequestFailed {
        /// HTTP method of the request.
        method: String,
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Network connectivity error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid response format from GitHub API.
    #[error("Invalid response format from GitHub API: {0}")]
    InvalidResponseFormat(String),
}

impl GitHubError {
    /// Returns the HTTP status of a failed request, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
