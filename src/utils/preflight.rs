//! Preflight validation checks for early failure detection.
//!
//! Commands call these before any network traffic so missing credentials or
//! an unusable registry fail fast with a clear message.

use std::path::Path;

use anyhow::Result;

use crate::github::{GitHubError, DEFAULT_API_URL};
use crate::registry::{require_submodules, resolve_registry_path, RegistryError, SubmoduleRecord};
use crate::utils::settings::{get_env_var, get_env_vars};

/// Environment variables holding the GitHub token, in lookup order.
pub const GITHUB_TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Environment variable overriding the GitHub API root.
pub const GITHUB_API_URL_VAR: &str = "GITHUB_API_URL";

/// Returns the GitHub token or [`GitHubError::TokenNotFound`].
pub fn check_github_token() -> Result<String, GitHubError> {
    get_env_vars(&GITHUB_TOKEN_VARS).map_err(|_| GitHubError::TokenNotFound)
}

/// Returns the configured GitHub API root.
pub fn github_api_url() -> String {
    get_env_var(GITHUB_API_URL_VAR)
        .ok()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Resolves and loads the registry, failing if it is missing or has no records.
pub fn check_registry(explicit: Option<&Path>) -> Result<Vec<SubmoduleRecord>, RegistryError> {
    require_submodules(resolve_registry_path(explicit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn check_registry_distinguishes_missing_and_empty() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(".gitmodules");

        let missing = check_registry(Some(path.as_path())).unwrap_err();
        assert_eq!(missing.to_string(), ".gitmodules not found");

        std::fs::write(&path, "# no entries\n")?;
        let empty = check_registry(Some(path.as_path())).unwrap_err();
        assert_eq!(empty.to_string(), "no submodules found");

        std::fs::write(
            &path,
            "[submodule \"core\"]\n\tpath = core\n\turl = https://github.com/org/core\n",
        )?;
        assert_eq!(check_registry(Some(path.as_path()))?.len(), 1);
        Ok(())
    }

    #[test]
    fn token_error_message() {
        assert_eq!(
            GitHubError::TokenNotFound.to_string(),
            "GITHUB_TOKEN or GH_TOKEN must be set to call the GitHub API"
        );
    }
}
