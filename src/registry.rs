//! Submodule registry loading.
//!
//! The registry is the ordered list of sub-repositories declared by the
//! superproject. Parsing of the on-disk format lives in [`gitmodules`]; the
//! classifier only ever sees typed [`SubmoduleRecord`]s.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod gitmodules;

pub use gitmodules::parse_gitmodules;

/// File name of the registry inside a git worktree.
pub const GITMODULES_FILE: &str = ".gitmodules";

/// One sub-repository declared in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmoduleRecord {
    /// Declared section name, or the path when the header has none.
    pub name: String,
    /// Worktree-relative, slash-delimited location.
    pub path: String,
    /// Remote URL as declared (SSH or HTTPS form).
    pub url: String,
}

impl SubmoduleRecord {
    /// Creates a record whose name defaults to its path.
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: path.clone(),
            path,
            url: url.into(),
        }
    }

    /// Returns the lookup key: the lowercase last segment of the path.
    pub fn key(&self) -> String {
        last_segment(&self.path).to_lowercase()
    }

    /// Returns the last `/`-delimited segment of the path, original case.
    pub fn last_segment(&self) -> &str {
        last_segment(&self.path)
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Registry lookup failures reported to callers.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry source does not exist.
    #[error(".gitmodules not found")]
    NotFound(PathBuf),

    /// The registry source exists but declares no usable submodule.
    #[error("no submodules found")]
    Empty(PathBuf),

    /// The registry source could not be read.
    #[error("Failed to read registry {}: {source}", .path.display())]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Loads submodule records from a `.gitmodules` file.
///
/// A missing file yields an empty list rather than an error.
pub fn load_submodules<P: AsRef<Path>>(path: P) -> Result<Vec<SubmoduleRecord>, RegistryError> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "Registry file missing, using empty registry");
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).map_err(|source| RegistryError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_gitmodules(&content);
    debug!(
        path = %path.display(),
        count = records.len(),
        "Loaded submodule registry"
    );
    Ok(records)
}

/// Loads submodule records, failing when the source is missing or empty.
pub fn require_submodules<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<SubmoduleRecord>, RegistryError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RegistryError::NotFound(path.to_path_buf()));
    }

    let records = load_submodules(path)?;
    if records.is_empty() {
        return Err(RegistryError::Empty(path.to_path_buf()));
    }
    Ok(records)
}

/// Resolves the registry path to use.
///
/// Priority order:
/// 1. An explicit path
/// 2. `.gitmodules` at the root of the enclosing git worktree
/// 3. `.gitmodules` in the current directory
pub fn resolve_registry_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    match git2::Repository::discover(".") {
        Ok(repo) => match repo.workdir() {
            Some(workdir) => workdir.join(GITMODULES_FILE),
            None => PathBuf::from(GITMODULES_FILE),
        },
        Err(e) => {
            debug!(error = %e, "No enclosing git repository, using current directory");
            PathBuf::from(GITMODULES_FILE)
        }
    }
}
