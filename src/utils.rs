//! Utility functions and helpers.

pub mod preflight;
pub mod settings;

pub use preflight::{check_github_token, check_registry, github_api_url};
pub use settings::{get_env_var, get_env_vars, Settings};
