//! Settings and configuration utilities.
//!
//! This module reads settings from $HOME/.submodule-triage/settings.json and
//! uses them as a fallback for environment variables.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::classifier::LabelMapper;

/// Settings loaded from $HOME/.submodule-triage/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Extra registry key to label alias entries.
    #[serde(default)]
    pub label_aliases: BTreeMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".submodule-triage").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) => Some(value),
            Err(_) => self.env.get(key).cloned(),
        }
    }

    /// Returns the label mapper with the configured aliases applied.
    pub fn label_mapper(&self) -> LabelMapper {
        LabelMapper::with_aliases(
            self.label_aliases
                .iter()
                .map(|(key, alias)| (key.as_str(), alias.as_str())),
        )
    }
}

/// Returns an environment variable with fallback to settings.
pub fn get_env_var(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(_) => match Settings::load() {
            Ok(settings) => settings
                .env
                .get(key)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Environment variable not found: {key}")),
            // Report the lookup failure, keeping the settings error as cause
            Err(err) => Err(anyhow::anyhow!("Environment variable not found: {key}").context(err)),
        },
    }
}

/// Tries multiple environment variables with fallback to settings.
///
/// Empty values count as unset.
pub fn get_env_vars(keys: &[&str]) -> Result<String> {
    keys.iter()
        .filter_map(|key| get_env_var(key).ok())
        .find(|value| !value.is_empty())
        .ok_or_else(|| anyhow::anyhow!("None of the environment variables found: {keys:?}"))
}
