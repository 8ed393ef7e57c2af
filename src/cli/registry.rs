//! Registry command: shows how each submodule is keyed and labeled.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use crate::classifier::{canonical_url, LabelMapper};
use crate::registry::SubmoduleRecord;
use crate::report::OutputFormat;
use crate::utils::{check_registry, Settings};

/// Registry command options.
#[derive(Parser)]
pub struct RegistryCommand {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Path to the .gitmodules file (defaults to the repository root).
    #[arg(long, value_name = "FILE")]
    pub gitmodules: Option<PathBuf>,
}

/// One registry record as the classifier sees it.
#[derive(Debug, Serialize)]
struct RegistryEntry {
    key: String,
    path: String,
    url: String,
    canonical_url: String,
    label: String,
}

impl RegistryEntry {
    fn new(record: &SubmoduleRecord, mapper: &LabelMapper) -> Self {
        let key = record.key();
        Self {
            label: mapper.label(&key),
            canonical_url: canonical_url(&record.url),
            key,
            path: record.path.clone(),
            url: record.url.clone(),
        }
    }
}

impl RegistryCommand {
    /// Executes the registry command.
    pub fn execute(self) -> Result<()> {
        let records = check_registry(self.gitmodules.as_deref())?;
        let mapper = Settings::load()?.label_mapper();

        let entries: Vec<RegistryEntry> = records
            .iter()
            .map(|record| RegistryEntry::new(record, &mapper))
            .collect();
        println!("{}", self.format.render(&entries)?.trim_end());
        Ok(())
    }
}
