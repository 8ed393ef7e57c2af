//! CLI interface for submodule-triage.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod analyze;
mod registry;
mod triage;

pub use analyze::AnalyzeCommand;
pub use registry::RegistryCommand;
pub use triage::TriageCommand;

/// submodule-triage: routes issues to the submodules that own them.
#[derive(Parser)]
#[command(name = "submodule-triage")]
#[command(
    about = "Classifies issues by owning submodule and applies triage labels",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Classifies a single issue or local text file.
    Analyze(AnalyzeCommand),
    /// Labels and comments on existing issues in bulk.
    Triage(TriageCommand),
    /// Lists the submodule registry with keys and labels.
    Registry(RegistryCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze(analyze_cmd) => analyze_cmd.execute().await,
            Commands::Triage(triage_cmd) => triage_cmd.execute().await,
            Commands::Registry(registry_cmd) => registry_cmd.execute(),
        }
    }
}
