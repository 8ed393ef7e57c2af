//! # submodule-triage
//!
//! Routes issues to the submodules that own them.
//!
//! ## Features
//!
//! - Parses the `.gitmodules` registry into typed records
//! - Scores issue text and labels against every submodule
//! - Backfills `submodule:*` labels and triage comments on GitHub issues
//!
//! ## Quick Start
//!
//! ```rust
//! use submodule_triage::classifier::classify;
//! use submodule_triage::registry::SubmoduleRecord;
//!
//! let registry = vec![SubmoduleRecord::new(
//!     "modules/semantic-core",
//!     "https://github.com/org/semantic-core",
//! )];
//! let result = classify::<&str>("Relates to modules/semantic-core behavior.", &[], &registry);
//! assert_eq!(result.primary.as_deref(), Some("semantic-core"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod classifier;
pub mod cli;
pub mod github;
pub mod registry;
pub mod report;
pub mod triage;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of submodule-triage.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
