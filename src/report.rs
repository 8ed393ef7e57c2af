//! Single-issue analysis output.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::classifier::{round_confidence, ClassificationResult, Evidence, LabelMapper};
use crate::github::Issue;

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on a single line.
    #[default]
    Json,
    /// YAML document.
    Yaml,
}

impl OutputFormat {
    /// Serializes a value in this format.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        match self {
            Self::Json => serde_json::to_string(value).context("Failed to serialize JSON output"),
            Self::Yaml => serde_yaml::to_string(value).context("Failed to serialize YAML output"),
        }
    }
}

/// Classification of one issue with mapped label suggestions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueReport {
    /// Issue title, or the file name for local input.
    pub title: String,
    /// Issue number, `null` for local input.
    pub number: Option<u64>,
    /// Labels the issue already carries.
    pub labels: Vec<String>,
    /// Key of the owning submodule.
    pub primary_submodule: Option<String>,
    /// Label suggested for the owning submodule.
    pub primary_label: Option<String>,
    /// Keys of other touched submodules.
    pub impacted_submodules: Vec<String>,
    /// Labels suggested for the other touched submodules.
    pub impacted_labels: Vec<String>,
    /// Confidence rounded to three decimals.
    pub confidence: f64,
    /// Matched raw strings, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

impl IssueReport {
    /// Builds the report for an issue from its classification.
    pub fn new(
        issue: &Issue,
        result: ClassificationResult,
        mapper: &LabelMapper,
        include_evidence: bool,
    ) -> Self {
        Self {
            title: issue.title.clone(),
            number: issue.number,
            labels: issue.labels.clone(),
            primary_label: result.primary.as_ref().map(|key| mapper.label(key)),
            impacted_labels: mapper.labels(&result.impacted),
            confidence: round_confidence(result.confidence),
            evidence: include_evidence.then_some(result.evidence),
            primary_submodule: result.primary,
            impacted_submodules: result.impacted,
        }
    }
}

/// Structured error emitted in place of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Error message.
    pub error: String,
}

impl ErrorReport {
    /// Creates an error report from any displayable error.
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
