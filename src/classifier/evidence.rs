//! Explicit ownership hints found in issue labels and templates.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static LABEL_HINT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^submodule:([a-z0-9._\-]+)").unwrap());

/// Line prefix of the issue-template field naming a submodule path.
const TEMPLATE_FIELD_PREFIX: &str = "submodule path";

/// Matched raw strings that justified a classification, by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Raw labels of the form `submodule:<slug>`.
    pub labels: Vec<String>,
    /// Registry paths found as tokens in the text.
    pub path: Vec<String>,
    /// Registry URLs found in the text.
    pub url: Vec<String>,
    /// Keys found as bare tokens in the text.
    pub alias: Vec<String>,
    /// Values of "Submodule path" template fields.
    pub template: Vec<String>,
}

impl Evidence {
    /// Returns true if no category holds anything.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            && self.path.is_empty()
            && self.url.is_empty()
            && self.alias.is_empty()
            && self.template.is_empty()
    }
}

/// Hints extracted from labels and text before any registry matching.
#[derive(Debug, Clone, Default)]
pub struct Hints {
    /// Slugs named by `submodule:<slug>` labels, in label order.
    pub label_slugs: Vec<String>,
    /// Evidence with `labels` and `template` populated.
    pub evidence: Evidence,
}

/// Extracts label and template hints from an issue.
pub fn extract_hints<S: AsRef<str>>(text: &str, labels: &[S]) -> Hints {
    let mut hints = Hints::default();

    for label in labels {
        let raw = label.as_ref();
        if let Some(slug) = label_slug(raw) {
            hints.label_slugs.push(slug);
            hints.evidence.labels.push(raw.to_string());
        }
    }

    hints.evidence.template = template_paths(text);
    hints
}

/// Returns the slug of a `submodule:<slug>` label, if the label is one.
pub fn label_slug(label: &str) -> Option<String> {
    let normalized = label.trim().to_lowercase();
    LABEL_HINT_PATTERN
        .captures(&normalized)
        .map(|c| c[1].to_string())
}

/// Collects the values of "Submodule path: ..." lines.
pub fn template_paths(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| {
            line.trim()
                .to_lowercase()
                .starts_with(TEMPLATE_FIELD_PREFIX)
        })
        .map(|line| {
            line.split_once(':')
                .map_or(line, |(_, value)| value)
                .trim()
                .to_string()
        })
        .filter(|value| !value.is_empty())
        .collect()
}
