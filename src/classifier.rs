//! Submodule ownership classification.
//!
//! Given issue text, issue labels and the submodule registry, the classifier
//! decides which submodule primarily owns the issue, which others it also
//! touches, and how confident that call is. Scoring is a heuristic:
//!
//! - a full registry path mentioned as a token (+3)
//! - the canonical remote URL mentioned anywhere (+3)
//! - the last path segment mentioned as a token (+1)
//! - a "Submodule path:" template field containing the path (+4)
//! - a `submodule:<key>` label (+5)
//!
//! Classification is a pure function of its inputs.

pub mod evidence;
pub mod labels;
pub mod patterns;
pub mod scorer;

pub use evidence::{extract_hints, label_slug, template_paths, Evidence, Hints};
pub use labels::LabelMapper;
pub use patterns::{canonical_url, CompiledPattern, TokenMatcher};
pub use scorer::{confidence_for, ClassificationResult, Classifier, MAX_SCORE};

use crate::registry::SubmoduleRecord;

/// Classifies one issue against a registry.
///
/// Compiles the registry on every call; use [`Classifier`] directly when
/// classifying many issues.
pub fn classify<S: AsRef<str>>(
    text: &str,
    labels: &[S],
    records: &[SubmoduleRecord],
) -> ClassificationResult {
    Classifier::new(records).classify(text, labels)
}

/// Rounds a confidence to three decimals, ties to even.
pub fn round_confidence(confidence: f64) -> f64 {
    (confidence * 1000.0).round_ties_even() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_core_scenario() {
        let records = vec![SubmoduleRecord {
            name: "semantic-core".to_string(),
            path: "modules/semantic-core".to_string(),
            url: "https://github.com/org/semantic-core".to_string(),
        }];
        let result = classify::<&str>("Relates to modules/semantic-core behavior.", &[], &records);

        assert_eq!(result.primary.as_deref(), Some("semantic-core"));
        assert!(result.impacted.is_empty());
        assert!((round_confidence(result.confidence) - 0.188).abs() < f64::EPSILON);
    }

    #[test]
    fn round_confidence_ties_to_even() {
        assert!((round_confidence(3.0 / 16.0) - 0.188).abs() < f64::EPSILON);
        assert!((round_confidence(5.0 / 16.0) - 0.312).abs() < f64::EPSILON);
        assert!((round_confidence(1.0) - 1.0).abs() < f64::EPSILON);
        assert!(round_confidence(0.0).abs() < f64::EPSILON);
    }
}
