//! Point scoring and primary/impacted selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::evidence::{extract_hints, Evidence, Hints};
use super::patterns::CompiledPattern;
use crate::registry::SubmoduleRecord;

/// Points for a full path token match.
pub const PATH_POINTS: u32 = 3;
/// Points for a canonical URL match.
pub const URL_POINTS: u32 = 3;
/// Points for a bare last-segment match.
pub const ALIAS_POINTS: u32 = 1;
/// Points for a template field naming the path.
pub const TEMPLATE_POINTS: u32 = 4;
/// Points for a `submodule:<key>` label.
pub const LABEL_POINTS: u32 = 5;

/// Highest score a single submodule can reach.
pub const MAX_SCORE: u32 = LABEL_POINTS + TEMPLATE_POINTS + PATH_POINTS + URL_POINTS + ALIAS_POINTS;

/// Ranking of one submodule within an analysis.
///
/// Field order is the comparison order: score first, then the template,
/// label, path and alias flags. `template` means a template value names the
/// key; the other flags mean the matching bonus was earned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
struct Rank {
    score: u32,
    template: bool,
    label: bool,
    path: bool,
    alias: bool,
}

/// Outcome of classifying one issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Submodule judged to own the issue.
    pub primary: Option<String>,
    /// Other matched submodules, sorted, never containing the primary.
    pub impacted: Vec<String>,
    /// Strength of the primary's evidence in `[0, 1]`.
    pub confidence: f64,
    /// Points per matched submodule key.
    pub scores: BTreeMap<String, u32>,
    /// Raw strings behind the scores.
    pub evidence: Evidence,
}

impl ClassificationResult {
    /// Returns true if neither a primary nor an impacted submodule was found.
    pub fn is_unclassified(&self) -> bool {
        self.primary.is_none() && self.impacted.is_empty()
    }

    /// Returns the score-table points of the primary (0 without an entry).
    pub fn primary_score(&self) -> u32 {
        self.primary
            .as_ref()
            .and_then(|key| self.scores.get(key))
            .copied()
            .unwrap_or(0)
    }
}

/// Classifier holding the compiled patterns of a registry.
///
/// Compile once per run and reuse for every issue. Classification is pure,
/// so a shared reference can be used from several threads.
#[derive(Debug, Clone)]
pub struct Classifier {
    patterns: Vec<CompiledPattern>,
}

impl Classifier {
    /// Compiles the patterns for every record.
    pub fn new(records: &[SubmoduleRecord]) -> Self {
        Self {
            patterns: records.iter().map(CompiledPattern::compile).collect(),
        }
    }

    /// Returns the compiled patterns in registry order.
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Classifies an issue from its text and labels.
    pub fn classify<S: AsRef<str>>(&self, text: &str, labels: &[S]) -> ClassificationResult {
        let Hints {
            label_slugs,
            mut evidence,
        } = extract_hints(text, labels);

        let mut table: BTreeMap<String, Rank> = BTreeMap::new();
        for pattern in &self.patterns {
            let rank = self.rank(pattern, text, &label_slugs, &mut evidence);
            if rank.score > 0 {
                table
                    .entry(pattern.key.clone())
                    .and_modify(|existing| *existing = (*existing).max(rank))
                    .or_insert(rank);
            }
        }

        // Ties on every flag go to the lexicographically smallest key
        let primary = table
            .iter()
            .max_by(|(key_a, rank_a), (key_b, rank_b)| {
                rank_a.cmp(rank_b).then_with(|| key_b.cmp(key_a))
            })
            .map(|(key, _)| key.clone())
            .or_else(|| label_slugs.first().cloned());

        let impacted: Vec<String> = table
            .keys()
            .filter(|key| Some(*key) != primary.as_ref())
            .cloned()
            .collect();

        let scores: BTreeMap<String, u32> = table
            .into_iter()
            .map(|(key, rank)| (key, rank.score))
            .collect();

        let confidence = primary
            .as_ref()
            .and_then(|key| scores.get(key))
            .map_or(0.0, |&score| confidence_for(score));

        debug!(
            primary = ?primary,
            impacted = ?impacted,
            confidence,
            "Classified issue"
        );

        ClassificationResult {
            primary,
            impacted,
            confidence,
            scores,
            evidence,
        }
    }

    /// Scores one pattern against the text, recording evidence.
    fn rank(
        &self,
        pattern: &CompiledPattern,
        text: &str,
        label_slugs: &[String],
        evidence: &mut Evidence,
    ) -> Rank {
        let mut rank = Rank::default();

        if pattern.matches_path(text) {
            rank.score += PATH_POINTS;
            rank.path = true;
            evidence.path.push(pattern.path.clone());
        }
        if pattern.matches_url(text) {
            rank.score += URL_POINTS;
            evidence.url.push(pattern.url.clone());
        }
        if pattern.matches_alias(text) {
            rank.score += ALIAS_POINTS;
            rank.alias = true;
            evidence.alias.push(pattern.key.clone());
        }
        if evidence
            .template
            .iter()
            .any(|value| value.contains(pattern.path.as_str()))
        {
            rank.score += TEMPLATE_POINTS;
        }
        // A template naming the key breaks ties even without the path bonus
        rank.template = evidence
            .template
            .iter()
            .any(|value| value.contains(pattern.key.as_str()));
        if label_slugs.contains(&pattern.key) {
            rank.score += LABEL_POINTS;
            rank.label = true;
        }

        rank
    }
}

/// Normalizes a score into `[0, 1]`.
pub fn confidence_for(score: u32) -> f64 {
    (f64::from(score) / f64::from(MAX_SCORE)).min(1.0)
}
