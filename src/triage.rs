//! Bulk submodule triage across existing issues.
//!
//! The driver classifies each issue, works out which labels are missing, and
//! applies them together with a summary comment. Issues are processed one at
//! a time; a failure on one issue is recorded and the next issue still runs.

use std::collections::{BTreeSet, HashSet};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::classifier::{round_confidence, ClassificationResult, Classifier, LabelMapper};
use crate::github::{Issue, IssueTracker, LabelOutcome, LabelSpec};
use crate::registry::SubmoduleRecord;

/// Label marking an issue whose change lives in a submodule.
pub const TARGET_LABEL: &str = "target:submodule";

/// Label marking a request to change a submodule and bump its pointer.
pub const CHANGE_LABEL: &str = "type:submodule-change";

/// Returns the two housekeeping labels applied to every triaged issue.
pub fn housekeeping_labels() -> [LabelSpec; 2] {
    [
        LabelSpec::new(
            TARGET_LABEL,
            "1d76db",
            "Change lives in a submodule (external repo)",
        ),
        LabelSpec::new(
            CHANGE_LABEL,
            "c2e0c6",
            "Request to change a submodule and update pointer here",
        ),
    ]
}

/// Intended changes for one issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriagePlan {
    /// Issue number.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Classification of the issue body.
    pub classification: ClassificationResult,
    /// Every label the issue should carry, sorted.
    pub desired_labels: Vec<String>,
    /// Desired labels not yet on the issue, sorted.
    pub missing_labels: Vec<String>,
    /// Summary comment to post.
    pub comment: String,
}

impl TriagePlan {
    /// Returns true if applying the plan would change the issue.
    pub fn has_changes(&self) -> bool {
        !self.missing_labels.is_empty()
    }
}

/// Builds the plan for one issue, or `None` if there is nothing to triage.
pub fn plan_issue(classifier: &Classifier, mapper: &LabelMapper, issue: &Issue) -> Option<TriagePlan> {
    let Some(number) = issue.number else {
        debug!(title = %issue.title, "Skipping issue without number");
        return None;
    };

    let classification = classifier.classify(&issue.body, &issue.labels);
    if classification.is_unclassified() {
        return None;
    }

    let mut desired: BTreeSet<String> = [TARGET_LABEL, CHANGE_LABEL]
        .into_iter()
        .map(String::from)
        .collect();
    if let Some(primary) = &classification.primary {
        desired.insert(mapper.label(primary));
    }
    desired.extend(mapper.labels(&classification.impacted));

    let existing: HashSet<&str> = issue.labels.iter().map(String::as_str).collect();
    let missing_labels: Vec<String> = desired
        .iter()
        .filter(|label| !existing.contains(label.as_str()))
        .cloned()
        .collect();

    Some(TriagePlan {
        number,
        title: issue.title.clone(),
        comment: summary_comment(&classification),
        desired_labels: desired.into_iter().collect(),
        missing_labels,
        classification,
    })
}

/// Formats the comment posted on a triaged issue.
pub fn summary_comment(classification: &ClassificationResult) -> String {
    let impacted = if classification.impacted.is_empty() {
        "none".to_string()
    } else {
        classification.impacted.join(", ")
    };
    format!(
        "Submodule triage → primary: {}, impacted: {}, confidence: {:?}",
        classification.primary.as_deref().unwrap_or("n/a"),
        impacted,
        round_confidence(classification.confidence)
    )
}

/// Issue whose triage failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageFailure {
    /// Issue number.
    pub number: u64,
    /// Error description, including causes.
    pub error: String,
}

/// Outcome of a triage run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriageSummary {
    /// Issues examined.
    pub analyzed: usize,
    /// Issues skipped because nothing was classified or they had no number.
    pub skipped: usize,
    /// Issues with a triage plan.
    pub planned: usize,
    /// Issues that received new labels and a comment.
    pub labeled: usize,
    /// Issues whose label or comment application failed.
    pub failed: Vec<TriageFailure>,
}

/// Applies triage plans through an issue tracker.
///
/// Label creation goes through the driver so each label is requested at
/// most once per run.
pub struct TriageDriver<'a> {
    tracker: &'a dyn IssueTracker,
    classifier: &'a Classifier,
    mapper: &'a LabelMapper,
    dry_run: bool,
    ensured_labels: HashSet<String>,
}

impl<'a> TriageDriver<'a> {
    /// Creates a driver.
    pub fn new(
        tracker: &'a dyn IssueTracker,
        classifier: &'a Classifier,
        mapper: &'a LabelMapper,
    ) -> Self {
        Self {
            tracker,
            classifier,
            mapper,
            dry_run: false,
            ensured_labels: HashSet::new(),
        }
    }

    /// Only plans changes, never calling mutating tracker operations.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Ensures the housekeeping labels and one label per registry record exist.
    ///
    /// Failures are logged; the labels are retried when an issue needs them.
    pub async fn ensure_registry_labels(&mut self, records: &[SubmoduleRecord]) {
        if self.dry_run {
            return;
        }

        let mut specs: Vec<LabelSpec> = housekeeping_labels().into();
        specs.extend(
            records
                .iter()
                .map(|record| LabelSpec::named(self.mapper.label(&record.key()))),
        );

        for spec in &specs {
            if let Err(e) = self.ensure_label(spec).await {
                warn!(label = %spec.name, error = %e, "Failed to ensure label");
            }
        }
    }

    /// Creates a label unless this run already did.
    async fn ensure_label(&mut self, spec: &LabelSpec) -> Result<()> {
        if self.ensured_labels.contains(&spec.name) {
            return Ok(());
        }

        let outcome = self
            .tracker
            .create_label(spec)
            .await
            .with_context(|| format!("Failed to create label {}", spec.name))?;
        if outcome == LabelOutcome::Created {
            debug!(label = %spec.name, "Label created");
        }
        self.ensured_labels.insert(spec.name.clone());
        Ok(())
    }

    /// Triages every issue in order.
    ///
    /// `on_plan` sees each plan before any change is applied for it.
    pub async fn run<F>(&mut self, issues: &[Issue], mut on_plan: F) -> TriageSummary
    where
        F: FnMut(&TriagePlan),
    {
        let mut summary = TriageSummary::default();

        for issue in issues {
            summary.analyzed += 1;
            let Some(plan) = plan_issue(self.classifier, self.mapper, issue) else {
                summary.skipped += 1;
                continue;
            };
            summary.planned += 1;
            on_plan(&plan);

            if self.dry_run {
                continue;
            }

            match self.apply(&plan).await {
                Ok(true) => summary.labeled += 1,
                Ok(false) => debug!(issue = plan.number, "Issue already triaged"),
                Err(e) => {
                    error!(issue = plan.number, error = %format!("{e:#}"), "Triage failed");
                    summary.failed.push(TriageFailure {
                        number: plan.number,
                        error: format!("{e:#}"),
                    });
                }
            }
        }

        info!(
            analyzed = summary.analyzed,
            labeled = summary.labeled,
            failed = summary.failed.len(),
            "Triage run finished"
        );
        summary
    }

    /// Applies one plan; returns whether the issue was modified.
    async fn apply(&mut self, plan: &TriagePlan) -> Result<bool> {
        for name in &plan.desired_labels {
            let spec = housekeeping_labels()
                .into_iter()
                .find(|spec| &spec.name == name)
                .unwrap_or_else(|| LabelSpec::named(name.as_str()));
            self.ensure_label(&spec).await?;
        }

        if !plan.has_changes() {
            return Ok(false);
        }

        self.tracker
            .add_labels(plan.number, &plan.missing_labels)
            .await
            .with_context(|| format!("Failed to add labels to issue #{}", plan.number))?;
        self.tracker
            .add_comment(plan.number, &plan.comment)
            .await
            .with_context(|| format!("Failed to comment on issue #{}", plan.number))?;
        Ok(true)
    }
}
