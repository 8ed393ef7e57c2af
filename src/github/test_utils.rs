//! Shared test utilities for the `github` module.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::{Issue, IssueQuery, IssueTracker, LabelOutcome, LabelSpec, TrackerFuture};

/// Call recorded by the mock tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TrackerCall {
    /// `create_label(name)`.
    CreateLabel(String),
    /// `add_labels(number, labels)`.
    AddLabels(u64, Vec<String>),
    /// `add_comment(number, body)`.
    AddComment(u64, String),
}

/// In-memory issue tracker.
///
/// Labels already present in the repository report
/// [`LabelOutcome::AlreadyExists`]. Issue numbers registered with
/// [`fail_issue`](Self::fail_issue) make `add_labels` fail for that issue.
#[derive(Default)]
pub(crate) struct MockIssueTracker {
    issues: Vec<Issue>,
    existing_labels: Mutex<HashSet<String>>,
    failing_issues: HashSet<u64>,
    failing_labels: HashSet<String>,
    calls: Arc<Mutex<Vec<TrackerCall>>>,
}

impl MockIssueTracker {
    /// Creates a tracker holding the given issues.
    pub(crate) fn new(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            ..Self::default()
        }
    }

    /// Marks a label as already present in the repository.
    pub(crate) fn with_existing_label(self, name: &str) -> Self {
        self.existing_labels
            .lock()
            .unwrap()
            .insert(name.to_string());
        self
    }

    /// Makes label application fail for an issue.
    pub(crate) fn fail_issue(mut self, number: u64) -> Self {
        self.failing_issues.insert(number);
        self
    }

    /// Makes creation of a label fail with a non-conflict error.
    pub(crate) fn fail_label(mut self, name: &str) -> Self {
        self.failing_labels.insert(name.to_string());
        self
    }

    /// Returns a handle for inspecting recorded calls.
    pub(crate) fn call_handle(&self) -> CallRecordHandle {
        CallRecordHandle {
            calls: self.calls.clone(),
        }
    }

    fn record(&self, call: TrackerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Shared handle to a mock tracker's recorded calls.
pub(crate) struct CallRecordHandle {
    calls: Arc<Mutex<Vec<TrackerCall>>>,
}

impl CallRecordHandle {
    /// Returns all recorded calls in order.
    pub(crate) fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns how many times each label creation was requested.
    pub(crate) fn label_creations(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for call in self.calls() {
            if let TrackerCall::CreateLabel(name) = call {
                *counts.entry(name).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Returns the `(number, labels)` pairs passed to `add_labels`.
    pub(crate) fn added_labels(&self) -> Vec<(u64, Vec<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TrackerCall::AddLabels(number, labels) => Some((number, labels)),
                _ => None,
            })
            .collect()
    }

    /// Returns the `(number, body)` pairs passed to `add_comment`.
    pub(crate) fn comments(&self) -> Vec<(u64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TrackerCall::AddComment(number, body) => Some((number, body)),
                _ => None,
            })
            .collect()
    }
}

impl IssueTracker for MockIssueTracker {
    fn list_issues<'a>(&'a self, query: &'a IssueQuery) -> TrackerFuture<'a, Vec<Issue>> {
        let issues: Vec<Issue> = self.issues.iter().take(query.max).cloned().collect();
        Box::pin(async move { Ok(issues) })
    }

    fn get_issue(&self, number: u64) -> TrackerFuture<'_, Issue> {
        let issue = self
            .issues
            .iter()
            .find(|i| i.number == Some(number))
            .cloned();
        Box::pin(async move { issue.ok_or_else(|| anyhow::anyhow!("issue #{number} not found")) })
    }

    fn create_label<'a>(&'a self, label: &'a LabelSpec) -> TrackerFuture<'a, LabelOutcome> {
        Box::pin(async move {
            self.record(TrackerCall::CreateLabel(label.name.clone()));
            if self.failing_labels.contains(&label.name) {
                return Err(anyhow::anyhow!("HTTP 500 creating {}", label.name));
            }
            let inserted = self
                .existing_labels
                .lock()
                .unwrap()
                .insert(label.name.clone());
            Ok(if inserted {
                LabelOutcome::Created
            } else {
                LabelOutcome::AlreadyExists
            })
        })
    }

    fn add_labels<'a>(&'a self, number: u64, labels: &'a [String]) -> TrackerFuture<'a, ()> {
        Box::pin(async move {
            if self.failing_issues.contains(&number) {
                return Err(anyhow::anyhow!("HTTP 500 adding labels to #{number}"));
            }
            self.record(TrackerCall::AddLabels(number, labels.to_vec()));
            Ok(())
        })
    }

    fn add_comment<'a>(&'a self, number: u64, body: &'a str) -> TrackerFuture<'a, ()> {
        Box::pin(async move {
            self.record(TrackerCall::AddComment(number, body.to_string()));
            Ok(())
        })
    }
}

/// Builds an issue for tests.
pub(crate) fn issue(number: u64, body: &str, labels: &[&str]) -> Issue {
    Issue {
        number: Some(number),
        title: format!("Issue {number}"),
        labels: labels.iter().map(|l| (*l).to_string()).collect(),
        body: body.to_string(),
    }
}
