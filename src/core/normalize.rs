//! Normalisation of validator failures into a flat issue list

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// HTTP status a failed remote fetch leaves in the failure text
static NOT_FOUND_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\b404\b").expect("Invalid not-found marker regex")
});

/// A single field-scoped problem with a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub key: String,
}

impl ValidationIssue {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Failure reported by a descriptor validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorFailure {
    /// Newline-joined message, one problem per line
    Message(String),
    /// Already structured issues
    Issues(Vec<ValidationIssue>),
    /// The descriptor could not be downloaded at all
    Fetch(String),
}

impl ValidatorFailure {
    pub fn message(text: impl Into<String>) -> Self {
        ValidatorFailure::Message(text.into())
    }
}

impl std::fmt::Display for ValidatorFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidatorFailure::Message(text) | ValidatorFailure::Fetch(text) => f.write_str(text),
            ValidatorFailure::Issues(issues) => {
                let keys: Vec<&str> = issues.iter().map(|i| i.key.as_str()).collect();
                f.write_str(&keys.join("\n"))
            }
        }
    }
}

impl std::error::Error for ValidatorFailure {}

/// How a validator failure maps onto a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The remote descriptor does not exist
    NotFound,
    /// The remote host could not be reached
    Unreachable,
    /// The descriptor was read and rejected
    Invalid,
}

/// Classify a remote failure. Transport failures are unreachable; anything
/// else is not found when its text carries the not-found marker.
pub fn classify(failure: &ValidatorFailure) -> FailureClass {
    if matches!(failure, ValidatorFailure::Fetch(_)) {
        FailureClass::Unreachable
    } else if NOT_FOUND_MARKER.is_match(&failure.to_string()) {
        FailureClass::NotFound
    } else {
        FailureClass::Invalid
    }
}

/// Flatten a failure into issues.
///
/// Messages are split on line boundaries and blank lines dropped; each
/// remaining line becomes one issue. Structured issues pass through as
/// they are. Nothing is deduplicated or reordered.
pub fn normalize(failure: &ValidatorFailure) -> Vec<ValidationIssue> {
    match failure {
        ValidatorFailure::Message(text) | ValidatorFailure::Fetch(text) => text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .map(ValidationIssue::new)
            .collect(),
        ValidatorFailure::Issues(issues) => issues.clone(),
    }
}
