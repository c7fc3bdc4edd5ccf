//! Health checks: metadata completeness, link integrity and navigation coverage.

mod links;
mod scorer;

pub use links::LinkValidator;
pub use scorer::HealthScorer;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{default_required_fields, CoreConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    MissingMetadata,
    BrokenLink,
    Orphaned,
    MissingReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One finding about one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthIssue {
    pub path: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl HealthIssue {
    pub fn new(
        path: impl Into<String>,
        issue_type: IssueType,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            issue_type,
            severity,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Aggregate result of a health check. Computed fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub score: u32,
    pub total_documents: usize,
    pub issues: Vec<HealthIssue>,
    pub metadata_completeness: u32,
    pub broken_links: usize,
    pub orphaned_documents: usize,
    pub missing_references: usize,
    pub documents_by_status: BTreeMap<String, usize>,
    pub documents_by_tag: BTreeMap<String, usize>,
}

impl HealthReport {
    pub fn issues_of(&self, issue_type: IssueType) -> impl Iterator<Item = &HealthIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.issue_type == issue_type)
    }
}

/// Caller-selected checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthOptions {
    pub check_links: bool,
    pub check_metadata: bool,
    pub check_orphans: bool,
    pub required_metadata_fields: Vec<String>,
}

impl Default for HealthOptions {
    fn default() -> Self {
        Self {
            check_links: true,
            check_metadata: true,
            check_orphans: true,
            required_metadata_fields: default_required_fields(),
        }
    }
}

impl HealthOptions {
    /// Defaults, with the required fields taken from `config`.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            required_metadata_fields: config.required_metadata_fields.clone(),
            ..Self::default()
        }
    }
}
