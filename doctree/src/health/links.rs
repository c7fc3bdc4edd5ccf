use serde_json::json;
use std::collections::BTreeSet;
use std::path::Path;

use super::{HealthIssue, IssueType, Severity};
use crate::document::{parent_relative, Document};
use crate::navigation::is_external;
use crate::parser::extract_links;
use crate::sandbox::join_relative_posix;

/// Checks internal links against the documents of one scanned directory.
pub struct LinkValidator<'a> {
    base_dir: &'a Path,
    base_rel: &'a str,
    known: BTreeSet<&'a str>,
}

impl<'a> LinkValidator<'a> {
    /// `base_dir` is the scanned directory on disk and `base_rel` its
    /// root-relative path; `documents` is everything found beneath it.
    pub fn new(base_dir: &'a Path, base_rel: &'a str, documents: &'a [Document]) -> Self {
        Self {
            base_dir,
            base_rel,
            known: documents.iter().map(|d| d.path.as_str()).collect(),
        }
    }

    /// One `broken_link` issue per unresolved link, in document order.
    pub fn validate(&self, documents: &[Document]) -> Vec<HealthIssue> {
        let mut issues = Vec::new();
        for document in documents {
            for link in extract_links(&document.body) {
                let Some(target) = internal_target(&link.target) else {
                    continue;
                };
                if self.resolves(&document.path, target) {
                    continue;
                }
                tracing::debug!(
                    path = %document.path,
                    target = %link.target,
                    line = link.line,
                    "broken link"
                );
                issues.push(
                    HealthIssue::new(
                        document.path.clone(),
                        IssueType::BrokenLink,
                        Severity::Error,
                        format!("Broken link to {}", link.target),
                    )
                    .with_details(json!({
                        "text": link.text,
                        "target": link.target,
                    })),
                );
            }
        }
        issues
    }

    fn resolves(&self, from: &str, target: &str) -> bool {
        let resolved = match target.strip_prefix('/') {
            Some(rooted) => join_relative_posix(self.base_rel, rooted),
            None => join_relative_posix(parent_relative(from), target),
        };
        let Some(resolved) = resolved else {
            return false;
        };

        if self.known.contains(resolved.as_str())
            || self.known.contains(format!("{resolved}.md").as_str())
        {
            return true;
        }
        self.exists_on_disk(&resolved)
    }

    /// Non-document assets beneath the scanned directory also satisfy a link.
    fn exists_on_disk(&self, resolved: &str) -> bool {
        let below = if self.base_rel.is_empty() {
            Some(resolved)
        } else {
            resolved
                .strip_prefix(self.base_rel)
                .and_then(|rest| rest.strip_prefix('/'))
        };
        below.is_some_and(|rest| !rest.is_empty() && self.base_dir.join(rest).is_file())
    }
}

/// The path part of an internal link, or `None` when there is nothing to check.
fn internal_target(target: &str) -> Option<&str> {
    let target = target.trim();
    if target.is_empty() || target.starts_with('#') || is_external(target) {
        return None;
    }
    let path = target.split(['#', '?']).next().unwrap_or(target);
    (!path.is_empty()).then_some(path)
}
