use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::links::LinkValidator;
use super::{HealthIssue, HealthOptions, HealthReport, IssueType, Severity};
use crate::config::{CoreConfig, OrphanPolicy};
use crate::document::{join_relative, Document};
use crate::navigation::{
    is_external, is_reachable, reachable_paths, Navigation, NavigationResolver, NavigationSource,
};
use crate::structure::{Scan, StructureBuilder, TreeNode};

const METADATA_WEIGHT: f64 = 0.7;
const LINK_WEIGHT: f64 = 30.0;

/// Computes a [`HealthReport`] for one directory.
pub struct HealthScorer<'a> {
    config: &'a CoreConfig,
}

impl<'a> HealthScorer<'a> {
    pub fn new(config: &'a CoreConfig) -> Self {
        Self { config }
    }

    /// Walk `dir` (root-relative path `rel`) and score it.
    pub fn score(&self, dir: &Path, rel: &str, options: &HealthOptions) -> HealthReport {
        let scan = StructureBuilder::new(self.config).scan(dir, rel);
        self.score_scan(dir, rel, &scan, options)
    }

    pub fn score_scan(
        &self,
        dir: &Path,
        rel: &str,
        scan: &Scan,
        options: &HealthOptions,
    ) -> HealthReport {
        let documents = &scan.documents;
        let mut issues = Vec::new();

        let metadata_completeness = if options.check_metadata {
            let (completeness, missing) =
                metadata_completeness(documents, &options.required_metadata_fields);
            issues.extend(missing);
            completeness
        } else {
            100
        };

        let broken_links = if options.check_links {
            let broken = LinkValidator::new(dir, rel, documents).validate(documents);
            let count = broken.len();
            issues.extend(broken);
            count
        } else {
            0
        };

        let (orphaned_documents, missing_references) = match self.config.orphan_policy {
            OrphanPolicy::Disabled => (0, 0),
            OrphanPolicy::ComputeAgainstNavigation => {
                let navigation =
                    NavigationResolver::new(self.config).resolve_with_tree(dir, rel, &scan.tree);
                let orphans = if options.check_orphans {
                    self.orphans(rel, documents, &navigation)
                } else {
                    Vec::new()
                };
                let missing = self.missing_references(rel, documents, &scan.tree, &navigation);
                let counts = (orphans.len(), missing.len());
                issues.extend(orphans);
                issues.extend(missing);
                counts
            }
        };

        let (documents_by_status, documents_by_tag) = tallies(documents);
        let score = composite_score(metadata_completeness, broken_links, documents.len());

        tracing::debug!(
            root = %dir.display(),
            score,
            documents = documents.len(),
            issues = issues.len(),
            "computed health report"
        );

        HealthReport {
            score,
            total_documents: documents.len(),
            issues,
            metadata_completeness,
            broken_links,
            orphaned_documents,
            missing_references,
            documents_by_status,
            documents_by_tag,
        }
    }

    fn orphans(&self, rel: &str, documents: &[Document], navigation: &Navigation) -> Vec<HealthIssue> {
        let mut reachable = reachable_paths(&navigation.sections);
        // The checked directory's own index is the entry point.
        reachable.insert(rel.to_string());

        documents
            .iter()
            .filter(|doc| !is_reachable(&doc.path, &reachable, &self.config.index_file))
            .map(|doc| {
                HealthIssue::new(
                    doc.path.clone(),
                    IssueType::Orphaned,
                    Severity::Warning,
                    "Document is not reachable from navigation",
                )
            })
            .collect()
    }

    /// Override entries that point at nothing. Derived navigation is built
    /// from the tree and cannot dangle.
    fn missing_references(
        &self,
        rel: &str,
        documents: &[Document],
        tree: &TreeNode,
        navigation: &Navigation,
    ) -> Vec<HealthIssue> {
        let NavigationSource::Override(file) = &navigation.source else {
            return Vec::new();
        };
        let file_path = join_relative(rel, file);

        let known: BTreeSet<&str> = documents.iter().map(|d| d.path.as_str()).collect();
        let mut directories = BTreeSet::new();
        collect_directories(tree, &mut directories);

        let mut references = Vec::new();
        for section in &navigation.sections {
            if let Some(path) = &section.path {
                references.push((section.title.as_str(), path.as_str()));
            }
            for item in &section.items {
                references.push((item.title.as_str(), item.path.as_str()));
            }
        }

        references
            .into_iter()
            .filter(|(_, path)| !is_external(path))
            .filter(|&(_, path)| {
                let path = path.split(['#', '?']).next().unwrap_or(path);
                let index = format!("{path}/{}", self.config.index_file);
                !(known.contains(path)
                    || known.contains(format!("{path}.md").as_str())
                    || known.contains(index.as_str())
                    || directories.contains(path))
            })
            .map(|(title, path)| {
                HealthIssue::new(
                    file_path.clone(),
                    IssueType::MissingReference,
                    Severity::Warning,
                    format!("Navigation entry '{title}' points to missing {path}"),
                )
                .with_details(json!({ "title": title, "target": path }))
            })
            .collect()
    }
}

fn collect_directories(node: &TreeNode, out: &mut BTreeSet<String>) {
    if node.is_directory() {
        out.insert(node.path().to_string());
        for child in node.children() {
            collect_directories(child, out);
        }
    }
}

/// Percentage of required fields present across all documents, plus one
/// issue per miss.
fn metadata_completeness(documents: &[Document], required: &[String]) -> (u32, Vec<HealthIssue>) {
    let mut checked = 0usize;
    let mut passed = 0usize;
    let mut issues = Vec::new();

    for doc in documents {
        for field in required {
            checked += 1;
            if doc.metadata.has_value(field) {
                passed += 1;
            } else {
                issues.push(
                    HealthIssue::new(
                        doc.path.clone(),
                        IssueType::MissingMetadata,
                        Severity::Error,
                        format!("Missing required metadata field '{field}'"),
                    )
                    .with_details(json!({ "field": field })),
                );
            }
        }
    }

    if checked == 0 {
        return (100, issues);
    }
    let completeness = (100.0 * passed as f64 / checked as f64).round() as u32;
    (completeness, issues)
}

/// `completeness * 0.7` plus up to 30 points for link integrity.
fn composite_score(completeness: u32, broken_links: usize, total_documents: usize) -> u32 {
    let link_score = if broken_links == 0 || total_documents == 0 {
        LINK_WEIGHT
    } else {
        (LINK_WEIGHT - broken_links as f64 / total_documents as f64 * 100.0).max(0.0)
    };
    let score = f64::from(completeness) * METADATA_WEIGHT + link_score;
    score.round().clamp(0.0, 100.0) as u32
}

fn tallies(documents: &[Document]) -> (BTreeMap<String, usize>, BTreeMap<String, usize>) {
    let mut by_status = BTreeMap::new();
    let mut by_tag = BTreeMap::new();
    for doc in documents {
        if let Some(status) = doc.metadata.status_str() {
            *by_status.entry(status.to_string()).or_insert(0) += 1;
        }
        for tag in doc.metadata.tags() {
            *by_tag.entry(tag.to_string()).or_insert(0) += 1;
        }
    }
    (by_status, by_tag)
}
