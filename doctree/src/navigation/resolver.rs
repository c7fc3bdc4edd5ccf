use std::collections::BTreeSet;
use std::path::Path;

use super::types::{Navigation, NavigationItem, NavigationSection, NavigationSource};
use crate::config::CoreConfig;
use crate::error::{DocError, Result};
use crate::fs::locked_read;
use crate::sandbox::join_relative_posix;
use crate::structure::{StructureBuilder, TreeNode};

/// Override files, in priority order.
pub const OVERRIDE_FILES: [&str; 2] = [".navigation", "_navigation.json"];

pub struct NavigationResolver<'a> {
    config: &'a CoreConfig,
}

impl<'a> NavigationResolver<'a> {
    pub fn new(config: &'a CoreConfig) -> Self {
        Self { config }
    }

    /// Navigation for the directory `dir` (root-relative path `rel`).
    ///
    /// The first override file that parses wins; otherwise the navigation is
    /// derived from a fresh walk of the tree.
    pub fn resolve(&self, dir: &Path, rel: &str) -> Navigation {
        self.resolve_overrides(dir, rel).unwrap_or_else(|| {
            let tree = StructureBuilder::new(self.config).build(dir, rel);
            Navigation {
                sections: derive(&tree),
                source: NavigationSource::Derived,
            }
        })
    }

    /// Same as [`resolve`](Self::resolve) but folds an already built tree.
    pub fn resolve_with_tree(&self, dir: &Path, rel: &str, tree: &TreeNode) -> Navigation {
        self.resolve_overrides(dir, rel).unwrap_or_else(|| Navigation {
            sections: derive(tree),
            source: NavigationSource::Derived,
        })
    }

    fn resolve_overrides(&self, dir: &Path, rel: &str) -> Option<Navigation> {
        for name in OVERRIDE_FILES {
            match load_override(&dir.join(name), rel) {
                Ok(Some(sections)) => {
                    tracing::debug!(file = name, sections = sections.len(), "using navigation override");
                    return Some(Navigation {
                        sections,
                        source: NavigationSource::Override(name.to_string()),
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(file = name, error = %e, "ignoring navigation override");
                }
            }
        }
        None
    }
}

/// Read one override file. `Ok(None)` when it does not exist.
///
/// Paths inside the file are relative to the directory holding it and are
/// rewritten to root-relative form.
pub fn load_override(path: &Path, base_rel: &str) -> Result<Option<Vec<NavigationSection>>> {
    let content = match locked_read(path) {
        Ok(content) => content,
        Err(DocError::NotFound { .. }) => return Ok(None),
        Err(e) => return Err(e),
    };
    let sections: Vec<NavigationSection> =
        serde_json::from_str(&content).map_err(|e| DocError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(Some(
        sections
            .into_iter()
            .map(|mut section| {
                section.path = section.path.map(|p| rebase(base_rel, &p));
                for item in &mut section.items {
                    item.path = rebase(base_rel, &item.path);
                }
                section
            })
            .filter(|section| !section.items.is_empty())
            .collect(),
    ))
}

fn rebase(base_rel: &str, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }
    join_relative_posix(base_rel, path).unwrap_or_else(|| path.trim_start_matches('/').to_string())
}

pub(crate) fn is_external(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:")
}

/// Fold a tree into a flat, sorted list of sections, one per directory.
pub fn derive(tree: &TreeNode) -> Vec<NavigationSection> {
    let mut sections = Vec::new();
    collect_sections(tree, true, &mut sections);
    sections.sort_by(NavigationSection::sort_cmp);
    sections
}

fn collect_sections(node: &TreeNode, is_root: bool, out: &mut Vec<NavigationSection>) {
    let TreeNode::Directory {
        name,
        path,
        metadata,
        children,
        ..
    } = node
    else {
        return;
    };

    let mut items: Vec<NavigationItem> = children
        .iter()
        .filter(|child| !child.is_directory())
        .map(|file| NavigationItem {
            title: file
                .metadata()
                .title()
                .map(str::to_string)
                .unwrap_or_else(|| strip_extension(file.name()).to_string()),
            path: file.path().to_string(),
            order: file.metadata().order(),
        })
        .collect();
    items.sort_by(NavigationItem::sort_cmp);

    if !items.is_empty() {
        out.push(NavigationSection {
            title: metadata.title().unwrap_or(name).to_string(),
            path: (!is_root).then(|| path.clone()),
            items,
            order: metadata.order(),
        });
    }

    for child in children.iter().filter(|c| c.is_directory()) {
        collect_sections(child, false, out);
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Every path a reader can reach from `sections`.
pub fn reachable_paths(sections: &[NavigationSection]) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    for section in sections {
        if let Some(path) = &section.path {
            paths.insert(clean(path));
        }
        for item in &section.items {
            paths.insert(clean(&item.path));
        }
    }
    paths
}

fn clean(path: &str) -> String {
    let without_fragment = path.split(['#', '?']).next().unwrap_or(path);
    without_fragment.trim_matches('/').to_string()
}

/// Whether a document path is covered by the reachable set.
///
/// A directory entry covers its index document and an entry without an
/// extension covers the `.md` file of the same name.
pub fn is_reachable(doc_path: &str, reachable: &BTreeSet<String>, index_file: &str) -> bool {
    if reachable.contains(doc_path) {
        return true;
    }
    if let Some(stem) = doc_path.strip_suffix(".md") {
        if reachable.contains(stem) {
            return true;
        }
    }
    let (parent, name) = doc_path.rsplit_once('/').unwrap_or(("", doc_path));
    name.eq_ignore_ascii_case(index_file) && reachable.contains(parent)
}
