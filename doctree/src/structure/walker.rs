use std::fs;
use std::path::Path;

use super::types::TreeNode;
use crate::config::CoreConfig;
use crate::document::{join_relative, Document};
use crate::fs::locked_read;
use crate::parser::Metadata;

/// Result of one walk: the tree plus every document read along the way.
#[derive(Debug, Clone)]
pub struct Scan {
    pub tree: TreeNode,
    /// Documents sorted by path, index documents included.
    pub documents: Vec<Document>,
}

/// Depth-first walker over a sandboxed directory.
///
/// Failures below the starting directory never abort the walk; they are
/// recorded on the node that could not be read.
pub struct StructureBuilder<'a> {
    config: &'a CoreConfig,
}

impl<'a> StructureBuilder<'a> {
    pub fn new(config: &'a CoreConfig) -> Self {
        Self { config }
    }

    /// Build the tree rooted at `dir`, whose root-relative path is `rel`.
    pub fn build(&self, dir: &Path, rel: &str) -> TreeNode {
        self.scan(dir, rel).tree
    }

    /// Build the tree and collect the document inventory in the same pass.
    pub fn scan(&self, dir: &Path, rel: &str) -> Scan {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut documents = Vec::new();
        let tree = self.walk_dir(dir, rel, name, &mut documents);
        documents.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(
            root = %dir.display(),
            documents = documents.len(),
            "scanned document tree"
        );
        Scan { tree, documents }
    }

    fn walk_dir(
        &self,
        dir: &Path,
        rel: &str,
        name: String,
        documents: &mut Vec<Document>,
    ) -> TreeNode {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "failed to read directory");
                return TreeNode::Directory {
                    name,
                    path: rel.to_string(),
                    metadata: Metadata::new(),
                    children: Vec::new(),
                    error: Some(e.to_string()),
                };
            }
        };

        let mut metadata = Metadata::new();
        let mut children = Vec::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(path = %dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let child_name = entry.file_name().to_string_lossy().into_owned();
            if child_name.starts_with('.') {
                continue;
            }
            let child_rel = join_relative(rel, &child_name);
            if self.config.is_excluded(&child_rel) {
                tracing::trace!(path = %child_rel, "excluded");
                continue;
            }

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    tracing::warn!(path = %child_rel, error = %e, "failed to stat entry");
                    continue;
                }
            };
            let child_path = entry.path();

            if file_type.is_symlink() {
                tracing::debug!(path = %child_rel, "skipping symlink");
            } else if file_type.is_dir() {
                children.push(self.walk_dir(&child_path, &child_rel, child_name, documents));
            } else if file_type.is_file() && self.config.is_markdown(&child_name) {
                let is_index = child_name.eq_ignore_ascii_case(&self.config.index_file);
                match locked_read(&child_path) {
                    Ok(content) => {
                        let document = Document::from_content(child_rel.clone(), &content);
                        if is_index {
                            metadata = document.metadata.clone();
                        } else {
                            children.push(TreeNode::File {
                                name: child_name,
                                path: child_rel,
                                metadata: document.metadata.clone(),
                                error: None,
                            });
                        }
                        documents.push(document);
                    }
                    Err(e) => {
                        tracing::warn!(path = %child_rel, error = %e, "failed to read document");
                        if !is_index {
                            children.push(TreeNode::File {
                                name: child_name,
                                path: child_rel,
                                metadata: Metadata::new(),
                                error: Some(e.to_string()),
                            });
                        }
                    }
                }
            }
        }

        children.sort_by(TreeNode::sort_cmp);

        TreeNode::Directory {
            name,
            path: rel.to_string(),
            metadata,
            children,
            error: None,
        }
    }
}
