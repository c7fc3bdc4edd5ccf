use serde::Serialize;
use std::cmp::Ordering;

use crate::parser::Metadata;

/// One entry in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    File {
        name: String,
        path: String,
        metadata: Metadata,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Directory {
        name: String,
        path: String,
        /// Metadata of the directory's index document, if it has one.
        metadata: Metadata,
        children: Vec<TreeNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::File { name, .. } | TreeNode::Directory { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            TreeNode::File { path, .. } | TreeNode::Directory { path, .. } => path,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            TreeNode::File { metadata, .. } | TreeNode::Directory { metadata, .. } => metadata,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TreeNode::File { error, .. } | TreeNode::Directory { error, .. } => error.as_deref(),
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Directory { children, .. } => children,
            TreeNode::File { .. } => &[],
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, TreeNode::Directory { .. })
    }

    /// Every file node beneath (and including) this node, depth-first.
    pub fn files(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a TreeNode>) {
        match self {
            TreeNode::File { .. } => out.push(self),
            TreeNode::Directory { children, .. } => {
                for child in children {
                    child.collect_files(out);
                }
            }
        }
    }

    /// Sibling order: `order` ascending, then name.
    pub fn sort_cmp(&self, other: &TreeNode) -> Ordering {
        self.metadata()
            .sort_order()
            .total_cmp(&other.metadata().sort_order())
            .then_with(|| compare_names(self.name(), other.name()))
    }
}

/// Case-insensitive comparison with a case-sensitive tiebreak, so the
/// ordering is total and does not depend on directory listing order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
