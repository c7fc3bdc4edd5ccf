//! Document values produced by reads. Nothing here is cached.

use serde::{Deserialize, Serialize};

use crate::parser::{self, Metadata};

/// A parsed markdown document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Root-relative, forward-slash path.
    pub path: String,
    /// Content with the front-matter block removed.
    pub body: String,
    pub metadata: Metadata,
}

impl Document {
    pub fn from_content(path: impl Into<String>, content: &str) -> Self {
        let (metadata, body) = parser::parse(content);
        Self {
            path: path.into(),
            body,
            metadata,
        }
    }

    /// Final path component.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Display title with heading and filename fallbacks.
    pub fn title(&self) -> String {
        parser::derive_title(&self.metadata, &self.body, self.name())
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            path: self.path.clone(),
            name: self.name().to_string(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Row returned by listing and search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub path: String,
    pub name: String,
    pub metadata: Metadata,
}

/// A single text replacement applied by `edit_document`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edit {
    pub old_text: String,
    pub new_text: String,
}

impl Edit {
    pub fn new(old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            old_text: old_text.into(),
            new_text: new_text.into(),
        }
    }
}

/// Join a root-relative directory and a child name.
pub(crate) fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Parent directory of a root-relative path (`""` for top-level entries).
pub(crate) fn parent_relative(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}
