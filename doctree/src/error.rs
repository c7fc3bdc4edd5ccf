//! Error type shared by every public operation.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors returned across the crate boundary.
///
/// Read-path failures inside a tree walk are not reported through this type;
/// they are annotated on the affected [`crate::structure::TreeNode`] instead.
#[derive(Debug, Error)]
pub enum DocError {
    /// The path resolves outside every allowed root.
    #[error("access denied: {} is outside the allowed directories", path.display())]
    AccessDenied { path: PathBuf },

    /// The document or directory does not exist.
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A navigation override could not be parsed.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Any other filesystem failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The request itself is unusable (wrong file type, empty edit list).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An edit's `old_text` does not occur in the document.
    #[error("edit not applied to {}: text not found: {old_text:?}", path.display())]
    EditNotApplied { path: PathBuf, old_text: String },
}

impl DocError {
    /// Classify an `io::Error` raised while touching `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            DocError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            DocError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn access_denied(path: impl Into<PathBuf>) -> Self {
        DocError::AccessDenied { path: path.into() }
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        DocError::NotFound { path: path.into() }
    }
}

pub type Result<T> = std::result::Result<T, DocError>;
