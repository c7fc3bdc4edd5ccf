//! Path sandbox: every filesystem path the core touches goes through here.

mod paths;

pub use paths::{
    canonicalize_lenient, expand_tilde, join_relative_posix, normalize_lexically, to_relative_string,
};

use crate::error::{DocError, Result};
use std::path::{Path, PathBuf};

/// An ordered set of canonical root directories.
#[derive(Debug, Clone)]
pub struct PathSandbox {
    roots: Vec<PathBuf>,
}

impl PathSandbox {
    /// Build a sandbox from root specs (`~` allowed). Every root must exist.
    pub fn new<I, S>(roots: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut canonical = Vec::new();
        for root in roots {
            let expanded = expand_tilde(root.as_ref());
            let resolved = expanded
                .canonicalize()
                .map_err(|e| DocError::from_io(&expanded, e))?;
            if !resolved.is_dir() {
                return Err(DocError::InvalidInput(format!(
                    "root is not a directory: {}",
                    resolved.display()
                )));
            }
            canonical.push(resolved);
        }
        if canonical.is_empty() {
            return Err(DocError::InvalidInput(
                "at least one allowed root is required".to_string(),
            ));
        }
        Ok(Self { roots: canonical })
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// The first root, used when a caller passes an empty path.
    pub fn default_root(&self) -> &Path {
        &self.roots[0]
    }

    /// Whether `path` (already canonical) is a root or lies beneath one.
    pub fn contains(&self, path: &Path) -> bool {
        self.containing_root(path).is_some()
    }

    fn containing_root(&self, path: &Path) -> Option<&Path> {
        self.roots
            .iter()
            .find(|root| path.starts_with(root))
            .map(PathBuf::as_path)
    }

    /// Resolve `candidate` to a canonical absolute path inside the sandbox.
    ///
    /// Order: the path as given (relative to the working directory), then
    /// `root/candidate` for each root, preferring one that exists on disk.
    /// A not-yet-existing target is accepted under the first root that
    /// contains it so that new documents can be written.
    pub fn resolve(&self, candidate: &str) -> Result<PathBuf> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Ok(self.default_root().to_path_buf());
        }

        let expanded = expand_tilde(trimmed);
        let absolute = if expanded.is_absolute() {
            expanded.clone()
        } else {
            std::env::current_dir()
                .map_err(|e| DocError::from_io(&expanded, e))?
                .join(&expanded)
        };

        let direct = canonicalize_lenient(&absolute);
        if self.contains(&direct) {
            tracing::trace!(path = %direct.display(), "resolved directly");
            return Ok(direct);
        }

        if !expanded.is_absolute() {
            let mut fallback = None;
            for root in &self.roots {
                let joined = canonicalize_lenient(&root.join(&expanded));
                if !joined.starts_with(root) {
                    continue;
                }
                if joined.exists() {
                    tracing::trace!(path = %joined.display(), "resolved under root");
                    return Ok(joined);
                }
                if fallback.is_none() {
                    fallback = Some(joined);
                }
            }
            if let Some(path) = fallback {
                return Ok(path);
            }
        }

        tracing::warn!(candidate, "path rejected by sandbox");
        Err(DocError::access_denied(direct))
    }

    /// Root-relative, forward-slash form of a resolved path.
    pub fn relative(&self, path: &Path) -> Result<String> {
        let root = self
            .containing_root(path)
            .ok_or_else(|| DocError::access_denied(path))?;
        to_relative_string(path, root).ok_or_else(|| DocError::access_denied(path))
    }
}
