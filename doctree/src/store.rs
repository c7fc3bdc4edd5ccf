//! Typed entry point over a sandboxed documentation tree.
//!
//! Every call re-reads the filesystem. Mutations of one path are serialized
//! through [`PathLocks`] and written under an exclusive advisory lock.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{load_config, CoreConfig};
use crate::document::{Document, DocumentSummary, Edit};
use crate::error::{DocError, Result};
use crate::fs::{locked_read, locked_write, PathLocks};
use crate::health::{HealthOptions, HealthReport, HealthScorer};
use crate::navigation::{Navigation, NavigationResolver, NavigationSection};
use crate::parser::{self, Metadata};
use crate::sandbox::PathSandbox;
use crate::structure::{StructureBuilder, TreeNode};

/// Manager for documents beneath the configured roots.
#[derive(Debug)]
pub struct DocStore {
    sandbox: PathSandbox,
    config: CoreConfig,
    locks: PathLocks,
}

impl DocStore {
    /// Build a store from `config`. Every root must exist.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing root and `InvalidInput` when a root is
    /// not a directory or no root is configured.
    pub fn new(config: CoreConfig) -> Result<Self> {
        let sandbox = PathSandbox::new(&config.roots)?;
        tracing::debug!(roots = ?sandbox.roots(), "document store ready");
        Ok(Self {
            sandbox,
            config,
            locks: PathLocks::new(),
        })
    }

    /// Load a TOML config file and build a store from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated, or if
    /// [`DocStore::new`] rejects its roots.
    pub fn from_config_file(path: &Path) -> anyhow::Result<Self> {
        let config = load_config(path)?;
        Ok(Self::new(config)?)
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn sandbox(&self) -> &PathSandbox {
        &self.sandbox
    }

    /// Resolve `path` and return it with its root-relative form.
    fn locate(&self, path: &str) -> Result<(PathBuf, String)> {
        let resolved = self.sandbox.resolve(path)?;
        let relative = self.sandbox.relative(&resolved)?;
        Ok((resolved, relative))
    }

    fn locate_dir(&self, base: &str) -> Result<(PathBuf, String)> {
        let (dir, rel) = self.locate(base)?;
        let meta = fs::metadata(&dir).map_err(|e| DocError::from_io(&dir, e))?;
        if !meta.is_dir() {
            return Err(DocError::InvalidInput(format!(
                "not a directory: {}",
                dir.display()
            )));
        }
        Ok((dir, rel))
    }

    fn ensure_markdown(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if self.config.is_markdown(&name) {
            Ok(())
        } else {
            Err(DocError::InvalidInput(format!(
                "only markdown documents can be modified: {}",
                path.display()
            )))
        }
    }

    /// Read and parse one document.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` outside the roots, `InvalidInput` for a
    /// directory, and `NotFound` or `Io` when the file cannot be read.
    pub fn read_document(&self, path: &str) -> Result<Document> {
        let (file, rel) = self.locate(path)?;
        if file.is_dir() {
            return Err(DocError::InvalidInput(format!(
                "is a directory: {}",
                file.display()
            )));
        }
        let content = locked_read(&file)?;
        Ok(Document::from_content(rel, &content))
    }

    /// Every document beneath `base`, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` outside the roots, `NotFound` for a missing
    /// `base` and `InvalidInput` when `base` is not a directory.
    pub fn list_documents(&self, base: &str) -> Result<Vec<DocumentSummary>> {
        let (dir, rel) = self.locate_dir(base)?;
        let scan = StructureBuilder::new(&self.config).scan(&dir, &rel);
        Ok(scan.documents.iter().map(Document::summary).collect())
    }

    /// Structure tree rooted at `base`.
    ///
    /// # Errors
    ///
    /// Same as [`DocStore::list_documents`].
    pub fn get_structure(&self, base: &str) -> Result<TreeNode> {
        let (dir, rel) = self.locate_dir(base)?;
        Ok(StructureBuilder::new(&self.config).build(&dir, &rel))
    }

    /// Navigation sections for `base`.
    ///
    /// # Errors
    ///
    /// Same as [`DocStore::list_documents`].
    pub fn get_navigation(&self, base: &str) -> Result<Vec<NavigationSection>> {
        Ok(self.resolve_navigation(base)?.sections)
    }

    /// Navigation together with the source it was read from.
    ///
    /// # Errors
    ///
    /// Same as [`DocStore::list_documents`].
    pub fn resolve_navigation(&self, base: &str) -> Result<Navigation> {
        let (dir, rel) = self.locate_dir(base)?;
        Ok(NavigationResolver::new(&self.config).resolve(&dir, &rel))
    }

    /// Health report for the documents beneath `base`.
    ///
    /// # Errors
    ///
    /// Same as [`DocStore::list_documents`]. Problems found in documents are
    /// reported as issues, not errors.
    pub fn check_health(&self, base: &str, options: &HealthOptions) -> Result<HealthReport> {
        let (dir, rel) = self.locate_dir(base)?;
        Ok(HealthScorer::new(&self.config).score(&dir, &rel, options))
    }

    /// Write `content` with `metadata` as its front matter, replacing any
    /// existing document. Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` outside the roots, `InvalidInput` for a
    /// non-markdown name or a directory, and `Io` when writing fails.
    pub fn write_document(&self, path: &str, content: &str, metadata: &Metadata) -> Result<Document> {
        let (file, rel) = self.locate(path)?;
        self.ensure_markdown(&file)?;
        if file.is_dir() {
            return Err(DocError::InvalidInput(format!(
                "is a directory: {}",
                file.display()
            )));
        }

        let raw = parser::serialize(metadata, content);
        self.locks.with_lock(&file, || {
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent).map_err(|e| DocError::from_io(parent, e))?;
            }
            locked_write(&file, &raw)
        })?;

        tracing::info!(path = %rel, bytes = raw.len(), "wrote document");
        Ok(Document::from_content(rel, &raw))
    }

    /// Apply `edits` in order to the raw file text, front matter included.
    ///
    /// Each `old_text` must be present when its turn comes; its first
    /// occurrence is replaced. If any edit misses, the file is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty edit list, an empty `old_text` or a
    /// non-markdown name, `AccessDenied` outside the roots, `EditNotApplied`
    /// when an `old_text` is not found, and `NotFound` or `Io` from the file.
    pub fn edit_document(&self, path: &str, edits: &[Edit]) -> Result<Document> {
        if edits.is_empty() {
            return Err(DocError::InvalidInput("no edits given".to_string()));
        }
        if edits.iter().any(|edit| edit.old_text.is_empty()) {
            return Err(DocError::InvalidInput(
                "edit old_text cannot be empty".to_string(),
            ));
        }

        let (file, rel) = self.locate(path)?;
        self.ensure_markdown(&file)?;

        let updated = self.locks.with_lock(&file, || -> Result<String> {
            let mut content = locked_read(&file)?;
            for edit in edits {
                let Some(start) = content.find(&edit.old_text) else {
                    return Err(DocError::EditNotApplied {
                        path: file.clone(),
                        old_text: edit.old_text.clone(),
                    });
                };
                content.replace_range(start..start + edit.old_text.len(), &edit.new_text);
            }
            locked_write(&file, &content)?;
            Ok(content)
        })?;

        tracing::info!(path = %rel, edits = edits.len(), "edited document");
        Ok(Document::from_content(rel, &updated))
    }

    /// Remove a single document. Directories are refused.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` outside the roots, `InvalidInput` for a
    /// directory, and `NotFound` or `Io` when removal fails.
    pub fn delete_document(&self, path: &str) -> Result<()> {
        let (file, rel) = self.locate(path)?;
        let meta = fs::symlink_metadata(&file).map_err(|e| DocError::from_io(&file, e))?;
        if meta.is_dir() {
            return Err(DocError::InvalidInput(format!(
                "refusing to delete directory: {}",
                file.display()
            )));
        }

        self.locks
            .with_lock(&file, || fs::remove_file(&file))
            .map_err(|e| DocError::from_io(&file, e))?;

        tracing::info!(path = %rel, "deleted document");
        Ok(())
    }

    /// Case-insensitive search over title, description and body.
    ///
    /// Every tag in `tags` must be present, and `status` must match exactly
    /// when given. An empty query matches every document.
    ///
    /// # Errors
    ///
    /// Same as [`DocStore::list_documents`].
    pub fn search_documents(
        &self,
        base: &str,
        query: &str,
        tags: &[String],
        status: Option<&str>,
    ) -> Result<Vec<DocumentSummary>> {
        let (dir, rel) = self.locate_dir(base)?;
        let scan = StructureBuilder::new(&self.config).scan(&dir, &rel);
        let needle = query.trim().to_lowercase();

        let matches: Vec<DocumentSummary> = scan
            .documents
            .iter()
            .filter(|doc| status.is_none_or(|s| doc.metadata.status_str() == Some(s)))
            .filter(|doc| {
                let doc_tags = doc.metadata.tags();
                tags.iter().all(|tag| doc_tags.contains(&tag.as_str()))
            })
            .filter(|doc| needle.is_empty() || matches_text(doc, &needle))
            .map(Document::summary)
            .collect();

        tracing::debug!(query, results = matches.len(), "searched documents");
        Ok(matches)
    }
}

fn matches_text(doc: &Document, needle: &str) -> bool {
    doc.title().to_lowercase().contains(needle)
        || doc
            .metadata
            .description()
            .is_some_and(|d| d.to_lowercase().contains(needle))
        || doc.body.to_lowercase().contains(needle)
}
