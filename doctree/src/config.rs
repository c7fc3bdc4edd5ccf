//! Core configuration loaded from a TOML file or built in code.
//!
//! ```text
//! roots = ["~/docs", "/srv/handbook"]
//! index_file = "index.md"
//! markdown_extensions = ["md", "markdown"]
//! exclude = ["drafts/**", "*.tmp.md"]
//! required_metadata_fields = ["title", "description", "status"]
//! orphan_policy = "disabled"
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_INDEX_FILE: &str = "index.md";

/// How orphaned documents are detected.
///
/// `Disabled` reports zero orphans regardless of what a caller asks for in
/// [`crate::health::HealthOptions::check_orphans`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    #[default]
    Disabled,
    ComputeAgainstNavigation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Allowed roots, in resolution order. The first one is the default directory.
    pub roots: Vec<String>,
    pub index_file: String,
    pub markdown_extensions: Vec<String>,
    /// Glob patterns, matched against root-relative paths, skipped during walks.
    pub exclude: Vec<String>,
    pub required_metadata_fields: Vec<String>,
    pub orphan_policy: OrphanPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            index_file: DEFAULT_INDEX_FILE.to_string(),
            markdown_extensions: vec!["md".to_string(), "markdown".to_string()],
            exclude: Vec::new(),
            required_metadata_fields: default_required_fields(),
            orphan_policy: OrphanPolicy::Disabled,
        }
    }
}

impl CoreConfig {
    pub fn with_roots<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }

    /// Whether `name` carries one of the configured markdown extensions.
    pub fn is_markdown(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.markdown_extensions
                    .iter()
                    .any(|m| m.eq_ignore_ascii_case(ext))
            })
    }

    /// Whether a root-relative path matches any `exclude` pattern.
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(relative))
                .unwrap_or(false)
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.roots.is_empty() {
            bail!("At least one root directory must be configured");
        }
        if self.index_file.trim().is_empty() {
            bail!("index_file cannot be empty");
        }
        if self.markdown_extensions.is_empty() {
            bail!("markdown_extensions cannot be empty");
        }
        for pattern in &self.exclude {
            glob::Pattern::new(pattern)
                .with_context(|| format!("Invalid exclude pattern: {pattern}"))?;
        }
        Ok(())
    }
}

pub fn default_required_fields() -> Vec<String> {
    ["title", "description", "status"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<CoreConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: CoreConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
