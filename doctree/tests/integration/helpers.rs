//! Shared test helpers for document store integration tests

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use doctree::{CoreConfig, DocStore, OrphanPolicy};

/// Front matter that satisfies the default required fields
pub const COMPLETE: &str = "---\ntitle: Complete\ndescription: Has everything\nstatus: published\n---\n";

/// Test helper: Write `content` to `rel` beneath `root`, creating parents
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Test helper: Create a temporary documentation root with the given files
pub fn docs_root(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    for (rel, content) in files {
        write_file(temp_dir.path(), rel, content);
    }
    temp_dir
}

/// Test helper: Open a store over a single root
pub fn open_store(root: &Path) -> DocStore {
    let config = CoreConfig::with_roots([root.to_str().expect("Non UTF-8 temp path")]);
    DocStore::new(config).expect("Failed to open store")
}

/// Test helper: Open a store that reports orphans against navigation
pub fn open_store_with_orphans(root: &Path) -> DocStore {
    let config = CoreConfig::with_roots([root.to_str().expect("Non UTF-8 temp path")])
        .with_orphan_policy(OrphanPolicy::ComputeAgainstNavigation);
    DocStore::new(config).expect("Failed to open store")
}
