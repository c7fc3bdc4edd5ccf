//! Sandbox containment through the public store API

use serial_test::serial;
use std::fs;

use doctree::{CoreConfig, DocError, DocStore, PathSandbox};

use super::helpers::*;

/// Test: `../secret` is denied and an empty path resolves to the root
#[test]
fn test_parent_escape_denied_and_empty_is_root() {
    let temp_dir = docs_root(&[("docs/readme.md", "# Readme\n"), ("secret", "hidden")]);
    let docs = temp_dir.path().join("docs");
    let sandbox = PathSandbox::new([docs.to_str().unwrap()]).expect("Failed to build sandbox");

    let err = sandbox.resolve("../secret").unwrap_err();
    assert!(matches!(err, DocError::AccessDenied { .. }));

    assert_eq!(
        sandbox.resolve("").expect("Failed to resolve root"),
        docs.canonicalize().unwrap()
    );
}

/// Test: No store operation reaches outside the root
#[test]
fn test_store_operations_stay_inside_root() {
    let temp_dir = docs_root(&[("docs/a.md", "x"), ("outside.md", "secret")]);
    let store = open_store(&temp_dir.path().join("docs"));
    let outside = temp_dir.path().join("outside.md");
    let outside = outside.to_str().unwrap();

    assert!(matches!(
        store.read_document(outside).unwrap_err(),
        DocError::AccessDenied { .. }
    ));
    assert!(matches!(
        store.read_document("../outside.md").unwrap_err(),
        DocError::AccessDenied { .. }
    ));
    assert!(matches!(
        store.delete_document("../outside.md").unwrap_err(),
        DocError::AccessDenied { .. }
    ));
    assert!(matches!(
        store.get_structure("..").unwrap_err(),
        DocError::AccessDenied { .. }
    ));
    assert_eq!(fs::read_to_string(temp_dir.path().join("outside.md")).unwrap(), "secret");
}

/// Test: A symlinked directory cannot be used to write outside the root
#[cfg(unix)]
#[test]
fn test_symlink_cannot_escape_for_writes() {
    let temp_dir = docs_root(&[("docs/a.md", "x")]);
    let outside = temp_dir.path().join("outside");
    fs::create_dir_all(&outside).unwrap();
    std::os::unix::fs::symlink(&outside, temp_dir.path().join("docs/link")).unwrap();
    let store = open_store(&temp_dir.path().join("docs"));

    let err = store
        .write_document("link/evil.md", "x", &Default::default())
        .unwrap_err();
    assert!(matches!(err, DocError::AccessDenied { .. }));
    assert!(!outside.join("evil.md").exists());
}

/// Test: Documents are found under the second root when the first lacks them
#[test]
fn test_multiple_roots() {
    let temp_dir = docs_root(&[("one/a.md", "first"), ("two/b.md", "second")]);
    let config = CoreConfig::with_roots([
        temp_dir.path().join("one").to_str().unwrap(),
        temp_dir.path().join("two").to_str().unwrap(),
    ]);
    let store = DocStore::new(config).expect("Failed to open store");

    assert_eq!(store.read_document("a.md").unwrap().body, "first");
    assert_eq!(store.read_document("b.md").unwrap().body, "second");
    assert_eq!(store.read_document("b.md").unwrap().path, "b.md");
}

/// Test: `~` roots expand to the home directory
#[test]
#[serial]
fn test_tilde_root_expands_to_home() {
    let temp_dir = docs_root(&[("notes/a.md", "---\ntitle: Home note\n---\n")]);
    let original = std::env::var("HOME").ok();
    std::env::set_var("HOME", temp_dir.path());

    let result = DocStore::new(CoreConfig::with_roots(["~/notes"]))
        .and_then(|store| store.read_document("a.md"));

    match original {
        Some(home) => std::env::set_var("HOME", home),
        None => std::env::remove_var("HOME"),
    }

    let doc = result.expect("Failed to read through ~ root");
    assert_eq!(doc.metadata.title(), Some("Home note"));
}

/// Test: Loading a store from a TOML file
#[test]
fn test_store_from_config_file() {
    let temp_dir = docs_root(&[("docs/a.md", "x")]);
    let config_path = temp_dir.path().join("doctree.toml");
    let docs = temp_dir.path().join("docs");
    fs::write(
        &config_path,
        format!(
            "roots = [\"{}\"]\norphan_policy = \"compute_against_navigation\"\n",
            docs.display()
        ),
    )
    .unwrap();

    let store = DocStore::from_config_file(&config_path).expect("Failed to load store");
    assert_eq!(
        store.config().orphan_policy,
        doctree::OrphanPolicy::ComputeAgainstNavigation
    );
    assert_eq!(store.list_documents("").unwrap().len(), 1);

    fs::write(&config_path, "roots = []\n").unwrap();
    assert!(DocStore::from_config_file(&config_path).is_err());
}
