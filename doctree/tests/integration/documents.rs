//! Reading, writing, editing and searching documents

use std::fs;
use std::sync::Arc;
use std::thread;

use doctree::{DocError, Edit, MetaValue, Metadata};

use super::helpers::*;

/// Test: Metadata written through the store reads back unchanged
#[test]
fn test_write_read_round_trip() {
    let temp_dir = docs_root(&[]);
    let store = open_store(temp_dir.path());

    let mut metadata = Metadata::new();
    metadata.insert("title", "Release: 2.0");
    metadata.insert("description", "Multi-line\nsummary");
    metadata.insert("status", "review");
    metadata.insert("order", 3.0);
    metadata.insert("draft", false);
    metadata.insert(
        "tags",
        MetaValue::List(vec!["release".to_string(), "notes, misc".to_string()]),
    );
    metadata.insert("version", "1.10");
    metadata.insert("custom_key", MetaValue::Null);

    let body = "# Release\n\nDetails.\n";
    store
        .write_document("releases/2.0.md", body, &metadata)
        .expect("Failed to write document");

    let doc = store
        .read_document("releases/2.0.md")
        .expect("Failed to read document");
    assert_eq!(doc.metadata, metadata);
    assert_eq!(doc.body, body);

    let keys: Vec<&str> = doc.metadata.iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        vec!["title", "description", "status", "order", "draft", "tags", "version", "custom_key"]
    );
}

/// Test: A document without metadata is written as plain markdown
#[test]
fn test_write_without_metadata() {
    let temp_dir = docs_root(&[]);
    let store = open_store(temp_dir.path());

    store
        .write_document("plain.md", "# Plain\n", &Metadata::new())
        .expect("Failed to write document");
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("plain.md")).unwrap(),
        "# Plain\n"
    );
}

/// Test: Replacing text with itself leaves the file byte-identical
#[test]
fn test_edit_idempotence() {
    let original = "---\ntitle: Stable\n---\nSome body text.\n";
    let temp_dir = docs_root(&[("a.md", original)]);
    let store = open_store(temp_dir.path());

    store
        .edit_document("a.md", &[Edit::new("body", "body")])
        .expect("Failed to edit");
    assert_eq!(fs::read_to_string(temp_dir.path().join("a.md")).unwrap(), original);

    let edits = [Edit::new("Some body", "Other body")];
    store.edit_document("a.md", &edits).expect("Failed to edit");
    let after_first = fs::read_to_string(temp_dir.path().join("a.md")).unwrap();

    // The replaced text is gone, so repeating the edit changes nothing.
    let err = store.edit_document("a.md", &edits).unwrap_err();
    assert!(matches!(err, DocError::EditNotApplied { .. }));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("a.md")).unwrap(),
        after_first
    );
}

/// Test: Editing the front matter changes parsed metadata
#[test]
fn test_edit_front_matter() {
    let temp_dir = docs_root(&[("a.md", "---\nstatus: draft\n---\nBody\n")]);
    let store = open_store(temp_dir.path());

    let doc = store
        .edit_document("a.md", &[Edit::new("status: draft", "status: published")])
        .expect("Failed to edit");
    assert_eq!(doc.metadata.status(), Some(doctree::DocStatus::Published));
}

/// Test: Listing is sorted by path and includes index documents
#[test]
fn test_list_documents_sorted() {
    let temp_dir = docs_root(&[
        ("b.md", ""),
        ("guides/index.md", "---\ntitle: Guides\n---\n"),
        ("a.md", ""),
        ("guides/z.markdown", ""),
        ("image.png", ""),
    ]);
    let store = open_store(temp_dir.path());

    let paths: Vec<String> = store
        .list_documents("")
        .expect("Failed to list")
        .into_iter()
        .map(|summary| summary.path)
        .collect();
    assert_eq!(paths, vec!["a.md", "b.md", "guides/index.md", "guides/z.markdown"]);

    let guides = store.list_documents("guides").expect("Failed to list");
    assert_eq!(guides.len(), 2);
    assert_eq!(guides[0].name, "index.md");
    assert_eq!(guides[0].metadata.title(), Some("Guides"));
}

/// Test: Deleting removes the file and refuses directories
#[test]
fn test_delete_document() {
    let temp_dir = docs_root(&[("guides/a.md", "x")]);
    let store = open_store(temp_dir.path());

    assert!(matches!(
        store.delete_document("guides").unwrap_err(),
        DocError::InvalidInput(_)
    ));
    store
        .delete_document("guides/a.md")
        .expect("Failed to delete");
    assert!(store.list_documents("").unwrap().is_empty());
}

/// Test: Search combines text, tag and status filters
#[test]
fn test_search_documents() {
    let temp_dir = docs_root(&[
        (
            "deploy.md",
            "---\ntitle: Deploy\ndescription: Shipping to production\nstatus: published\ntags: [ops]\n---\n",
        ),
        (
            "guides/rollback.md",
            "---\ntitle: Rollback\nstatus: draft\ntags: [ops, recovery]\n---\nUndo a production deploy.\n",
        ),
        ("misc.md", "Nothing relevant.\n"),
    ]);
    let store = open_store(temp_dir.path());

    let search = |query: &str, tags: &[&str], status: Option<&str>| -> Vec<String> {
        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        store
            .search_documents("", query, &tags, status)
            .expect("Failed to search")
            .into_iter()
            .map(|summary| summary.path)
            .collect()
    };

    assert_eq!(search("Production", &[], None), vec!["deploy.md", "guides/rollback.md"]);
    assert_eq!(search("", &["recovery"], None), vec!["guides/rollback.md"]);
    assert_eq!(search("", &["ops"], Some("published")), vec!["deploy.md"]);
    assert_eq!(search("", &[], None).len(), 3);
    assert!(search("deploy", &["ops", "missing"], None).is_empty());
}

/// Test: Concurrent edits of one document are applied one at a time
#[test]
fn test_concurrent_edits_serialized() {
    let temp_dir = docs_root(&[("log.md", "<!-- end -->\n")]);
    let store = Arc::new(open_store(temp_dir.path()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .edit_document("log.md", &[Edit::new("<!-- end -->", format!("- entry {i}\n<!-- end -->"))])
                    .expect("Failed to edit")
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Edit thread panicked");
    }

    let content = fs::read_to_string(temp_dir.path().join("log.md")).unwrap();
    for i in 0..8 {
        assert!(content.contains(&format!("- entry {i}\n")), "lost edit {i}");
    }
    assert_eq!(content.lines().count(), 9);
}
