//! Structure trees and navigation resolution

use doctree::{NavigationSource, TreeNode};

use super::helpers::*;

fn item_titles(section: &doctree::NavigationSection) -> Vec<&str> {
    section.items.iter().map(|item| item.title.as_str()).collect()
}

/// Test: Index metadata names the section and `order` sorts its items
#[test]
fn test_guides_section_orders_items_by_order() {
    let temp_dir = docs_root(&[
        ("guides/index.md", "---\ntitle: Guides\n---\n"),
        ("guides/x.md", "---\norder: 2\n---\n"),
        ("guides/y.md", "---\norder: 1\n---\n"),
    ]);
    let store = open_store(temp_dir.path());

    let sections = store.get_navigation("").expect("Failed to get navigation");

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "Guides");
    assert_eq!(sections[0].path.as_deref(), Some("guides"));
    assert_eq!(item_titles(&sections[0]), vec!["y", "x"]);
}

/// Test: Invalid `.navigation` falls back to `_navigation.json`, then to the tree
#[test]
fn test_invalid_override_falls_back() {
    let temp_dir = docs_root(&[
        ("a.md", "---\ntitle: Alpha\n---\n"),
        (".navigation", "[{ this is not json"),
        (
            "_navigation.json",
            r#"[{"title": "From JSON", "path": null, "items": [{"title": "Alpha", "path": "a.md"}]}]"#,
        ),
    ]);
    let store = open_store(temp_dir.path());

    let navigation = store
        .resolve_navigation("")
        .expect("Failed to resolve navigation");
    assert_eq!(
        navigation.source,
        NavigationSource::Override("_navigation.json".to_string())
    );
    assert_eq!(navigation.sections[0].title, "From JSON");

    std::fs::remove_file(temp_dir.path().join("_navigation.json"))
        .expect("Failed to remove _navigation.json");

    let navigation = store
        .resolve_navigation("")
        .expect("Failed to resolve navigation");
    assert_eq!(navigation.source, NavigationSource::Derived);
    assert_eq!(navigation.sections.len(), 1);
    assert_eq!(navigation.sections[0].path, None);
    assert_eq!(item_titles(&navigation.sections[0]), vec!["Alpha"]);
}

/// Test: A valid `.navigation` wins and keeps its authored order
#[test]
fn test_override_keeps_authored_order() {
    let temp_dir = docs_root(&[
        ("a.md", ""),
        ("b.md", ""),
        (
            ".navigation",
            r#"[
                {"title": "Zeta", "items": [{"title": "B", "path": "b.md"}, {"title": "A", "path": "a.md"}]},
                {"title": "Alpha", "items": [{"title": "A", "path": "a.md"}]},
                {"title": "Empty", "items": []}
            ]"#,
        ),
    ]);
    let store = open_store(temp_dir.path());

    let sections = store.get_navigation("").expect("Failed to get navigation");
    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Zeta", "Alpha"]);
    assert_eq!(item_titles(&sections[0]), vec!["B", "A"]);
}

/// Test: Navigation of a subdirectory yields root-relative paths
#[test]
fn test_subdirectory_navigation_paths() {
    let temp_dir = docs_root(&[
        ("guides/setup.md", "---\ntitle: Setup\n---\n"),
        ("guides/advanced/tuning.md", "---\ntitle: Tuning\n---\n"),
    ]);
    let store = open_store(temp_dir.path());

    let sections = store
        .get_navigation("guides")
        .expect("Failed to get navigation");
    assert_eq!(sections.len(), 2);

    let advanced = sections
        .iter()
        .find(|s| s.path.as_deref() == Some("guides/advanced"))
        .expect("Missing advanced section");
    assert_eq!(advanced.items[0].path, "guides/advanced/tuning.md");

    let root = sections.iter().find(|s| s.path.is_none()).unwrap();
    assert_eq!(root.title, "guides");
    assert_eq!(root.items[0].path, "guides/setup.md");
}

/// Test: Structure children sort by order, then name, stably across calls
#[test]
fn test_structure_sort_is_stable() {
    let temp_dir = docs_root(&[
        ("b.md", ""),
        ("A.md", ""),
        ("a.md", ""),
        ("first.md", "---\norder: 0\n---\n"),
        ("docs/index.md", "---\ntitle: Docs\norder: 5\n---\n"),
        ("notes.txt", "ignored"),
        (".hidden.md", "ignored"),
    ]);
    let store = open_store(temp_dir.path());

    let names = |node: &TreeNode| -> Vec<String> {
        node.children().iter().map(|c| c.name().to_string()).collect()
    };

    let tree = store.get_structure("").expect("Failed to get structure");
    let expected = vec!["first.md", "docs", "A.md", "a.md", "b.md"];
    assert_eq!(names(&tree), expected);

    for _ in 0..3 {
        let again = store.get_structure("").expect("Failed to get structure");
        assert_eq!(again, tree);
    }

    let docs = &tree.children()[1];
    assert!(docs.is_directory());
    assert_eq!(docs.metadata().title(), Some("Docs"));
    assert!(docs.children().is_empty());
}

/// Test: Structure nodes serialize with a lowercase `type` tag
#[test]
fn test_structure_json_shape() {
    let temp_dir = docs_root(&[("guides/a.md", "---\ntitle: A\n---\n")]);
    let store = open_store(temp_dir.path());

    let tree = store.get_structure("").expect("Failed to get structure");
    let json = serde_json::to_value(&tree).expect("Failed to serialize");

    assert_eq!(json["type"], "directory");
    assert_eq!(json["children"][0]["type"], "directory");
    assert_eq!(json["children"][0]["path"], "guides");
    assert_eq!(json["children"][0]["children"][0]["type"], "file");
    assert_eq!(json["children"][0]["children"][0]["metadata"]["title"], "A");
}
