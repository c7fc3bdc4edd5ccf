use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use super::metadata::Metadata;

/// An inline `[text](target)` link found in a document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownLink {
    pub text: String,
    pub target: String,
    /// 1-based line number within the body.
    pub line: usize,
}

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(!?)\[([^\]]*)\]\(\s*(?:<([^>]*)>|([^)\s]*))(?:\s+"[^"]*")?\s*\)"#)
            .expect("Invalid link pattern")
    })
}

/// Collect inline links outside fenced code blocks. Images are skipped.
pub fn extract_links(body: &str) -> Vec<MarkdownLink> {
    let mut links = Vec::new();
    let mut fence: Option<&str> = None;

    for (idx, line) in body.lines().enumerate() {
        let trimmed = line.trim_start();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        for caps in link_pattern().captures_iter(line) {
            if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
                continue;
            }
            links.push(MarkdownLink {
                text: caps[2].to_string(),
                // `<...>` targets may contain spaces.
                target: caps
                    .get(3)
                    .or_else(|| caps.get(4))
                    .map_or("", |m| m.as_str())
                    .to_string(),
                line: idx + 1,
            });
        }
    }

    links
}

/// Text of the first level-1 ATX heading, if any.
pub fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().trim_end_matches('#').trim().to_string())
        .filter(|title| !title.is_empty())
}

/// `getting-started.md` → `Getting Started`.
pub fn title_from_filename(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    stem.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title precedence: `title` field, first `# ` heading, then the filename.
pub fn derive_title(metadata: &Metadata, body: &str, file_name: &str) -> String {
    metadata
        .title()
        .map(str::to_string)
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| title_from_filename(file_name))
}
