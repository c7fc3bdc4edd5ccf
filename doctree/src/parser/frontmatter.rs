//! Front-matter codec.
//!
//! Only the subset of YAML that documentation front matter actually uses is
//! understood: `key: scalar`, flow lists (`[a, b]`), block lists (`  - a`) and
//! block scalars (`|` / `>`). Anything else is kept as a bare string.
//!
//! ```text
//! ---
//! title: Getting Started
//! tags: [intro, setup]
//! summary: |
//!   First line.
//!   Second line.
//! ---
//! # Markdown content here
//! ```

use super::metadata::{integral, MetaValue, Metadata};

const DELIMITER: &str = "---";

/// Split `content` into metadata and body.
///
/// Content without a well-formed block (no opening `---` line, or no closing
/// one) yields empty metadata and the content unchanged as the body.
pub fn parse(content: &str) -> (Metadata, String) {
    match split_block(content) {
        Some((block, body)) => (parse_block(block), body.to_string()),
        None => (Metadata::new(), content.to_string()),
    }
}

/// Render metadata and body back into a document.
///
/// Lists become block lists, multi-line strings become `|` block scalars and
/// strings that would read back as another type are double-quoted.
pub fn serialize(metadata: &Metadata, body: &str) -> String {
    if metadata.is_empty() && split_block(body).is_none() {
        return body.to_string();
    }

    let mut out = String::from(DELIMITER);
    out.push('\n');
    for (key, value) in metadata.iter() {
        write_entry(&mut out, key, value);
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(body);
    out
}

/// Locate the front-matter block, returning `(block, body)` slices.
fn split_block(content: &str) -> Option<(&str, &str)> {
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            let block = &content[block_start..offset];
            let body = &content[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BlockStyle {
    Literal,
    Folded,
}

/// Parser states, one per kind of value currently being read.
#[derive(Debug)]
enum State {
    /// Expecting a `key: value` line.
    ScalarLine,
    /// Inside a `[ ... ]` list that has not been closed yet.
    SequenceFlow { key: String, buffer: String },
    /// After `key:` with no inline value; collecting `- item` lines.
    SequenceBlock { key: String, items: Vec<String> },
    /// After `key: |` or `key: >`; collecting indented lines.
    BlockScalar {
        key: String,
        style: BlockStyle,
        lines: Vec<String>,
    },
}

struct BlockParser {
    state: State,
    metadata: Metadata,
}

impl BlockParser {
    fn new() -> Self {
        Self {
            state: State::ScalarLine,
            metadata: Metadata::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        let line = line.trim_end_matches(['\n', '\r']);
        let state = std::mem::replace(&mut self.state, State::ScalarLine);
        self.state = match state {
            State::ScalarLine => self.scalar_line(line),
            State::SequenceFlow { key, mut buffer } => {
                buffer.push(' ');
                buffer.push_str(line.trim());
                if buffer.trim_end().ends_with(']') {
                    self.metadata.insert(key, MetaValue::List(parse_flow(&buffer)));
                    State::ScalarLine
                } else {
                    State::SequenceFlow { key, buffer }
                }
            }
            State::SequenceBlock { key, mut items } => {
                let trimmed = line.trim_start();
                if line.trim().is_empty() {
                    State::SequenceBlock { key, items }
                } else if let Some(item) = block_item(trimmed) {
                    items.push(unquote(item));
                    State::SequenceBlock { key, items }
                } else {
                    self.finish(State::SequenceBlock { key, items });
                    self.scalar_line(line)
                }
            }
            State::BlockScalar {
                key,
                style,
                mut lines,
            } => {
                if line.trim().is_empty() {
                    lines.push(String::new());
                    State::BlockScalar { key, style, lines }
                } else if line.starts_with(' ') || line.starts_with('\t') {
                    lines.push(line.to_string());
                    State::BlockScalar { key, style, lines }
                } else {
                    self.finish(State::BlockScalar { key, style, lines });
                    self.scalar_line(line)
                }
            }
        };
    }

    fn scalar_line(&mut self, line: &str) -> State {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            return State::ScalarLine;
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            tracing::trace!(line, "ignoring nested front-matter line");
            return State::ScalarLine;
        }
        let Some((key, raw)) = line.split_once(':') else {
            tracing::trace!(line, "ignoring front-matter line without key");
            return State::ScalarLine;
        };
        let key = key.trim().to_string();
        if key.is_empty() {
            return State::ScalarLine;
        }

        let value = raw.trim();
        if value.is_empty() {
            return State::SequenceBlock {
                key,
                items: Vec::new(),
            };
        }
        if let Some(style) = block_style(value) {
            return State::BlockScalar {
                key,
                style,
                lines: Vec::new(),
            };
        }
        if value.starts_with('[') {
            if value.ends_with(']') {
                self.metadata.insert(key, MetaValue::List(parse_flow(value)));
                return State::ScalarLine;
            }
            if !value.contains(']') {
                return State::SequenceFlow {
                    key,
                    buffer: value.to_string(),
                };
            }
        }

        self.metadata.insert(key, parse_scalar(value));
        State::ScalarLine
    }

    /// Commit whatever value `state` was accumulating.
    fn finish(&mut self, state: State) {
        match state {
            State::ScalarLine => {}
            State::SequenceFlow { key, buffer } => {
                // Unterminated flow list: keep the raw text.
                self.metadata.insert(key, MetaValue::String(buffer));
            }
            State::SequenceBlock { key, items } => {
                let value = if items.is_empty() {
                    MetaValue::Null
                } else {
                    MetaValue::List(items)
                };
                self.metadata.insert(key, value);
            }
            State::BlockScalar { key, style, lines } => {
                self.metadata
                    .insert(key, MetaValue::String(join_block(&lines, style)));
            }
        }
    }

    fn into_metadata(mut self) -> Metadata {
        let state = std::mem::replace(&mut self.state, State::ScalarLine);
        self.finish(state);
        self.metadata
    }
}

fn parse_block(block: &str) -> Metadata {
    let mut parser = BlockParser::new();
    for line in block.lines() {
        parser.feed(line);
    }
    parser.into_metadata()
}

fn block_style(value: &str) -> Option<BlockStyle> {
    match value {
        "|" | "|-" | "|+" => Some(BlockStyle::Literal),
        ">" | ">-" | ">+" => Some(BlockStyle::Folded),
        _ => None,
    }
}

fn block_item(trimmed: &str) -> Option<&str> {
    if trimmed == "-" {
        Some("")
    } else {
        trimmed.strip_prefix("- ").map(str::trim)
    }
}

fn join_block(lines: &[String], style: BlockStyle) -> String {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);
    let stripped: Vec<&str> = lines
        .iter()
        .map(|l| l.get(indent..).unwrap_or(""))
        .collect();

    let joined = match style {
        BlockStyle::Literal => stripped.join("\n"),
        BlockStyle::Folded => {
            let mut out = String::new();
            let mut previous_blank = true;
            for line in stripped {
                if line.is_empty() {
                    out.push('\n');
                    previous_blank = true;
                } else {
                    if !previous_blank {
                        out.push(' ');
                    }
                    out.push_str(line);
                    previous_blank = false;
                }
            }
            out
        }
    };
    joined.trim_end().to_string()
}

fn parse_flow(value: &str) -> Vec<String> {
    let inner = value
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();
    if inner.is_empty() {
        return Vec::new();
    }
    inner.split(',').map(|item| unquote(item.trim())).collect()
}

/// Typed reading of a single-line value.
pub(crate) fn parse_scalar(value: &str) -> MetaValue {
    match value {
        "true" => return MetaValue::Bool(true),
        "false" => return MetaValue::Bool(false),
        "null" | "~" => return MetaValue::Null,
        ".inf" | "+.inf" | ".Inf" | "+.Inf" | ".INF" | "+.INF" => {
            return MetaValue::Number(f64::INFINITY)
        }
        "-.inf" | "-.Inf" | "-.INF" => return MetaValue::Number(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return MetaValue::Number(f64::NAN),
        _ => {}
    }
    if is_quoted(value, '"') || is_quoted(value, '\'') {
        return MetaValue::String(unquote(value));
    }
    if looks_numeric(value) {
        if let Ok(n) = value.parse::<f64>() {
            return MetaValue::Number(n);
        }
    }
    MetaValue::String(value.to_string())
}

fn looks_numeric(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
}

fn is_quoted(value: &str, quote: char) -> bool {
    value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote)
}

fn unquote(value: &str) -> String {
    if is_quoted(value, '"') {
        unescape(&value[1..value.len() - 1])
    } else if is_quoted(value, '\'') {
        value[1..value.len() - 1].replace("''", "'")
    } else {
        value.to_string()
    }
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

fn write_entry(out: &mut String, key: &str, value: &MetaValue) {
    match value {
        MetaValue::Null => out.push_str(&format!("{key}: null\n")),
        MetaValue::Bool(b) => out.push_str(&format!("{key}: {b}\n")),
        MetaValue::Number(n) => out.push_str(&format!("{key}: {}\n", number(*n))),
        MetaValue::List(items) if items.is_empty() => out.push_str(&format!("{key}: []\n")),
        MetaValue::List(items) => {
            out.push_str(&format!("{key}:\n"));
            for item in items {
                out.push_str(&format!("  - {}\n", list_item(item)));
            }
        }
        MetaValue::String(s) if fits_block_scalar(s) => {
            out.push_str(&format!("{key}: |\n"));
            for line in s.split('\n') {
                if line.is_empty() {
                    out.push('\n');
                } else {
                    out.push_str(&format!("  {line}\n"));
                }
            }
        }
        MetaValue::String(s) => out.push_str(&format!("{key}: {}\n", scalar_string(s))),
    }
}

/// Multi-line strings go into a `|` block unless the block form would lose
/// trailing whitespace, carriage returns or indentation. A block strips the
/// common indent of its lines, so at least one line must start flush, and
/// whitespace-only lines would come back empty.
fn fits_block_scalar(s: &str) -> bool {
    s.contains('\n')
        && !s.contains('\r')
        && s.trim_end() == s
        && s
            .split('\n')
            .all(|line| line.is_empty() || !line.trim().is_empty())
        && s
            .split('\n')
            .any(|line| !line.is_empty() && !line.starts_with([' ', '\t']))
}

fn number(n: f64) -> String {
    if n.is_nan() {
        ".nan".to_string()
    } else if n == f64::INFINITY {
        ".inf".to_string()
    } else if n == f64::NEG_INFINITY {
        "-.inf".to_string()
    } else {
        match integral(n) {
            Some(i) => i.to_string(),
            None => n.to_string(),
        }
    }
}

fn scalar_string(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s.trim() != s
        || s.contains('\n')
        || s.contains('\r')
        || s.starts_with(['[', '"', '\'', '|', '>', '#'])
        || s.contains(": ")
        || s.contains(" #")
        || parse_scalar(s) != MetaValue::String(s.to_string());
    if needs_quotes {
        escape(s)
    } else {
        s.to_string()
    }
}

fn list_item(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s.trim() != s
        || s.contains(',')
        || s.contains('\n')
        || s.contains('\r')
        || s.starts_with(['"', '\'']);
    if needs_quotes {
        escape(s)
    } else {
        s.to_string()
    }
}
