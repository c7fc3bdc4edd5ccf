use std::path::{Component, Path, PathBuf};

/// Expand `~` and `~/...` to the invoking user's home directory.
///
/// Paths of the form `~user/...` are left untouched.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root, matching how the OS resolves `/..`.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize a path that may not exist yet.
///
/// The deepest existing ancestor is canonicalized (resolving symlinks) and the
/// missing tail is appended verbatim, so a symlinked parent cannot smuggle a
/// new file outside its root.
pub fn canonicalize_lenient(path: &Path) -> PathBuf {
    let normalized = normalize_lexically(path);
    if let Ok(canonical) = normalized.canonicalize() {
        return canonical;
    }

    let mut tail = Vec::new();
    let mut current = normalized.as_path();
    while let Some(parent) = current.parent() {
        if let Some(name) = current.file_name() {
            tail.push(name.to_os_string());
        }
        if let Ok(canonical) = parent.canonicalize() {
            let mut out = canonical;
            for name in tail.iter().rev() {
                out.push(name);
            }
            return out;
        }
        current = parent;
    }
    normalized
}

/// Forward-slash form of `path` relative to `base`; empty when they are equal.
pub fn to_relative_string(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Resolve a forward-slash `target` against the root-relative directory `base`.
///
/// A leading `/` makes `target` relative to the root instead. Returns `None`
/// when `..` would climb above the root.
pub fn join_relative_posix(base: &str, target: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    let (start, rest) = match target.strip_prefix('/') {
        Some(rest) => ("", rest),
        None => (base, target),
    };
    for segment in start.split('/').chain(rest.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}
