use std::path::{Component, Path};

/// True when `path` matches any of the filter entries.
pub fn matches_any(path: &Path, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| path_matches(path, pattern))
}

/// Match a path against one filter entry.
///
/// Absolute entries must name the path exactly. Relative entries are matched
/// against the trailing components of `path`, each component as a glob, so
/// `file.py`, `dir/file.py` and `*.json` all behave like suffix matches.
pub fn path_matches(path: &Path, pattern: &str) -> bool {
    let normalized = normalize_filter_path(pattern);
    if normalized.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy().replace('\\', "/");
    if normalized.starts_with('/') {
        return path_str.trim_end_matches('/') == normalized;
    }

    let names: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let parts: Vec<&str> = normalized.split('/').filter(|p| !p.is_empty()).collect();
    if parts.is_empty() || parts.len() > names.len() {
        return false;
    }

    let tail = &names[names.len() - parts.len()..];
    parts
        .iter()
        .zip(tail)
        .enumerate()
        .all(|(idx, (part, name))| {
            if idx == 0 {
                component_matches(&format!("*{part}"), name)
            } else {
                component_matches(part, name)
            }
        })
}

/// File-type allow-list check; an empty list admits everything.
pub fn matches_file_type(path: &Path, file_types: &[String]) -> bool {
    if file_types.is_empty() {
        return true;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    file_types.iter().any(|ft| name.ends_with(ft.as_str()))
}

fn component_matches(pattern: &str, name: &str) -> bool {
    glob::Pattern::new(pattern)
        .map(|p| p.matches(name))
        .unwrap_or_else(|_| name.ends_with(pattern.trim_start_matches('*')))
}

fn normalize_filter_path(raw: &str) -> String {
    let mut value = raw.trim().replace('\\', "/");
    while value.starts_with("./") {
        value = value[2..].to_string();
    }
    let absolute = value.starts_with('/');
    let value = value.trim_matches('/');
    if value == "." || value.is_empty() {
        return String::new();
    }
    if absolute {
        format!("/{value}")
    } else {
        value.to_string()
    }
}
