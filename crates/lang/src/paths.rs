//! Filesystem lookups shared by the adapters' module resolution.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions that mark a script import as already naming a concrete file
const SCRIPT_FILE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "vue", "json"];

/// Join module segments under `base`, dropping a leading segment that repeats the
/// root directory's own name (`tools.toolbox` under `/p/tools` is `/p/tools/toolbox`).
pub(crate) fn join_under_root(base: &Path, parts: &[&str]) -> PathBuf {
    let repeats_root = match (parts.first(), base.file_name().and_then(|n| n.to_str())) {
        (Some(first), Some(root_name)) => first.eq_ignore_ascii_case(root_name),
        _ => false,
    };
    let mut candidate = base.to_path_buf();
    for part in &parts[usize::from(repeats_root)..] {
        candidate.push(part);
    }
    candidate
}

/// `dir/name` -> `dir/name.ext` (unlike `with_extension`, keeps any dots already present)
pub(crate) fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(".");
    raw.push(ext);
    PathBuf::from(raw)
}

/// Split a dotted module name; `None` for relative (`.x`) or malformed (`a..b`) names.
pub(crate) fn dotted_segments(module: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = module.split('.').collect();
    if parts.iter().any(|part| part.is_empty()) {
        return None;
    }
    Some(parts)
}

/// First regular file named `file_name` below `base`, walking in sorted order.
pub(crate) fn find_file_named(base: &Path, file_name: &str) -> Option<PathBuf> {
    WalkDir::new(base)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| entry.file_name().to_str() == Some(file_name))
        .map(|entry| entry.into_path())
}

/// First regular file below `base` whose trailing components equal `relative`.
pub(crate) fn find_file_with_suffix(base: &Path, relative: &Path) -> Option<PathBuf> {
    let direct = base.join(relative);
    if direct.is_file() {
        return Some(direct);
    }
    let file_name = relative.file_name()?.to_str()?;
    WalkDir::new(base)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_str() == Some(file_name))
        .find(|entry| entry.path().ends_with(relative))
        .map(|entry| entry.into_path())
}

/// Resolve a JavaScript-family module reference.
///
/// Path-like references (`./lib/util`, `lib/util`, `util.js`) are joined onto each
/// root; dotted references (`lib.util`) are split into path segments. Without an
/// explicit extension each entry of `extensions` is tried, then `index.<ext>`.
pub(crate) fn resolve_script_module(
    module: &str,
    roots: &[PathBuf],
    extensions: &[&str],
) -> Option<PathBuf> {
    let has_extension = Path::new(module)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCRIPT_FILE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    let path_like = has_extension || module.starts_with('.') || module.contains('/');

    let parts: Vec<&str> = if path_like {
        module
            .split('/')
            .filter(|part| !part.is_empty() && *part != ".")
            .collect()
    } else {
        dotted_segments(module)?
    };
    if parts.is_empty() {
        return None;
    }

    for base in roots {
        let candidate = join_under_root(base, &parts);
        if has_extension {
            if candidate.is_file() {
                return Some(candidate);
            }
            continue;
        }
        for ext in extensions {
            let file = append_extension(&candidate, ext);
            if file.is_file() {
                return Some(file);
            }
        }
        for ext in extensions {
            let index = candidate.join(format!("index.{ext}"));
            if index.is_file() {
                return Some(index);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn root_name_is_not_repeated() {
        let base = PathBuf::from("/p/tools");
        assert_eq!(
            join_under_root(&base, &["tools", "toolbox"]),
            PathBuf::from("/p/tools/toolbox")
        );
        assert_eq!(
            join_under_root(&base, &["Tools", "toolbox"]),
            PathBuf::from("/p/tools/toolbox")
        );
        assert_eq!(
            join_under_root(&base, &["lib", "toolbox"]),
            PathBuf::from("/p/tools/lib/toolbox")
        );
    }

    #[test]
    fn appended_extension_keeps_existing_dots() {
        assert_eq!(
            append_extension(Path::new("/p/jquery.min"), "js"),
            PathBuf::from("/p/jquery.min.js")
        );
    }

    #[test]
    fn relative_dotted_names_are_rejected() {
        assert_eq!(dotted_segments(".sibling"), None);
        assert_eq!(dotted_segments("a..b"), None);
        assert_eq!(dotted_segments("a.b"), Some(vec!["a", "b"]));
    }

    #[test]
    fn sorted_walk_is_deterministic() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("b")).unwrap();
        fs::create_dir_all(temp.path().join("a")).unwrap();
        fs::write(temp.path().join("b/Widget.cs"), "").unwrap();
        fs::write(temp.path().join("a/Widget.cs"), "").unwrap();

        let found = find_file_named(temp.path(), "Widget.cs").unwrap();
        assert!(found.ends_with("a/Widget.cs"));
    }

    #[test]
    fn suffix_search_matches_nested_includes() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src/gfx")).unwrap();
        fs::write(temp.path().join("src/gfx/canvas.h"), "").unwrap();

        let found = find_file_with_suffix(temp.path(), Path::new("gfx/canvas.h")).unwrap();
        assert!(found.ends_with("src/gfx/canvas.h"));
        assert!(find_file_with_suffix(temp.path(), Path::new("audio/canvas.h")).is_none());
    }

    #[test]
    fn script_modules_try_extensions_then_index() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("lib/widgets")).unwrap();
        fs::write(temp.path().join("lib/util.js"), "").unwrap();
        fs::write(temp.path().join("lib/widgets/index.js"), "").unwrap();
        let roots = vec![temp.path().to_path_buf()];

        let util = resolve_script_module("./lib/util", &roots, &["js"]).unwrap();
        assert!(util.ends_with("lib/util.js"));
        let dotted = resolve_script_module("lib.util", &roots, &["js"]).unwrap();
        assert_eq!(dotted, util);
        let explicit = resolve_script_module("lib/util.js", &roots, &["js"]).unwrap();
        assert_eq!(explicit, util);
        let index = resolve_script_module("./lib/widgets", &roots, &["js"]).unwrap();
        assert!(index.ends_with("lib/widgets/index.js"));
        assert!(resolve_script_module("react", &roots, &["js"]).is_none());
    }
}
