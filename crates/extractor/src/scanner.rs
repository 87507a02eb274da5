use context_lang::canonical_path;
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Finds importing files below a directory (.gitignore aware, sorted)
pub struct FileScanner {
    root: PathBuf,
    extensions: Vec<String>,
    excluded: HashSet<PathBuf>,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extensions: Vec::new(),
            excluded: HashSet::new(),
        }
    }

    /// Only files with one of these extensions are returned
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Files to leave out, compared by canonical path
    #[must_use]
    pub fn with_excluded(mut self, paths: &[PathBuf]) -> Self {
        self.excluded = paths.iter().map(|path| canonical_path(path)).collect();
        self
    }

    pub fn scan(&self) -> Vec<PathBuf> {
        if self.root.is_file() {
            return self
                .accepts(&self.root)
                .then(|| self.root.clone())
                .into_iter()
                .collect();
        }

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .sort_by_file_name(|a, b| a.cmp(b));
        builder.filter_entry(move |entry| !is_ignored_scope(entry.path(), &root));

        let mut files = Vec::new();
        for result in builder.build() {
            match result {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                        continue;
                    }
                    let path = entry.path();
                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > MAX_FILE_SIZE_BYTES {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                MAX_FILE_SIZE_BYTES
                            );
                            continue;
                        }
                    }
                    if self.accepts(path) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        log::info!(
            "Found {} importing files under {}",
            files.len(),
            self.root.display()
        );
        files
    }

    fn accepts(&self, path: &Path) -> bool {
        let known = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .is_some_and(|ext| self.extensions.is_empty() || self.extensions.contains(&ext));
        if !known {
            return false;
        }
        if !self.excluded.is_empty() && self.excluded.contains(&canonical_path(path)) {
            log::debug!("Skipping excluded file {}", path.display());
            return false;
        }
        true
    }
}

fn is_ignored_scope(path: &Path, root: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    relative.components().any(|component| match component {
        std::path::Component::Normal(name) => {
            let lowered = name.to_string_lossy().to_lowercase();
            IGNORED_SCOPES.contains(&lowered.as_str())
        }
        _ => false,
    })
}

const IGNORED_SCOPES: &[&str] = &[
    // VCS / tooling
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    // caches / environments
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".tox",
    ".venv",
    "venv",
    "node_modules",
    // build output
    "bin",
    "obj",
    "target",
];

const MAX_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finds_matching_files_in_sorted_order() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("pkg/node_modules/dep")).unwrap();
        fs::create_dir_all(root.join("pkg/__pycache__")).unwrap();
        fs::write(root.join("b.py"), "import a").unwrap();
        fs::write(root.join("a.py"), "import b").unwrap();
        fs::write(root.join("notes.txt"), "import a").unwrap();
        fs::write(root.join("pkg/view.JS"), "import x from './x'").unwrap();
        fs::write(root.join("pkg/node_modules/dep/index.js"), "").unwrap();
        fs::write(root.join("pkg/__pycache__/a.py"), "").unwrap();

        let files = FileScanner::new(root)
            .with_extensions(["py", "js"])
            .scan();
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.py"),
                PathBuf::from("b.py"),
                PathBuf::from("pkg/view.JS"),
            ]
        );
    }

    #[test]
    fn excluded_files_are_skipped() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("keep.py"), "").unwrap();
        fs::write(root.join("drop.py"), "").unwrap();

        let files = FileScanner::new(root)
            .with_extensions(["py"])
            .with_excluded(&[root.join("drop.py")])
            .scan();
        assert_eq!(files, vec![root.join("keep.py")]);
    }

    #[test]
    fn single_file_root() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("main.cpp");
        fs::write(&file, "#include \"a.h\"").unwrap();

        assert_eq!(
            FileScanner::new(&file).with_extensions(["cpp"]).scan(),
            vec![file.clone()]
        );
        assert!(FileScanner::new(&file).with_extensions(["py"]).scan().is_empty());
    }
}
