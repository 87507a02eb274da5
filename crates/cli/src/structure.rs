//! Directory dump: an indented tree of a project plus, optionally, the content of
//! every selected file between banner lines.

use anyhow::{Context, Result};
use context_lang::{canonical_path, SourceCache};
use context_protocol::path_filters::{matches_any, matches_file_type};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const BANNER_LEAD: &str = "----------------------------------";
const BANNER_TAIL: &str = "-----------------------------------";
/// Blank lines around every banner
const BANNER_GAP: &str = "\n\n";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureOptions {
    pub root: PathBuf,
    /// File name suffixes to select (`.py`); empty selects everything
    pub file_types: Vec<String>,
    /// Append the content of every selected file
    pub give_file_content: bool,
    pub exclude_files: Vec<String>,
    pub exclude_folders: Vec<String>,
    pub exclude_empty_files: bool,
    /// When non-empty, only these files are selected
    pub only_files: Vec<String>,
    /// Hide unselected files, and folders without selected files, from the tree
    pub exclude_also_from_structure: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureReport {
    pub project_structure: String,
    /// Absolute paths of every file listed in the tree
    pub files: Vec<PathBuf>,
    pub full_output: String,
}

pub fn show_structure(options: &StructureOptions) -> Result<StructureReport> {
    let root = &options.root;
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let mut tree = String::new();
    let mut files = Vec::new();
    let mut contents = String::new();
    let cache = SourceCache::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by(dirs_first)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || options.include_directory(entry.path())
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        let indent = "\t".repeat(entry.depth() - 1);
        let name = entry.file_name().to_string_lossy();

        if entry.file_type().is_dir() {
            tree.push_str(&format!("{indent}• {name}\n"));
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let selected = options.include_file(entry.path());
        if !options.exclude_also_from_structure || selected {
            tree.push_str(&format!("{indent}○ {name}\n"));
            files.push(canonical_path(entry.path()));
        }
        if options.give_file_content && selected {
            let text = cache
                .read(entry.path())
                .with_context(|| format!("Failed to read {}", entry.path().display()))?;
            contents.push_str(&file_block(entry.path(), &name, &text));
        }
    }

    let file_types = if options.file_types.is_empty() {
        "all files".to_string()
    } else {
        options.file_types.join(", ")
    };
    let project_structure = format!(
        "Structure [{file_types}] from folder [{}]:\n{}{tree}{}",
        root.display(),
        framed("project structure start"),
        framed("project structure end"),
    );

    let mut full_output = project_structure.clone();
    if options.give_file_content {
        full_output.push_str(&framed("outputting file content of each file start"));
        full_output.push_str(&contents);
        full_output.push_str(&framed("outputting file content of each file end"));
    }

    log::info!("Listed {} files under {}", files.len(), root.display());
    Ok(StructureReport {
        project_structure,
        files,
        full_output,
    })
}

impl StructureOptions {
    fn include_file(&self, path: &Path) -> bool {
        let absolute = canonical_path(path);
        if matches_any(path, &self.exclude_files) || matches_any(&absolute, &self.exclude_files) {
            return false;
        }
        if !self.only_files.is_empty()
            && !matches_any(path, &self.only_files)
            && !matches_any(&absolute, &self.only_files)
        {
            return false;
        }
        if !matches_file_type(path, &self.file_types) {
            return false;
        }
        if self.exclude_empty_files {
            return path.metadata().map(|meta| meta.len() > 0).unwrap_or(false);
        }
        true
    }

    fn include_directory(&self, path: &Path) -> bool {
        if matches_any(path, &self.exclude_folders)
            || matches_any(&canonical_path(path), &self.exclude_folders)
        {
            return false;
        }
        if !self.exclude_also_from_structure {
            return true;
        }
        WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .any(|entry| self.include_file(entry.path()))
    }
}

/// Directories before files, then case-insensitive name
fn dirs_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_file()
        .cmp(&b.file_type().is_file())
        .then_with(|| {
            a.file_name()
                .to_string_lossy()
                .to_lowercase()
                .cmp(&b.file_name().to_string_lossy().to_lowercase())
        })
}

fn banner(text: &str) -> String {
    format!("{BANNER_LEAD}{text}{BANNER_TAIL}")
}

fn framed(text: &str) -> String {
    format!("{BANNER_GAP}{}{BANNER_GAP}", banner(text))
}

fn file_block(path: &Path, name: &str, text: &str) -> String {
    format!(
        "{}\n{}{text}{}",
        path.display(),
        framed(&format!("File content of >>> {name} <<< start")),
        framed(&format!("File content of >>> {name} <<< end")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn fixture() -> tempfile::TempDir {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src/__pycache__")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("src/app.py"), "import tools\n").unwrap();
        fs::write(root.join("src/Empty.py"), "").unwrap();
        fs::write(root.join("src/__pycache__/app.pyc"), "x").unwrap();
        fs::write(root.join("docs/readme.md"), "# docs\n").unwrap();
        fs::write(root.join("setup.py"), "VERSION = 1\n").unwrap();
        temp
    }

    fn tree_lines(report: &StructureReport) -> Vec<&str> {
        report
            .project_structure
            .lines()
            .filter(|line| line.contains('•') || line.contains('○'))
            .collect()
    }

    #[test]
    fn tree_lists_directories_first_with_tabs() {
        let temp = fixture();
        let report = show_structure(&StructureOptions {
            root: temp.path().to_path_buf(),
            exclude_folders: vec!["__pycache__".to_string()],
            ..StructureOptions::default()
        })
        .unwrap();

        assert_eq!(
            tree_lines(&report),
            vec![
                "• docs",
                "\t○ readme.md",
                "• src",
                "\t○ app.py",
                "\t○ Empty.py",
                "○ setup.py",
            ]
        );
        assert_eq!(report.files.len(), 4);
        assert!(report
            .project_structure
            .starts_with("Structure [all files] from folder ["));
        assert_eq!(report.full_output, report.project_structure);
    }

    #[test]
    fn pruned_structure_and_file_content() {
        let temp = fixture();
        let report = show_structure(&StructureOptions {
            root: temp.path().to_path_buf(),
            file_types: vec![".py".to_string()],
            give_file_content: true,
            exclude_files: vec!["setup.py".to_string()],
            exclude_empty_files: true,
            exclude_also_from_structure: true,
            ..StructureOptions::default()
        })
        .unwrap();

        assert_eq!(tree_lines(&report), vec!["• src", "\t○ app.py"]);
        assert_eq!(
            report.files,
            vec![canonical_path(&temp.path().join("src/app.py"))]
        );

        let start = banner("File content of >>> app.py <<< start");
        let end = banner("File content of >>> app.py <<< end");
        let body = format!("\n\n{start}\n\nimport tools\n\n\n{end}\n\n");
        assert!(report.full_output.contains(&body));
        assert!(report
            .full_output
            .contains(&banner("outputting file content of each file end")));
        assert!(!report.full_output.contains("VERSION"));
    }

    #[test]
    fn only_files_narrow_the_selection() {
        let temp = fixture();
        let report = show_structure(&StructureOptions {
            root: temp.path().to_path_buf(),
            only_files: vec!["readme.md".to_string()],
            exclude_also_from_structure: true,
            ..StructureOptions::default()
        })
        .unwrap();
        assert_eq!(
            report.files,
            vec![canonical_path(&temp.path().join("docs/readme.md"))]
        );
    }

    #[test]
    fn banners_have_the_expected_shape() {
        let line = banner("project structure start");
        assert!(line.starts_with(&"-".repeat(34)));
        assert!(line.ends_with(&format!("start{}", "-".repeat(35))));
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = tempdir().unwrap();
        let options = StructureOptions {
            root: temp.path().join("absent"),
            ..StructureOptions::default()
        };
        assert!(show_structure(&options).is_err());
    }
}
