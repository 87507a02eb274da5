use crate::adapter::LanguageAdapter;
use crate::language::Language;
use crate::paths::{append_extension, dotted_segments, join_under_root};
use crate::scan::{compile, indented_block_end, statement_end, PYTHON};
use crate::types::{ImportStatement, ImportedSymbol};
use once_cell::sync::Lazy;
use regex::{escape, Regex};
use std::collections::HashSet;
use std::path::PathBuf;

static IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*import\s+(.+)$").expect("valid python import regex"));
static FROM_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*from\s+([\w\.]+)\s+import\s+(.+)$").expect("valid python from-import regex")
});
static DOTTED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\.]+$").expect("valid dotted name regex"));

/// `import a.b` / `from a.b import x`; packages resolve to `a/b.py` or `a/b/__init__.py`
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonAdapter;

impl LanguageAdapter for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn scan_imports(&self, source: &str) -> Vec<ImportStatement> {
        let mut statements = Vec::new();
        let mut seen_lines = HashSet::new();

        for line in logical_lines(source) {
            let normalized = line.trim();
            if normalized.is_empty() || !seen_lines.insert(normalized.to_string()) {
                continue;
            }

            if let Some(caps) = FROM_IMPORT.captures(normalized) {
                let module = caps[1].to_string();
                let mut symbols = vec![ImportedSymbol::module(&module)];
                let mut names = HashSet::new();
                for name in imported_names(&caps[2]) {
                    if names.insert(name.clone()) {
                        symbols.push(ImportedSymbol::object(name));
                    }
                }
                statements.push(ImportStatement::new(normalized, module, symbols));
            } else if let Some(caps) = IMPORT.captures(normalized) {
                for module in imported_names(&caps[1]) {
                    if DOTTED_NAME.is_match(&module) {
                        statements.push(ImportStatement::new(
                            normalized,
                            module.clone(),
                            vec![ImportedSymbol::module(module)],
                        ));
                    }
                }
            }
        }
        statements
    }

    fn resolve_module(&self, module: &str, roots: &[PathBuf]) -> Option<PathBuf> {
        let parts = dotted_segments(module)?;
        for base in roots {
            let candidate = join_under_root(base, &parts);
            let file = append_extension(&candidate, "py");
            if file.is_file() {
                return Some(file);
            }
            let package = candidate.join("__init__.py");
            if package.is_file() {
                return Some(package);
            }
        }
        None
    }

    fn find_block(&self, source: &str, name: &str) -> Option<String> {
        let re = compile(&format!(
            r"(?m)^[ \t]*((?:async[ \t]+)?(?:def|class)[ \t]+{}\b)",
            escape(name)
        ))?;
        let caps = re.captures(source)?;
        let start = caps.get(1)?.start();
        let end = indented_block_end(source, start);
        Some(source[start..end].trim_end().to_string())
    }

    fn find_assignment(&self, source: &str, name: &str) -> Option<String> {
        let re = compile(&format!(
            r"(?m)^{}[ \t]*(?::[^=\n]*)?=(?:[^=]|$)",
            escape(name)
        ))?;
        let start = re.find_iter(source).last()?.start();
        let end = statement_end(source, start, PYTHON, false);
        Some(source[start..end].trim().to_string())
    }

    fn reexport_modules(&self, source: &str, name: &str) -> Vec<String> {
        let Some(re) = compile(&format!(
            r"(?m)^[ \t]*from[ \t]+([\w\.]+)[ \t]+import[ \t]+[^\n]*\b{}\b",
            escape(name)
        )) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        re.captures_iter(source)
            .map(|caps| caps[1].to_string())
            .filter(|module| seen.insert(module.clone()))
            .collect()
    }
}

/// Source lines with parenthesised or backslash-continued import statements joined.
fn logical_lines(source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for line in source.lines() {
        let current = match pending.take() {
            Some(mut acc) => {
                acc.push(' ');
                acc.push_str(line.trim());
                acc
            }
            None => line.to_string(),
        };

        let trimmed = current.trim_start();
        let is_import = trimmed.starts_with("import ") || trimmed.starts_with("from ");
        let unclosed = current.matches('(').count() > current.matches(')').count();
        let continued = current.trim_end().ends_with('\\');
        if is_import && (unclosed || continued) {
            pending = Some(current.trim_end().trim_end_matches('\\').trim_end().to_string());
            continue;
        }
        lines.push(current);
    }
    if let Some(rest) = pending {
        lines.push(rest);
    }
    lines
}

/// Names listed after `import`: comments, parentheses and `as` aliases stripped.
fn imported_names(list: &str) -> Vec<String> {
    let list = list.split('#').next().unwrap_or_default();
    list.replace(['(', ')'], " ")
        .split(',')
        .filter_map(|item| item.split_whitespace().next())
        .filter(|name| *name != "*")
        .filter(|name| DOTTED_NAME.is_match(name))
        .map(str::to_string)
        .collect()
}
