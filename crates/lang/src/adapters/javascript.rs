use crate::adapter::LanguageAdapter;
use crate::language::Language;
use crate::paths::resolve_script_module;
use crate::scan::{brace_block_end, compile, statement_end, SCRIPT};
use crate::types::{ImportStatement, ImportedSymbol};
use once_cell::sync::Lazy;
use regex::{escape, Regex};
use std::collections::HashSet;
use std::path::PathBuf;

static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\bimport\s+(?:(?P<default>[\w$]+)\s*,?\s*)?(?:\{(?P<named>[^}]*)\}\s*|\*\s*as\s+(?P<ns>[\w$]+)\s*)?(?:from\s+)?['"](?P<module>[^'"\n]+)['"]"#,
    )
    .expect("valid script import regex")
});

const SCRIPT_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx"];

/// ES module imports; references resolve to `.js` files or `index.js`
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScriptAdapter;

impl LanguageAdapter for JavaScriptAdapter {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn scan_imports(&self, source: &str) -> Vec<ImportStatement> {
        scan_script_imports(source)
    }

    fn resolve_module(&self, module: &str, roots: &[PathBuf]) -> Option<PathBuf> {
        resolve_script_module(module, roots, SCRIPT_EXTENSIONS)
    }

    fn find_block(&self, source: &str, name: &str) -> Option<String> {
        find_script_block(source, name)
    }

    fn find_assignment(&self, source: &str, name: &str) -> Option<String> {
        find_script_assignment(source, name)
    }

    fn reexport_modules(&self, source: &str, name: &str) -> Vec<String> {
        script_reexports(source, name)
    }
}

pub(crate) fn scan_script_imports(source: &str) -> Vec<ImportStatement> {
    IMPORT
        .captures_iter(source)
        .map(|caps| {
            let mut symbols = Vec::new();
            if let Some(default) = caps.name("default") {
                if default.as_str() != "type" {
                    symbols.push(ImportedSymbol::unknown(default.as_str()));
                }
            }
            if let Some(named) = caps.name("named") {
                for item in named.as_str().split(',') {
                    let Some(name) = item.split_whitespace().find(|word| *word != "type") else {
                        continue;
                    };
                    if name != "default" && !symbols.iter().any(|s| s.name == name) {
                        symbols.push(ImportedSymbol::unknown(name));
                    }
                }
            }
            ImportStatement::new(caps[0].trim(), &caps["module"], symbols)
        })
        .collect()
}

/// `function NAME`, `function* NAME` or `class NAME`, optionally exported or async
pub(crate) fn find_script_block(source: &str, name: &str) -> Option<String> {
    let name = escape(name);
    let re = compile(&format!(
        r"(?:\bexport\s+(?:default\s+)?)?(?:\basync\s+)?(?:\bfunction(?:\s*\*\s*|\s+){name}\b|\bclass\s+{name}\b)"
    ))?;
    let found = re.find_iter(source).find_map(|m| {
        let end = brace_block_end(source, m.start(), SCRIPT)?;
        Some(source[m.start()..end].to_string())
    });
    found
}

pub(crate) fn find_script_assignment(source: &str, name: &str) -> Option<String> {
    let re = compile(&format!(
        r"(?:\bexport\s+)?\b(?:const|let|var)\s+{}\s*=(?:[^=]|$)",
        escape(name)
    ))?;
    let start = re.find_iter(source).last()?.start();
    let end = statement_end(source, start, SCRIPT, true);
    Some(source[start..end].trim().to_string())
}

pub(crate) fn script_reexports(source: &str, name: &str) -> Vec<String> {
    let Some(re) = compile(&format!(
        r#"(?m)^[ \t]*(?:import|export)\b[^;'"=()]*?\b{}\b[^;'"=()]*?\bfrom\s*['"]([^'"\n]+)['"]"#,
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
