use crate::adapter::LanguageAdapter;
use crate::language::Language;
use crate::paths::find_file_with_suffix;
use crate::scan::{brace_block_end, compile, consume_semicolon, line_start, statement_end, C_LIKE};
use crate::types::ImportStatement;
use once_cell::sync::Lazy;
use regex::{escape, Regex};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

static INCLUDE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*#[ \t]*include[ \t]*"([^"\n]+)""#).expect("valid include regex")
});

/// Quoted `#include` directives; system headers (`<...>`) are never followed
#[derive(Debug, Clone, Copy, Default)]
pub struct CppAdapter;

impl LanguageAdapter for CppAdapter {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn scan_imports(&self, source: &str) -> Vec<ImportStatement> {
        INCLUDE
            .captures_iter(source)
            .map(|caps| ImportStatement::new(caps[0].trim(), &caps[1], Vec::new()))
            .collect()
    }

    fn resolve_module(&self, module: &str, roots: &[PathBuf]) -> Option<PathBuf> {
        let relative = Path::new(module);
        roots
            .iter()
            .find_map(|base| find_file_with_suffix(base, relative))
    }

    fn find_block(&self, source: &str, name: &str) -> Option<String> {
        let name = escape(name);
        let type_decl = compile(&format!(
            r"\b(?:class|struct|union|enum(?:\s+class|\s+struct)?)\s+{name}\b"
        ))?;
        let found = type_decl.find_iter(source).find_map(|m| {
            let end = brace_block_end(source, m.start(), C_LIKE)?;
            let end = consume_semicolon(source, end);
            Some(source[m.start()..end].to_string())
        });
        if found.is_some() {
            return found;
        }

        let function = compile(&format!(
            r"(?m)^[ \t]*((?:[\w:<>,\*&~]+[ \t\*&]+)+(?:\w+::)*{name}[ \t]*\()"
        ))?;
        let found = function.captures_iter(source).find_map(|caps| {
            let start = caps.get(1)?.start();
            let end = brace_block_end(source, start, C_LIKE)?;
            Some(source[start..end].to_string())
        });
        found
    }

    /// Last `NAME = ...;` statement or `#define NAME`, whichever comes later
    fn find_assignment(&self, source: &str, name: &str) -> Option<String> {
        let name = escape(name);
        let define = compile(&format!(r"(?m)^[ \t]*(#[ \t]*define[ \t]+{name}\b)"))?
            .captures_iter(source)
            .last()
            .and_then(|caps| caps.get(1))
            .map(|m| (m.start(), statement_end(source, m.start(), C_LIKE, false)));

        let assignment = compile(&format!(r"\b{name}[ \t]*=(?:[^=]|$)"))?
            .find_iter(source)
            .last()
            .map(|m| {
                let start = statement_start(source, m.start());
                (start, statement_end(source, start, C_LIKE, true))
            });

        let (start, end) = match (define, assignment) {
            (Some(d), Some(a)) => {
                if d.0 > a.0 {
                    d
                } else {
                    a
                }
            }
            (d, a) => d.or(a)?,
        };
        Some(source[start..end].trim().to_string())
    }

    /// Every included header may supply the name.
    fn reexport_modules(&self, source: &str, _name: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.scan_imports(source)
            .into_iter()
            .map(|statement| statement.module)
            .filter(|module| seen.insert(module.clone()))
            .collect()
    }
}

/// Declaration prefix on the same line (`static const int`) belongs to the statement,
/// unless a statement or brace ends before the name on that line.
fn statement_start(source: &str, name_pos: usize) -> usize {
    let line = line_start(source, name_pos);
    let prefix = &source[line..name_pos];
    let from = prefix
        .rfind([';', '{', '}'])
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let rest = &prefix[from..];
    line + from + (rest.len() - rest.trim_start().len())
}
