use crate::adapter::LanguageAdapter;
use crate::language::Language;
use crate::paths::find_file_named;
use crate::scan::{brace_block_end, compile, statement_end, C_LIKE};
use crate::types::ImportStatement;
use once_cell::sync::Lazy;
use regex::{escape, Regex};
use std::collections::HashSet;
use std::path::PathBuf;

static USING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:global[ \t]+)?using[ \t]+(?:static[ \t]+)?([\w\.]+)[ \t]*;")
        .expect("valid using regex")
});

const TYPE_MODIFIERS: &str =
    r"(?:(?:public|private|protected|internal|static|sealed|abstract|partial|readonly|unsafe|new|file|ref)\s+)*";
const MEMBER_MODIFIERS: &str =
    r"(?:(?:public|private|protected|internal|static|virtual|override|async|abstract|sealed|extern|unsafe|new|partial|readonly|const|volatile)\s+)*";
const TYPE_NAME: &str = r"[\w<>\[\],\.\?]+";

/// `using` directives; a namespace resolves to `<last segment>.cs` anywhere under a root
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpAdapter;

impl LanguageAdapter for CSharpAdapter {
    fn language(&self) -> Language {
        Language::CSharp
    }

    fn scan_imports(&self, source: &str) -> Vec<ImportStatement> {
        USING
            .captures_iter(source)
            .map(|caps| ImportStatement::new(caps[0].trim(), &caps[1], Vec::new()))
            .collect()
    }

    fn resolve_module(&self, module: &str, roots: &[PathBuf]) -> Option<PathBuf> {
        let last = module.rsplit('.').next().filter(|s| !s.is_empty())?;
        let file_name = format!("{last}.cs");
        roots
            .iter()
            .find_map(|base| find_file_named(base, &file_name))
    }

    fn find_block(&self, source: &str, name: &str) -> Option<String> {
        let name = escape(name);
        let type_decl = compile(&format!(
            r"(?m)^[ \t]*({TYPE_MODIFIERS}(?:class|struct|interface|enum|record(?:\s+(?:class|struct))?)\s+{name}\b)"
        ))?;
        let method = compile(&format!(
            r"(?m)^[ \t]*({MEMBER_MODIFIERS}{TYPE_NAME}\s+{name}\s*(?:<[^>\n]*>)?\s*\()"
        ))?;

        [type_decl, method].iter().find_map(|re| {
            re.captures_iter(source).find_map(|caps| {
                let start = caps.get(1)?.start();
                let end = brace_block_end(source, start, C_LIKE)?;
                Some(source[start..end].to_string())
            })
        })
    }

    fn find_assignment(&self, source: &str, name: &str) -> Option<String> {
        let re = compile(&format!(
            r"(?m)^[ \t]*({MEMBER_MODIFIERS}(?:{TYPE_NAME}\s+)?{}\s*=(?:[^=>]|$))",
            escape(name)
        ))?;
        let start = re.captures_iter(source).last()?.get(1)?.start();
        let end = statement_end(source, start, C_LIKE, true);
        Some(source[start..end].trim().to_string())
    }

    /// Every imported namespace may supply the name.
    fn reexport_modules(&self, source: &str, _name: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.scan_imports(source)
            .into_iter()
            .map(|statement| statement.module)
            .filter(|module| seen.insert(module.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    const SOURCE: &str = r#"using System;
using Company.Billing.Invoices;
using static System.Math;

namespace Company.App
{
    public static class Defaults
    {
        public const int Retries = 3;
        public static int Timeout = 30;

        public static string Describe(int value)
        {
            return $"{value}";
        }
    }

    internal sealed record Point(int X, int Y);

    public enum Color { Red, Green }
}
"#;

    #[test]
    fn scans_using_directives() {
        let statements = CSharpAdapter.scan_imports(SOURCE);
        let modules: Vec<_> = statements.iter().map(|s| s.module.as_str()).collect();
        assert_eq!(modules, vec!["System", "Company.Billing.Invoices", "System.Math"]);
        assert!(statements.iter().all(|s| s.symbols.is_empty()));
        assert_eq!(statements[1].statement, "using Company.Billing.Invoices;");
    }

    #[test]
    fn resolves_last_namespace_segment() {
        let temp = tempdir().unwrap();
        let root = temp.path().to_path_buf();
        fs::create_dir_all(root.join("billing/nested")).unwrap();
        fs::write(root.join("billing/nested/Invoices.cs"), "").unwrap();
        let roots = vec![root.clone()];

        assert_eq!(
            CSharpAdapter.resolve_module("Company.Billing.Invoices", &roots),
            Some(root.join("billing/nested/Invoices.cs"))
        );
        assert_eq!(CSharpAdapter.resolve_module("System", &roots), None);
    }

    #[test]
    fn extracts_types_and_methods() {
        let class = CSharpAdapter.find_block(SOURCE, "Defaults").unwrap();
        assert!(class.starts_with("public static class Defaults"));
        assert!(class.ends_with("}\n    }"));

        assert_eq!(
            CSharpAdapter.find_block(SOURCE, "Color").unwrap(),
            "public enum Color { Red, Green }"
        );
        assert_eq!(
            CSharpAdapter.find_block(SOURCE, "Describe").unwrap(),
            "public static string Describe(int value)\n        {\n            return $\"{value}\";\n        }"
        );
        assert!(CSharpAdapter.find_block(SOURCE, "Point").is_none());
    }

    #[test]
    fn finds_field_initializers() {
        assert_eq!(
            CSharpAdapter.find_assignment(SOURCE, "Retries").unwrap(),
            "public const int Retries = 3;"
        );
        assert_eq!(
            CSharpAdapter.find_assignment(SOURCE, "Timeout").unwrap(),
            "public static int Timeout = 30;"
        );
        assert!(CSharpAdapter.find_assignment(SOURCE, "Color").is_none());
    }

    #[test]
    fn reexports_are_all_usings() {
        assert_eq!(
            CSharpAdapter.reexport_modules(SOURCE, "Anything"),
            vec!["System", "Company.Billing.Invoices", "System.Math"]
        );
    }
}
