use crate::adapters::{CSharpAdapter, CppAdapter, JavaScriptAdapter, PythonAdapter, VueAdapter};
use crate::language::Language;
use crate::types::ImportStatement;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Lexical conventions of one source language.
///
/// Implementations are stateless; every method is a pure function of its arguments
/// apart from the filesystem reads done by [`LanguageAdapter::resolve_module`].
pub trait LanguageAdapter: Send + Sync {
    fn language(&self) -> Language;

    fn extensions(&self) -> &'static [&'static str] {
        self.language().extensions()
    }

    /// Every import/include/using statement in `source`, in textual order
    fn scan_imports(&self, source: &str) -> Vec<ImportStatement>;

    /// Module references followed when tracing dependencies, deduplicated in first-seen order
    fn dependency_targets(&self, source: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.scan_imports(source)
            .into_iter()
            .map(|statement| statement.module)
            .filter(|module| seen.insert(module.clone()))
            .collect()
    }

    /// Map a module reference to a file; the first root containing a match wins
    fn resolve_module(&self, module: &str, roots: &[PathBuf]) -> Option<PathBuf>;

    /// Function/class-like definition of `name`, body included
    fn find_block(&self, source: &str, name: &str) -> Option<String>;

    /// Textually last assignment of `name`
    fn find_assignment(&self, source: &str, name: &str) -> Option<String>;

    /// Modules whose import statements in `source` may bring `name` into scope
    fn reexport_modules(&self, source: &str, name: &str) -> Vec<String>;
}

/// Create the adapter for a language
pub fn adapter_for(language: Language) -> Option<Box<dyn LanguageAdapter>> {
    match language {
        Language::Python => Some(Box::new(PythonAdapter)),
        Language::JavaScript => Some(Box::new(JavaScriptAdapter)),
        Language::Vue => Some(Box::new(VueAdapter)),
        Language::CSharp => Some(Box::new(CSharpAdapter)),
        Language::Cpp => Some(Box::new(CppAdapter)),
        Language::Unknown => None,
    }
}

/// Adapters selectable by language or file extension
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn LanguageAdapter>>,
}

impl AdapterRegistry {
    /// Registry with every supported language
    pub fn new() -> Self {
        Self::with_languages(&Language::SUPPORTED)
    }

    pub fn with_languages(languages: &[Language]) -> Self {
        let mut adapters: Vec<Box<dyn LanguageAdapter>> = Vec::new();
        for &language in languages {
            if adapters.iter().any(|a| a.language() == language) {
                continue;
            }
            if let Some(adapter) = adapter_for(language) {
                adapters.push(adapter);
            }
        }
        Self { adapters }
    }

    pub fn for_language(&self, language: Language) -> Option<&dyn LanguageAdapter> {
        self.adapters
            .iter()
            .find(|adapter| adapter.language() == language)
            .map(|adapter| adapter.as_ref())
    }

    pub fn for_path(&self, path: &Path) -> Option<&dyn LanguageAdapter> {
        self.for_language(Language::from_path(path))
    }

    pub fn languages(&self) -> Vec<Language> {
        self.adapters.iter().map(|a| a.language()).collect()
    }

    /// File extensions covered by the registered adapters
    pub fn extensions(&self) -> Vec<&'static str> {
        self.adapters
            .iter()
            .flat_map(|a| a.extensions().iter().copied())
            .collect()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_selects_by_extension() {
        let registry = AdapterRegistry::new();
        assert_eq!(
            registry.for_path(Path::new("a/b.py")).map(|a| a.language()),
            Some(Language::Python)
        );
        assert_eq!(
            registry.for_path(Path::new("App.vue")).map(|a| a.language()),
            Some(Language::Vue)
        );
        assert!(registry.for_path(Path::new("main.rs")).is_none());
    }

    #[test]
    fn restricted_registry_only_knows_its_languages() {
        let registry =
            AdapterRegistry::with_languages(&[Language::Cpp, Language::Cpp, Language::Unknown]);
        assert_eq!(registry.languages(), vec![Language::Cpp]);
        assert!(registry.for_language(Language::Python).is_none());
        assert!(registry.extensions().contains(&"hpp"));
        assert!(!registry.extensions().contains(&"py"));
    }

    #[test]
    fn dependency_targets_are_deduplicated_in_order() {
        let adapter = adapter_for(Language::Python).unwrap();
        let source = "import b\nfrom a import x\nimport b as bee\nfrom a import y\n";
        assert_eq!(adapter.dependency_targets(source), vec!["b", "a"]);
    }
}
