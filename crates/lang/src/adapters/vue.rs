use super::javascript::{find_script_assignment, find_script_block, scan_script_imports, script_reexports};
use crate::adapter::LanguageAdapter;
use crate::language::Language;
use crate::paths::resolve_script_module;
use crate::scan::compile;
use crate::types::ImportStatement;
use regex::escape;
use std::path::PathBuf;

/// Single-file components: script imports, with `.vue` preferred over `.js`
#[derive(Debug, Clone, Copy, Default)]
pub struct VueAdapter;

impl LanguageAdapter for VueAdapter {
    fn language(&self) -> Language {
        Language::Vue
    }

    fn scan_imports(&self, source: &str) -> Vec<ImportStatement> {
        scan_script_imports(source)
    }

    fn resolve_module(&self, module: &str, roots: &[PathBuf]) -> Option<PathBuf> {
        resolve_script_module(module, roots, &["vue", "js"])
    }

    fn find_block(&self, source: &str, name: &str) -> Option<String> {
        find_script_block(source, name)
    }

    /// A property of the component's `export default { ... }` object, else a
    /// script-level declaration.
    fn find_assignment(&self, source: &str, name: &str) -> Option<String> {
        let property = compile(&format!(
            r"export\s+default\s+\{{(?s:.)*?\b{}\s*:\s*([^,\n\}}]+)",
            escape(name)
        ))
        .and_then(|re| {
            re.captures(source)
                .map(|caps| format!("{name} : {}", caps[1].trim()))
        });
        property.or_else(|| find_script_assignment(source, name))
    }

    fn reexport_modules(&self, source: &str, name: &str) -> Vec<String> {
        script_reexports(source, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    const COMPONENT: &str = r#"<template>
  <div>{{ title }}</div>
</template>

<script>
import Card from './Card.vue';
import { api } from './services/api';

const pageSize = 20;

export default {
  name: 'Dashboard',
  components: { Card },
  data() {
    return { title: 'Home' };
  },
};
</script>
"#;

    #[test]
    fn scans_script_imports() {
        let modules: Vec<_> = VueAdapter
            .scan_imports(COMPONENT)
            .into_iter()
            .map(|s| s.module)
            .collect();
        assert_eq!(modules, vec!["./Card.vue", "./services/api"]);
    }

    #[test]
    fn component_properties_and_declarations() {
        assert_eq!(
            VueAdapter.find_assignment(COMPONENT, "name").unwrap(),
            "name : 'Dashboard'"
        );
        assert_eq!(
            VueAdapter.find_assignment(COMPONENT, "pageSize").unwrap(),
            "const pageSize = 20;"
        );
        assert!(VueAdapter.find_assignment(COMPONENT, "missing").is_none());
    }

    #[test]
    fn prefers_vue_files() {
        let temp = tempdir().unwrap();
        let root = temp.path().to_path_buf();
        fs::write(root.join("Card.vue"), "").unwrap();
        fs::write(root.join("Card.js"), "").unwrap();
        fs::write(root.join("api.js"), "").unwrap();
        let roots = vec![root.clone()];

        assert_eq!(
            VueAdapter.resolve_module("./Card", &roots),
            Some(root.join("Card.vue"))
        );
        assert_eq!(
            VueAdapter.resolve_module("./api", &roots),
            Some(root.join("api.js"))
        );
    }
}
