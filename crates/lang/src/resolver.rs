//! Definition lookup with a fallback chain through re-exporting modules.
//!
//! A name is looked up as a block definition first, then as its last assignment.
//! When both fail and a [`ResolveContext`] is supplied, the imports of the file
//! that mention the name are resolved and searched in turn. A hit found that way
//! carries the path of the file it came from.

use crate::adapter::{AdapterRegistry, LanguageAdapter};
use crate::cache::{canonical_path, SourceCache};
use context_protocol::DEFINITION_NOT_FOUND;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Where re-exported names may be looked up
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub roots: &'a [PathBuf],
    /// File whose source is being searched
    pub current_file: &'a Path,
    pub cache: &'a SourceCache,
}

impl<'a> ResolveContext<'a> {
    pub fn new(roots: &'a [PathBuf], current_file: &'a Path, cache: &'a SourceCache) -> Self {
        Self {
            roots,
            current_file,
            cache,
        }
    }
}

pub struct DefinitionResolver<'r> {
    registry: &'r AdapterRegistry,
}

impl<'r> DefinitionResolver<'r> {
    /// Files reached through re-exports are searched with the adapter matching their
    /// extension, falling back to the adapter of the importing file.
    pub fn new(registry: &'r AdapterRegistry) -> Self {
        Self { registry }
    }

    /// Definition text of `name`, or [`DEFINITION_NOT_FOUND`]
    pub fn extract(
        &self,
        adapter: &dyn LanguageAdapter,
        source: &str,
        name: &str,
        context: Option<&ResolveContext<'_>>,
    ) -> String {
        self.lookup(adapter, source, name, context)
            .unwrap_or_else(|| DEFINITION_NOT_FOUND.to_string())
    }

    pub fn lookup(
        &self,
        adapter: &dyn LanguageAdapter,
        source: &str,
        name: &str,
        context: Option<&ResolveContext<'_>>,
    ) -> Option<String> {
        if let Some(found) = define_here(adapter, source, name) {
            return Some(found);
        }
        let context = context?;

        let mut visited = HashSet::new();
        visited.insert(canonical_path(context.current_file));
        self.follow_reexports(adapter, source, name, context, &mut visited)
    }

    fn follow_reexports(
        &self,
        adapter: &dyn LanguageAdapter,
        source: &str,
        name: &str,
        context: &ResolveContext<'_>,
        visited: &mut HashSet<PathBuf>,
    ) -> Option<String> {
        for module in adapter.reexport_modules(source, name) {
            let Some(target) = adapter.resolve_module(&module, context.roots) else {
                log::debug!("Re-export source {module} of {name} is not resolvable");
                continue;
            };
            let canonical = canonical_path(&target);
            if !visited.insert(canonical.clone()) {
                log::debug!(
                    "Skipping {} while resolving {name}: already searched",
                    canonical.display()
                );
                continue;
            }

            let text = match context.cache.read(&target) {
                Ok(text) => text,
                Err(err) => {
                    log::debug!("Cannot follow re-export of {name}: {err}");
                    continue;
                }
            };
            let target_adapter = self.registry.for_path(&target).unwrap_or(adapter);
            let found = define_here(target_adapter, &text, name).or_else(|| {
                self.follow_reexports(target_adapter, &text, name, context, visited)
            });
            if let Some(definition) = found {
                return Some(format!(
                    "{definition} (imported from {})",
                    canonical.display()
                ));
            }
        }
        None
    }
}

fn define_here(adapter: &dyn LanguageAdapter, source: &str, name: &str) -> Option<String> {
    adapter
        .find_block(source, name)
        .or_else(|| adapter.find_assignment(source, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CppAdapter, PythonAdapter};
    use pretty_assertions::assert_eq;

    #[test]
    fn block_takes_precedence_over_assignment() {
        let registry = AdapterRegistry::new();
        let resolver = DefinitionResolver::new(&registry);
        let source = "handler = None\n\ndef handler(event):\n    return event\n";
        assert_eq!(
            resolver.extract(&PythonAdapter, source, "handler", None),
            "def handler(event):\n    return event"
        );
    }

    #[test]
    fn missing_name_without_context_is_not_found() {
        let registry = AdapterRegistry::new();
        let resolver = DefinitionResolver::new(&registry);
        assert_eq!(
            resolver.extract(&CppAdapter, "#include \"a.h\"\nint x = 1;\n", "y", None),
            DEFINITION_NOT_FOUND
        );
        assert!(resolver.lookup(&PythonAdapter, "", "y", None).is_none());
    }
}
