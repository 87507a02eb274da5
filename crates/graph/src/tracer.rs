use crate::node::DependencyNode;
use context_lang::{canonical_path, AdapterRegistry, LanguageAdapter, SourceCache};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Walks the import graph from a start file, depth first.
///
/// Every call to [`DependencyTracer::trace`] owns a fresh visited set: a file met a
/// second time within one trace becomes a cycle node instead of being expanded again.
/// References that resolve under none of the roots are left out of the tree.
pub struct DependencyTracer<'a> {
    registry: &'a AdapterRegistry,
    roots: &'a [PathBuf],
    cache: &'a SourceCache,
}

impl<'a> DependencyTracer<'a> {
    pub fn new(registry: &'a AdapterRegistry, roots: &'a [PathBuf], cache: &'a SourceCache) -> Self {
        Self {
            registry,
            roots,
            cache,
        }
    }

    pub fn trace(&self, start: &Path) -> DependencyNode {
        let mut visited = HashSet::new();
        let node = self.visit(start, None, &mut visited);
        log::debug!(
            "Traced {}: {} files, {} nodes",
            node.path().display(),
            visited.len(),
            node.node_count()
        );
        node
    }

    fn visit(
        &self,
        file: &Path,
        inherited: Option<&dyn LanguageAdapter>,
        visited: &mut HashSet<PathBuf>,
    ) -> DependencyNode {
        let path = canonical_path(file);
        if !visited.insert(path.clone()) {
            return DependencyNode::cycle(path);
        }

        let source = match self.cache.read(&path) {
            Ok(source) => source,
            Err(err) => return DependencyNode::error(path, err.to_string()),
        };

        // Headers without a known extension keep the includer's conventions
        let Some(adapter) = self.registry.for_path(&path).or(inherited) else {
            log::debug!("No adapter for {}, not expanding", path.display());
            return DependencyNode::expanded(path, IndexMap::new());
        };

        let mut children = IndexMap::new();
        for reference in adapter.dependency_targets(&source) {
            match adapter.resolve_module(&reference, self.roots) {
                Some(target) => {
                    let child = self.visit(&target, Some(adapter), visited);
                    children.insert(reference, child);
                }
                None => log::debug!("Unresolved import {reference} in {}", path.display()),
            }
        }
        DependencyNode::expanded(path, children)
    }
}

/// Trace `start` with every supported language and a private cache
pub fn trace_file(start: &Path, roots: &[PathBuf]) -> DependencyNode {
    let registry = AdapterRegistry::new();
    let cache = SourceCache::new();
    DependencyTracer::new(&registry, roots, &cache).trace(start)
}
