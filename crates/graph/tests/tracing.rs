use context_graph::{trace_file, DependencyGraph, DependencyTracer, NodeState};
use context_lang::{canonical_path, AdapterRegistry, SourceCache};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn child_refs(node: &context_graph::DependencyNode) -> Vec<&str> {
    node.children().map(|(reference, _)| reference).collect()
}

#[test]
fn self_import_terminates_with_cycle_marker() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_path_buf();
    let a = root.join("a.py");
    write(&a, "import b\nimport os\n");
    write(&root.join("b.py"), "from a import run\n");

    let tree = trace_file(&a, &[root.clone()]);

    assert_eq!(tree.path(), canonical_path(&a));
    assert_eq!(child_refs(&tree), vec!["b"]);
    let (_, b) = tree.children().next().unwrap();
    assert_eq!(child_refs(b), vec!["a"]);
    let (_, back) = b.children().next().unwrap();
    assert!(back.is_cycle());
    assert_eq!(back.path(), canonical_path(&a));

    let json = tree.to_tree();
    assert!(json.children().unwrap()["b"].children().unwrap()["a"].is_cycle());
}

#[test]
fn unreadable_start_is_error_and_unresolved_includes_are_omitted() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_path_buf();
    let main = root.join("main.cpp");
    write(&main, "#include \"shape.h\"\n#include <vector>\n");

    let registry = AdapterRegistry::new();
    let cache = SourceCache::new();
    let roots = vec![root.clone()];
    let tracer = DependencyTracer::new(&registry, &roots, &cache);

    let missing = tracer.trace(&root.join("absent.cpp"));
    assert!(matches!(missing.state, NodeState::Error(_)));

    let tree = tracer.trace(&main);
    assert!(child_refs(&tree).is_empty());
}

#[test]
fn diamond_imports_revisit_as_cycle_within_one_trace() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("web");
    let main = root.join("main.js");
    write(
        &main,
        "import { a } from './a';\nimport { b } from './b';\nimport x from 'external';\n",
    );
    write(&root.join("a.js"), "import { shared } from './shared';\n");
    write(&root.join("b.js"), "import { shared } from './shared';\n");
    write(&root.join("shared.js"), "export const shared = 1;\n");

    let registry = AdapterRegistry::new();
    let cache = SourceCache::new();
    let roots = vec![root.clone()];
    let tracer = DependencyTracer::new(&registry, &roots, &cache);

    let tree = tracer.trace(&main);
    assert_eq!(child_refs(&tree), vec!["./a", "./b"]);
    let shared_nodes: Vec<_> = tree
        .children()
        .flat_map(|(_, child)| child.children().map(|(_, n)| n.is_cycle()))
        .collect();
    assert_eq!(shared_nodes, vec![false, true]);

    // independent traces start over
    let again = tracer.trace(&main);
    assert_eq!(again, tree);

    let graph = DependencyGraph::from_trace(&tree);
    assert_eq!(graph.file_count(), 4);
    assert!(!graph.has_cycle());
}

#[test]
fn headers_without_known_extension_inherit_the_includer() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_path_buf();
    let main = root.join("main.cpp");
    write(&main, "#include \"config.inc\"\n");
    write(&root.join("config.inc"), "#include \"types.h\"\n");
    write(&root.join("types.h"), "struct T {};\n");

    let tree = trace_file(&main, &[root.clone()]);
    let (_, inc) = tree.children().next().unwrap();
    assert_eq!(child_refs(inc), vec!["types.h"]);
}
