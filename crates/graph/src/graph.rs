use crate::node::{DependencyNode, NodeState};
use context_protocol::DependencyTree;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Import edge between two files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    /// Reference text as written in the importing file
    pub reference: String,
}

/// Flattened view of one or more traces: one node per file, one edge per import.
///
/// Cycle nodes of a trace become edges back to the already present file, so cyclic
/// imports show up as real cycles here.
pub struct DependencyGraph {
    /// Directed graph (importing file -> imported file)
    pub graph: DiGraph<PathBuf, ImportEdge>,

    /// Path -> NodeIndex mapping for fast lookup
    pub path_index: HashMap<PathBuf, NodeIndex>,

    /// Files that could not be read, with the reason
    pub unreadable: Vec<(PathBuf, String)>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            path_index: HashMap::new(),
            unreadable: Vec::new(),
        }
    }

    pub fn from_trace(root: &DependencyNode) -> Self {
        let mut graph = Self::new();
        graph.add_trace(root);
        graph
    }

    /// Merge a trace into the graph
    pub fn add_trace(&mut self, node: &DependencyNode) -> NodeIndex {
        let idx = self.add_file(node.path());
        match &node.state {
            NodeState::Expanded(children) => {
                for (reference, child) in children {
                    let child_idx = self.add_trace(child);
                    self.link(idx, child_idx, reference);
                }
            }
            NodeState::Error(message) => self.mark_unreadable(node.path(), message),
            NodeState::Cycle => {}
        }
        idx
    }

    /// Merge a serialized tree, as carried by import reports
    pub fn add_tree(&mut self, tree: &DependencyTree) -> NodeIndex {
        let path = Path::new(&tree.module);
        let idx = self.add_file(path);
        if let Some(message) = &tree.error {
            self.mark_unreadable(path, message);
        }
        for (reference, child) in tree.children().into_iter().flatten() {
            let child_idx = self.add_tree(child);
            self.link(idx, child_idx, reference);
        }
        idx
    }

    fn link(&mut self, from: NodeIndex, to: NodeIndex, reference: &str) {
        if !self.graph.edges(from).any(|e| e.target() == to) {
            let edge = ImportEdge {
                reference: reference.to_string(),
            };
            self.graph.add_edge(from, to, edge);
        }
    }

    fn mark_unreadable(&mut self, path: &Path, message: &str) {
        if !self.unreadable.iter().any(|(known, _)| known == path) {
            self.unreadable.push((path.to_path_buf(), message.to_string()));
        }
    }

    fn add_file(&mut self, path: &Path) -> NodeIndex {
        if let Some(&idx) = self.path_index.get(path) {
            return idx;
        }
        let idx = self.graph.add_node(path.to_path_buf());
        self.path_index.insert(path.to_path_buf(), idx);
        idx
    }

    /// Files directly imported by `path`
    pub fn dependencies(&self, path: &Path) -> Vec<&Path> {
        self.neighbors(path, Direction::Outgoing)
    }

    /// Files that directly import `path`
    pub fn dependents(&self, path: &Path) -> Vec<&Path> {
        self.neighbors(path, Direction::Incoming)
    }

    fn neighbors(&self, path: &Path, direction: Direction) -> Vec<&Path> {
        let Some(&idx) = self.path_index.get(path) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, direction)
            .filter_map(|n| self.graph.node_weight(n))
            .map(PathBuf::as_path)
            .collect()
    }

    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
