use context_protocol::{DependencyTree, TreeImports, TreeMarker};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// How far a traced file was expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    /// Resolved imports keyed by the raw reference text, in first-seen order
    Expanded(IndexMap<String, DependencyNode>),
    /// File was already visited during this trace
    Cycle,
    /// File could not be read
    Error(String),
}

/// One file in a dependency trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    pub module_path: PathBuf,
    pub state: NodeState,
}

impl DependencyNode {
    pub fn expanded(module_path: PathBuf, children: IndexMap<String, DependencyNode>) -> Self {
        Self {
            module_path,
            state: NodeState::Expanded(children),
        }
    }

    pub fn cycle(module_path: PathBuf) -> Self {
        Self {
            module_path,
            state: NodeState::Cycle,
        }
    }

    pub fn error(module_path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            module_path,
            state: NodeState::Error(message.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.module_path
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self.state, NodeState::Cycle)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            NodeState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Children of an expanded node; empty for cycle and error nodes
    pub fn children(&self) -> impl Iterator<Item = (&str, &DependencyNode)> {
        let children = match &self.state {
            NodeState::Expanded(children) => Some(children),
            _ => None,
        };
        children
            .into_iter()
            .flat_map(|map| map.iter().map(|(reference, node)| (reference.as_str(), node)))
    }

    /// Number of nodes in this subtree, this one included
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .map(|(_, child)| child.node_count())
            .sum::<usize>()
    }

    /// Wire form used in reports
    pub fn to_tree(&self) -> DependencyTree {
        let module = self.module_path.display().to_string();
        match &self.state {
            NodeState::Expanded(children) => DependencyTree {
                module,
                imports: Some(TreeImports::Children(
                    children
                        .iter()
                        .map(|(reference, child)| (reference.clone(), child.to_tree()))
                        .collect(),
                )),
                error: None,
            },
            NodeState::Cycle => DependencyTree {
                module,
                imports: Some(TreeImports::Marker(TreeMarker::Cycle)),
                error: None,
            },
            NodeState::Error(message) => DependencyTree {
                module,
                imports: None,
                error: Some(message.clone()),
            },
        }
    }
}
