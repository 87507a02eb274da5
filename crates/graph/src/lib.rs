//! # Context Graph
//!
//! Recursive dependency tracing over polyglot source trees.
//!
//! ## Architecture
//!
//! ```text
//! start file
//!     │
//!     ├──> DependencyTracer (depth first, one visited set per trace)
//!     │      ├─ Scan imports with the file's LanguageAdapter
//!     │      ├─ Resolve each reference against the root directories
//!     │      └─ Recurse, or emit a cycle / error node
//!     │
//!     ├──> DependencyNode tree ──> DependencyTree (report wire form)
//!     │
//!     └──> DependencyGraph (petgraph)
//!            ├─ Nodes: files
//!            └─ Edges: import references
//! ```

mod graph;
mod node;
mod tracer;

pub use graph::{DependencyGraph, ImportEdge};
pub use node::{DependencyNode, NodeState};
pub use tracer::{trace_file, DependencyTracer};
