//! Outer surface of `context-imports`: the directory dumper, text rendering of
//! import runs and persistence of the produced reports.

pub mod config;
pub mod report;
pub mod structure;

pub use config::CliConfig;
pub use report::{combine, dependency_graph, dependency_summary, render_imports, save_output};
pub use structure::{show_structure, StructureOptions, StructureReport};
