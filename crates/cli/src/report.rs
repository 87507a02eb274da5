use anyhow::{Context, Result};
use context_extractor::RunOutput;
use context_graph::DependencyGraph;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const IMPORTS_TITLE: &str = "Imported Module Contents:\n\n";

/// Text form of an import run: one "Defined at / Imported in / Content" block per group.
pub fn render_imports(output: &RunOutput) -> String {
    let mut parts = vec![IMPORTS_TITLE.to_string()];
    for report in &output.reports {
        parts.push(format!("Defined at: {}\n", report.module_path));
        parts.push(format!("Imported in: {}\n", report.imported_in));
        parts.push("Content:\n\n".to_string());
        parts.push(format!("{}\n\n", report.module.render()));
    }
    parts.join("\n")
}

pub fn combine(structure: &str, imports: &str) -> String {
    format!(
        "======== Project Structure ========\n{structure}\n======== Imports ========\n{imports}\n======== End of Combined Output ========\n"
    )
}

/// Dependency graph of every reported target, merged from the report trees
pub fn dependency_graph(output: &RunOutput) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for report in &output.reports {
        graph.add_tree(&report.dependency_tree);
    }
    graph
}

/// One line per distinct reported target: direct imports and direct importers
/// among the traced files.
pub fn dependency_summary(output: &RunOutput, graph: &DependencyGraph) -> Vec<String> {
    let mut seen = HashSet::new();
    output
        .reports
        .iter()
        .filter(|report| seen.insert(report.module_path.as_str()))
        .map(|report| {
            let path = Path::new(&report.module_path);
            format!(
                "{}: imports {}, imported by {}",
                report.module_path,
                graph.dependencies(path).len(),
                graph.dependents(path).len()
            )
        })
        .collect()
}

/// Write `text` to `<dir>/<stem>_<YYYYmmdd_HHMMSS>.txt`, creating `dir` when needed.
pub fn save_output(dir: &Path, stem: &str, text: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{stem}_{timestamp}.txt"));
    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Saved output to {}", path.display());
    Ok(path)
}
