use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod path_filters;

/// Placeholder emitted when a symbol cannot be located anywhere in its fallback chain.
pub const DEFINITION_NOT_FOUND: &str = "Definition not found";

/// Content shown for one extraction group.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ModuleContent {
    /// Whole target file text
    Full(String),
    /// Symbol name -> extracted definition, in request order
    Snippets(IndexMap<String, String>),
}

impl ModuleContent {
    pub fn is_full(&self) -> bool {
        matches!(self, ModuleContent::Full(_))
    }

    /// Display form: snippets joined by a blank line.
    pub fn render(&self) -> String {
        match self {
            ModuleContent::Full(text) => text.clone(),
            ModuleContent::Snippets(snippets) => snippets
                .values()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("\n\n")
                .trim()
                .to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TreeMarker {
    Cycle,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum TreeImports {
    Marker(TreeMarker),
    Children(IndexMap<String, DependencyTree>),
}

/// Serialized dependency tree:
/// `{module, imports: {ref: <tree>}}`, `{module, imports: "cycle"}` or `{module, error}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DependencyTree {
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imports: Option<TreeImports>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DependencyTree {
    pub fn is_cycle(&self) -> bool {
        matches!(self.imports, Some(TreeImports::Marker(TreeMarker::Cycle)))
    }

    pub fn children(&self) -> Option<&IndexMap<String, DependencyTree>> {
        match &self.imports {
            Some(TreeImports::Children(children)) => Some(children),
            _ => None,
        }
    }
}

/// One output record per (target file, importing file) group.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub module: ModuleContent,
    pub module_path: String,
    pub imported_in: String,
    pub dependency_tree: DependencyTree,
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
