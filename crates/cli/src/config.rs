use crate::structure::StructureOptions;
use anyhow::{Context, Result};
use context_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File configuration for `context-imports`; command-line flags override it.
///
/// ```toml
/// [structure]
/// root = "."
/// file_types = [".py"]
/// exclude_folders = ["__pycache__"]
///
/// [imports]
/// importing_path = "app"
/// definition_roots = ["lib"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub structure: Option<StructureOptions>,
    pub imports: Option<ExtractorConfig>,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn sections_are_optional() {
        let config: CliConfig = toml::from_str("[imports]\ndefinition_roots = [\"lib\"]\n").unwrap();
        assert!(config.structure.is_none());
        let imports = config.imports.unwrap();
        assert_eq!(imports.definition_roots, vec![PathBuf::from("lib")]);
        assert_eq!(imports.importing_path, PathBuf::from("."));
    }

    #[test]
    fn structure_section_uses_defaults() {
        let config: CliConfig =
            toml::from_str("[structure]\nroot = \"src\"\ngive_file_content = true\n").unwrap();
        let structure = config.structure.unwrap();
        assert_eq!(structure.root, PathBuf::from("src"));
        assert!(structure.give_file_content);
        assert!(structure.file_types.is_empty());
    }
}
