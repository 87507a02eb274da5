use crate::error::{ExtractorError, Result};
use context_lang::Language;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Inputs of one extraction run.
///
/// ```toml
/// importing_path = "app"
/// definition_roots = ["lib", "vendor/tools"]
/// whole_file_mode = false
/// languages = ["python", "javascript"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Directory whose files are scanned for import statements
    pub importing_path: PathBuf,
    /// Candidate bases for module resolution, searched in order
    pub definition_roots: Vec<PathBuf>,
    /// Show every target file whole instead of per-symbol definitions
    pub whole_file_mode: bool,
    /// Files left out of both scanning and reporting
    pub exclude_paths: Vec<PathBuf>,
    pub languages: Vec<Language>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            importing_path: PathBuf::from("."),
            definition_roots: Vec::new(),
            whole_file_mode: false,
            exclude_paths: Vec::new(),
            languages: Language::SUPPORTED.to_vec(),
        }
    }
}

impl ExtractorConfig {
    pub fn new(importing_path: impl Into<PathBuf>, definition_roots: Vec<PathBuf>) -> Self {
        Self {
            importing_path: importing_path.into(),
            definition_roots,
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn with_whole_file_mode(mut self, enabled: bool) -> Self {
        self.whole_file_mode = enabled;
        self
    }

    #[must_use]
    pub fn with_exclude_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.exclude_paths = paths;
        self
    }

    #[must_use]
    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.importing_path.exists() {
            return Err(ExtractorError::MissingImportingPath(
                self.importing_path.clone(),
            ));
        }
        if self.definition_roots.is_empty() {
            return Err(ExtractorError::NoDefinitionRoots);
        }
        if !self.languages.iter().any(|lang| *lang != Language::Unknown) {
            return Err(ExtractorError::NoLanguages);
        }
        for root in &self.definition_roots {
            if !root.is_dir() {
                log::warn!("Definition root {} is not a directory", root.display());
            }
        }
        Ok(())
    }
}
