use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source language with an import adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Vue,
    CSharp,
    Cpp,
    Unknown,
}

impl Language {
    /// Every language that has an adapter, in registry order
    pub const SUPPORTED: [Language; 5] = [
        Language::Python,
        Language::JavaScript,
        Language::Vue,
        Language::CSharp,
        Language::Cpp,
    ];

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" | "pyw" => Language::Python,
            "js" | "mjs" | "cjs" | "jsx" => Language::JavaScript,
            "vue" => Language::Vue,
            "cs" => Language::CSharp,
            "cpp" | "cc" | "cxx" | "h" | "hpp" | "hh" | "hxx" => Language::Cpp,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Parse a user-supplied language name
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "python" | "py" => Language::Python,
            "javascript" | "js" => Language::JavaScript,
            "vue" => Language::Vue,
            "csharp" | "c#" | "cs" => Language::CSharp,
            "cpp" | "c++" => Language::Cpp,
            _ => Language::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Vue => "vue",
            Language::CSharp => "csharp",
            Language::Cpp => "cpp",
            Language::Unknown => "unknown",
        }
    }

    /// File extensions scanned for import statements
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py", "pyw"],
            Language::JavaScript => &["js", "mjs", "cjs", "jsx"],
            Language::Vue => &["vue"],
            Language::CSharp => &["cs"],
            Language::Cpp => &["cpp", "cc", "cxx", "h", "hpp", "hh", "hxx"],
            Language::Unknown => &[],
        }
    }

    /// Typical import/include statement prefixes
    pub fn import_patterns(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["import ", "from "],
            Language::JavaScript | Language::Vue => &["import "],
            Language::CSharp => &["using "],
            Language::Cpp => &["#include "],
            Language::Unknown => &[],
        }
    }
}
