use std::path::PathBuf;
use thiserror::Error;

/// Result type for language adapter operations
pub type Result<T> = std::result::Result<T, LangError>;

/// Errors raised while reading or interpreting source files
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LangError {
    /// File could not be read (missing, permissions, not a file)
    #[error("Failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    /// No adapter is registered for the file or language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

impl LangError {
    pub fn read(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }
}
