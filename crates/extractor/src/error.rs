use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractorError>;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Importing path does not exist: {}", .0.display())]
    MissingImportingPath(PathBuf),

    #[error("At least one definition root is required")]
    NoDefinitionRoots,

    #[error("No supported language selected")]
    NoLanguages,
}
