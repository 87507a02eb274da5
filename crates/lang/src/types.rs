use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What an imported name is known to denote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// The module itself (`import a.b`, the `a.b` in `from a.b import x`)
    Module,
    /// A name bound from a module (`x` in `from a.b import x`)
    Object,
    /// Bound name whose nature the statement does not reveal (JavaScript specifiers)
    Unknown,
}

/// One name bound by an import statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportedSymbol {
    pub name: String,
    pub kind: SymbolKind,
}

impl ImportedSymbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn module(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Module)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Object)
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Unknown)
    }

    /// Whether a definition snippet can be extracted for this symbol
    pub fn is_extractable(&self) -> bool {
        !matches!(self.kind, SymbolKind::Module)
    }
}

/// Import statement as found by an adapter scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// Full matched statement text
    pub statement: String,
    /// Raw module reference (`tools.toolbox`, `./utils`, `widget.h`)
    pub module: String,
    /// Names bound by the statement; empty for file-level includes
    pub symbols: Vec<ImportedSymbol>,
}

impl ImportStatement {
    pub fn new(
        statement: impl Into<String>,
        module: impl Into<String>,
        symbols: Vec<ImportedSymbol>,
    ) -> Self {
        Self {
            statement: statement.into(),
            module: module.into(),
            symbols,
        }
    }
}

/// Import statement attributed to the file it was found in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub importing_file: PathBuf,
    pub language: Language,
    pub statement: String,
    pub module: String,
    pub symbols: Vec<ImportedSymbol>,
}

impl ImportRecord {
    pub fn from_statement(
        importing_file: impl Into<PathBuf>,
        language: Language,
        statement: ImportStatement,
    ) -> Self {
        Self {
            importing_file: importing_file.into(),
            language,
            statement: statement.statement,
            module: statement.module,
            symbols: statement.symbols,
        }
    }

    /// Object-kind symbols, the only ones probed for sub-module escalation
    pub fn object_symbols(&self) -> impl Iterator<Item = &ImportedSymbol> {
        self.symbols
            .iter()
            .filter(|symbol| symbol.kind == SymbolKind::Object)
    }
}
