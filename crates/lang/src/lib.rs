//! Language adapters for polyglot import analysis
//!
//! Each supported language gets a [`LanguageAdapter`] that knows how the language
//! spells import statements, how a module reference maps to a file under a set of
//! root directories, and how to cut a named definition out of source text.
//!
//! # Example
//!
//! ```no_run
//! use context_lang::{AdapterRegistry, DefinitionResolver, ResolveContext, SourceCache};
//! use std::path::{Path, PathBuf};
//!
//! let registry = AdapterRegistry::new();
//! let roots = vec![PathBuf::from("tools")];
//! let cache = SourceCache::new();
//! let file = Path::new("app/main.py");
//!
//! let adapter = registry.for_path(file).unwrap();
//! let source = cache.read(file).unwrap();
//! for statement in adapter.scan_imports(&source) {
//!     println!("{} -> {:?}", statement.module, adapter.resolve_module(&statement.module, &roots));
//! }
//!
//! let resolver = DefinitionResolver::new(&registry);
//! let context = ResolveContext::new(&roots, file, &cache);
//! println!("{}", resolver.extract(adapter, &source, "helper", Some(&context)));
//! ```

pub mod adapter;
pub mod adapters;
pub mod cache;
pub mod error;
pub mod language;
mod paths;
pub mod resolver;
mod scan;
pub mod types;

pub use adapter::{adapter_for, AdapterRegistry, LanguageAdapter};
pub use adapters::{CSharpAdapter, CppAdapter, JavaScriptAdapter, PythonAdapter, VueAdapter};
pub use cache::{canonical_path, SourceCache};
pub use context_protocol::DEFINITION_NOT_FOUND;
pub use error::{LangError, Result};
pub use language::Language;
pub use resolver::{DefinitionResolver, ResolveContext};
pub use types::{ImportRecord, ImportStatement, ImportedSymbol, SymbolKind};
