//! Import extraction over a directory of importing files
//!
//! [`ExtractionOrchestrator`] finds the import statements of every file below the
//! importing path, groups them per (resolved target, importing file), and turns each
//! group into an [`ImportReport`](context_protocol::ImportReport): the target's
//! content (whole, or one definition per imported name) plus its dependency tree.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod scanner;

pub use aggregator::{ExtractionGroup, RequestAggregator};
pub use config::ExtractorConfig;
pub use error::{ExtractorError, Result};
pub use orchestrator::{ExtractionOrchestrator, RunOutput};
pub use scanner::FileScanner;
