use crate::aggregator::RequestAggregator;
use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::scanner::FileScanner;
use context_graph::DependencyTracer;
use context_lang::{AdapterRegistry, ImportRecord, SourceCache};
use context_protocol::ImportReport;
use std::path::PathBuf;

/// Result of one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// One report per (target, importing file) group, in first-seen order
    pub reports: Vec<ImportReport>,
    /// Every file that was scanned for imports
    pub importing_files: Vec<PathBuf>,
}

/// Scans the importing tree, aggregates its imports, then extracts content and
/// traces dependencies for each group.
///
/// All files read during [`ExtractionOrchestrator::run`] go through one
/// [`SourceCache`] that lives only as long as that call.
pub struct ExtractionOrchestrator {
    config: ExtractorConfig,
    /// Resolution always considers every language; scanning only the configured ones
    registry: AdapterRegistry,
    scan_registry: AdapterRegistry,
}

impl ExtractionOrchestrator {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        let scan_registry = AdapterRegistry::with_languages(&config.languages);
        Ok(Self {
            config,
            registry: AdapterRegistry::new(),
            scan_registry,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn run(&self) -> Result<RunOutput> {
        let cache = SourceCache::new();
        let (records, importing_files) = self.scan_records(&cache);
        let reports = self.extract(&records, &cache);

        log::info!(
            "Extracted {} import groups from {} files ({} statements, {} files read)",
            reports.len(),
            importing_files.len(),
            records.len(),
            cache.len()
        );
        Ok(RunOutput {
            reports,
            importing_files,
        })
    }

    /// Import records of every importing file, plus the files scanned
    pub fn scan_records(&self, cache: &SourceCache) -> (Vec<ImportRecord>, Vec<PathBuf>) {
        let files = FileScanner::new(&self.config.importing_path)
            .with_extensions(self.scan_registry.extensions())
            .with_excluded(&self.config.exclude_paths)
            .scan();

        let mut records = Vec::new();
        for file in &files {
            let Some(adapter) = self.scan_registry.for_path(file) else {
                continue;
            };
            let source = match cache.read(file) {
                Ok(source) => source,
                Err(err) => {
                    log::warn!("Skipping {}: {err}", file.display());
                    continue;
                }
            };
            records.extend(
                adapter
                    .scan_imports(&source)
                    .into_iter()
                    .map(|statement| ImportRecord::from_statement(file, adapter.language(), statement)),
            );
        }
        (records, files)
    }

    /// Aggregate records and produce one report per group
    pub fn extract(&self, records: &[ImportRecord], cache: &SourceCache) -> Vec<ImportReport> {
        let roots = self.config.definition_roots.as_slice();
        let mut aggregator = RequestAggregator::new(
            &self.registry,
            roots,
            &self.config.importing_path,
            &self.config.exclude_paths,
        );
        aggregator.extend(records);
        log::debug!(
            "{} import statements grouped into {} requests",
            records.len(),
            aggregator.len()
        );

        let tracer = DependencyTracer::new(&self.registry, roots, cache);
        let mut reports = Vec::with_capacity(aggregator.len());
        for group in aggregator.groups() {
            let module = match aggregator.content(group, cache, self.config.whole_file_mode) {
                Ok(module) => module,
                Err(err) => {
                    log::warn!("Skipping {}: {err}", group.target.display());
                    continue;
                }
            };
            reports.push(ImportReport {
                module,
                module_path: group.target.display().to_string(),
                imported_in: group.imported_in.clone(),
                dependency_tree: tracer.trace(&group.target).to_tree(),
            });
        }
        reports
    }
}
