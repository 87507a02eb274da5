//! Grouping of raw import records into one extraction request per
//! (resolved target file, importing file) pair.

use context_lang::{
    canonical_path, AdapterRegistry, DefinitionResolver, ImportRecord, ImportedSymbol, Language,
    ResolveContext, SourceCache, SymbolKind,
};
use context_protocol::ModuleContent;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Deduplicated work for one target file as seen from one importing file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionGroup {
    /// Canonical path of the resolved target
    pub target: PathBuf,
    /// Canonical path of the first importing file seen for this group
    pub importing_file: PathBuf,
    /// Lowercased canonical importing path, as reported
    pub imported_in: String,
    pub language: Language,
    /// Requested names, each at most once, in first-seen order
    pub symbols: Vec<ImportedSymbol>,
    /// Show the whole target; never reset once set
    pub force_full: bool,
}

impl ExtractionGroup {
    fn new(target: PathBuf, importing_file: PathBuf, language: Language) -> Self {
        let imported_in = normalized_importer(&importing_file);
        Self {
            target,
            importing_file,
            imported_in,
            language,
            symbols: Vec::new(),
            force_full: false,
        }
    }

    /// Union of symbols by name and kind, logical OR of the force-full flag
    pub fn merge(&mut self, symbols: &[ImportedSymbol], force_full: bool) {
        for symbol in symbols {
            if !self.symbols.contains(symbol) {
                self.symbols.push(symbol.clone());
            }
        }
        self.force_full |= force_full;
    }

    /// Names that are looked up individually (object and unknown kind)
    pub fn extractable_symbols(&self) -> impl Iterator<Item = &ImportedSymbol> {
        self.symbols.iter().filter(|symbol| symbol.is_extractable())
    }

    /// Whole-file display is used when forced or when nothing can be looked up by name
    pub fn shows_whole_file(&self) -> bool {
        self.force_full || self.extractable_symbols().next().is_none()
    }
}

type GroupKey = (PathBuf, String);

/// Importing files are compared and reported case-insensitively
fn normalized_importer(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

pub struct RequestAggregator<'a> {
    registry: &'a AdapterRegistry,
    roots: &'a [PathBuf],
    importing_root: PathBuf,
    excluded: HashSet<PathBuf>,
    groups: IndexMap<GroupKey, ExtractionGroup>,
}

impl<'a> RequestAggregator<'a> {
    /// `importing_root` is the scanned tree: targets inside it are self-imports.
    pub fn new(
        registry: &'a AdapterRegistry,
        roots: &'a [PathBuf],
        importing_root: &Path,
        exclude_paths: &[PathBuf],
    ) -> Self {
        Self {
            registry,
            roots,
            importing_root: canonical_path(importing_root),
            excluded: exclude_paths.iter().map(|path| canonical_path(path)).collect(),
            groups: IndexMap::new(),
        }
    }

    /// Fold one record into its group. Returns false when the record was skipped.
    pub fn add(&mut self, record: &ImportRecord) -> bool {
        let registry = self.registry;
        let roots = self.roots;
        let Some(adapter) = registry.for_language(record.language) else {
            log::debug!("No adapter for {} records", record.language.as_str());
            return false;
        };

        let primary = record
            .symbols
            .iter()
            .find(|symbol| symbol.kind == SymbolKind::Module)
            .map(|symbol| symbol.name.clone())
            .unwrap_or_else(|| record.module.clone());

        // `from pkg import sub` names a file when `pkg.sub` resolves
        let escalated = record.object_symbols().find_map(|symbol| {
            let candidate = format!("{primary}.{}", symbol.name);
            adapter
                .resolve_module(&candidate, roots)
                .map(|target| (candidate, target))
        });
        let (reference, target, force_full) = match escalated {
            Some((candidate, target)) => {
                log::debug!("{primary}: {candidate} is a submodule, showing it whole");
                (candidate, Some(target), true)
            }
            None => {
                let target = adapter.resolve_module(&primary, roots);
                (primary, target, false)
            }
        };

        let Some(target) = target else {
            log::debug!(
                "Unresolved import {reference} in {}",
                record.importing_file.display()
            );
            return false;
        };
        let target = canonical_path(&target);
        if target.starts_with(&self.importing_root) {
            log::debug!("Skipping self-import {reference} -> {}", target.display());
            return false;
        }
        if self.excluded.contains(&target) {
            log::debug!("Skipping excluded target {}", target.display());
            return false;
        }

        let importing_file = canonical_path(&record.importing_file);
        let key = (target.clone(), normalized_importer(&importing_file));
        match self.groups.entry(key) {
            Entry::Occupied(mut entry) => entry.get_mut().merge(&record.symbols, force_full),
            Entry::Vacant(entry) => {
                let mut group = ExtractionGroup::new(target, importing_file, record.language);
                group.merge(&record.symbols, force_full);
                entry.insert(group);
            }
        }
        true
    }

    pub fn extend<'r>(&mut self, records: impl IntoIterator<Item = &'r ImportRecord>) {
        for record in records {
            self.add(record);
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = &ExtractionGroup> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Content shown for a group: the whole target, or each requested definition.
    pub fn content(
        &self,
        group: &ExtractionGroup,
        cache: &SourceCache,
        whole_file_mode: bool,
    ) -> context_lang::Result<ModuleContent> {
        let text = cache.read(&group.target)?;
        if whole_file_mode || group.shows_whole_file() {
            return Ok(ModuleContent::Full(text.to_string()));
        }

        let Some(adapter) = self
            .registry
            .for_path(&group.target)
            .or_else(|| self.registry.for_language(group.language))
        else {
            return Ok(ModuleContent::Full(text.to_string()));
        };

        let resolver = DefinitionResolver::new(self.registry);
        let context = ResolveContext::new(self.roots, &group.target, cache);
        let snippets = group
            .extractable_symbols()
            .map(|symbol| {
                let definition = resolver.extract(adapter, &text, &symbol.name, Some(&context));
                (symbol.name.clone(), definition)
            })
            .collect();
        Ok(ModuleContent::Snippets(snippets))
    }
}
