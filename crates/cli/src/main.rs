use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use context_cli::{
    combine, dependency_graph, dependency_summary, render_imports, save_output, show_structure,
    CliConfig, StructureOptions,
};
use context_extractor::{ExtractionOrchestrator, ExtractorConfig, RunOutput};
use context_lang::{canonical_path, Language};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "context-imports")]
#[command(about = "Project structure dumps and import reports for polyglot source trees", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with `[structure]` and `[imports]` sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text (implies --quiet)
    #[arg(long, global = true)]
    json: bool,

    /// Also save the text output under this directory
    #[arg(long, global = true)]
    save: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the directory tree, optionally with file contents
    Structure(StructureArgs),

    /// Extract the definitions imported by every file under a directory
    Imports(ImportArgs),

    /// Structure dump followed by the import report; dumped files are not repeated
    Combined {
        #[command(flatten)]
        structure: StructureArgs,

        #[command(flatten)]
        imports: ImportArgs,
    },
}

#[derive(Args, Debug, Default)]
struct StructureArgs {
    /// Root directory of the dump
    #[arg(long)]
    root: Option<PathBuf>,

    /// File name suffixes to select, e.g. `.py`
    #[arg(long = "file-type")]
    file_types: Vec<String>,

    /// Append the content of every selected file
    #[arg(long)]
    content: bool,

    #[arg(long = "exclude-file")]
    exclude_files: Vec<String>,

    #[arg(long = "exclude-folder")]
    exclude_folders: Vec<String>,

    #[arg(long)]
    exclude_empty: bool,

    /// Select only these files
    #[arg(long = "only")]
    only_files: Vec<String>,

    /// Hide unselected files from the tree as well
    #[arg(long)]
    prune: bool,
}

#[derive(Args, Debug, Default)]
struct ImportArgs {
    /// Directory scanned for import statements (defaults to the structure root)
    #[arg(long)]
    importing: Option<PathBuf>,

    /// Directory used to resolve module names; repeat for fallbacks, first wins
    #[arg(long = "definitions")]
    definition_roots: Vec<PathBuf>,

    /// Show each imported file whole
    #[arg(long)]
    whole_file: bool,

    /// Restrict scanning to these languages (python, javascript, vue, csharp, cpp)
    #[arg(long = "language")]
    languages: Vec<String>,
}

impl StructureArgs {
    fn apply(&self, mut options: StructureOptions) -> StructureOptions {
        if let Some(root) = &self.root {
            options.root = root.clone();
        }
        if options.root.as_os_str().is_empty() {
            options.root = PathBuf::from(".");
        }
        if !self.file_types.is_empty() {
            options.file_types = self.file_types.clone();
        }
        options.give_file_content |= self.content;
        options.exclude_files.extend(self.exclude_files.iter().cloned());
        options.exclude_folders.extend(self.exclude_folders.iter().cloned());
        options.exclude_empty_files |= self.exclude_empty;
        if !self.only_files.is_empty() {
            options.only_files = self.only_files.clone();
        }
        options.exclude_also_from_structure |= self.prune;
        options
    }
}

impl ImportArgs {
    fn apply(&self, mut config: ExtractorConfig) -> Result<ExtractorConfig> {
        if let Some(importing) = &self.importing {
            config.importing_path = importing.clone();
        }
        if !self.definition_roots.is_empty() {
            config.definition_roots = self.definition_roots.clone();
        }
        config.whole_file_mode |= self.whole_file;
        if !self.languages.is_empty() {
            let mut languages = Vec::new();
            for name in &self.languages {
                match Language::from_name(name) {
                    Language::Unknown => anyhow::bail!("Unsupported language: {name}"),
                    language => languages.push(language),
                }
            }
            config.languages = languages;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let file_config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };

    match &cli.command {
        Commands::Structure(args) => {
            let options = args.apply(file_config.structure.unwrap_or_default());
            let report = show_structure(&options)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.full_output);
            }
            persist(&cli, "structure", &report.full_output)?;
        }
        Commands::Imports(args) => {
            let config = args.apply(file_config.imports.unwrap_or_default())?;
            let output = run_imports(config)?;
            let text = render_imports(&output);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output.reports)?);
            } else {
                print!("{text}");
            }
            persist(&cli, "imports", &text)?;
        }
        Commands::Combined { structure, imports } => {
            let options = structure.apply(file_config.structure.unwrap_or_default());
            let structure_report = show_structure(&options)?;

            let mut config = imports.apply(file_config.imports.unwrap_or_default())?;
            if imports.importing.is_none() && config.importing_path == PathBuf::from(".") {
                config.importing_path = options.root.clone();
            }
            if options.give_file_content {
                let importing = canonical_path(&config.importing_path);
                config.exclude_paths.extend(
                    structure_report
                        .files
                        .iter()
                        .filter(|file| !file.starts_with(&importing))
                        .cloned(),
                );
            }
            let output = run_imports(config)?;

            let text = combine(&structure_report.full_output, &render_imports(&output));
            if cli.json {
                let value = json!({
                    "structure": structure_report,
                    "imports": output.reports,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{text}");
            }
            persist(&cli, "combined", &text)?;
        }
    }

    Ok(())
}

fn run_imports(config: ExtractorConfig) -> Result<RunOutput> {
    let importing = config.importing_path.clone();
    let orchestrator = ExtractionOrchestrator::new(config)
        .with_context(|| format!("Invalid import configuration for {}", importing.display()))?;
    let output = orchestrator
        .run()
        .with_context(|| format!("Import extraction failed for {}", importing.display()))?;

    let graph = dependency_graph(&output);
    for line in dependency_summary(&output, &graph) {
        log::debug!("{line}");
    }
    for (path, reason) in &graph.unreadable {
        log::warn!("Unreadable dependency {}: {reason}", path.display());
    }
    log::info!(
        "Extracted {} groups from {} files ({} files, {} import edges in dependency graph{})",
        output.reports.len(),
        output.importing_files.len(),
        graph.file_count(),
        graph.edge_count(),
        if graph.has_cycle() { ", cyclic" } else { "" }
    );
    Ok(output)
}

fn persist(cli: &Cli, stem: &str, text: &str) -> Result<()> {
    if let Some(dir) = &cli.save {
        save_output(dir, stem, text)?;
    }
    Ok(())
}
