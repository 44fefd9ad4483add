//! Command-line interface for astcorpus.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{CorpusConfig, DEFAULT_CONFIG_NAMES};
use crate::corpus::{
    self, CorpusRunner, NodeBounds, OutputPaths, OutputSink, RunSummary, WORKER_STACK_SIZE,
};
use crate::flatten::Granularity;
use crate::parser::ParseMode;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Flatten Java sources into ID-indexed syntax tree tables.
///
/// Each accepted file becomes one JSON line of flat nodes whose children
/// are referenced by index, paired line-for-line with its source path.
#[derive(Parser)]
#[command(name = "astcorpus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log per-file rejections (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Flatten a corpus into the three output streams
    Run(RunArgs),
    /// Flatten a single file and print its table
    Flatten(FlattenArgs),
}

/// Arguments for the run command.
#[derive(Parser)]
pub struct RunArgs {
    /// Input root or root+glob pattern, e.g. 'src/**/*.java'
    pub input: Option<String>,

    /// Output path stem (.json, .txt and _failed.txt are appended)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Policy table: fine or coarse
    #[arg(short, long)]
    pub granularity: Option<Granularity>,

    /// Smallest accepted table (inclusive)
    #[arg(long)]
    pub min_nodes: Option<usize>,

    /// Largest accepted table (exclusive)
    #[arg(long)]
    pub max_nodes: Option<usize>,

    /// Parse each file as a class-body fragment
    #[arg(long)]
    pub member_only: bool,

    /// Worker threads (default: available parallelism)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Base directory for the paths written to the index
    #[arg(long)]
    pub base_dir: Option<PathBuf>,
}

impl RunArgs {
    /// The settings given on the command line, layered over a config file.
    fn overrides(&self) -> CorpusConfig {
        CorpusConfig {
            input: self.input.clone(),
            output: self.output.clone(),
            granularity: self.granularity,
            min_nodes: self.min_nodes,
            max_nodes: self.max_nodes,
            member_only: self.member_only.then_some(true),
            jobs: self.jobs,
            base_dir: self.base_dir.clone(),
        }
    }
}

/// Arguments for the flatten command.
#[derive(Parser)]
pub struct FlattenArgs {
    /// Java source file
    pub file: PathBuf,

    /// Policy table: fine or coarse
    #[arg(short, long, default_value = "fine")]
    pub granularity: Granularity,

    /// Parse the file as a class-body fragment
    #[arg(long)]
    pub member_only: bool,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

/// Install the stderr log subscriber.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "astcorpus=debug" } else { "astcorpus=info" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load the config file, if any, and apply command-line overrides.
fn load_config(args: &RunArgs) -> anyhow::Result<CorpusConfig> {
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => CorpusConfig::find_in("."),
    };
    let base = match path {
        Some(path) => {
            debug!(config = %path.display(), "loading config");
            CorpusConfig::parse_file(&path)?
        }
        None => {
            debug!(looked_for = ?DEFAULT_CONFIG_NAMES, "no config file found");
            CorpusConfig::default()
        }
    };
    let config = base.merge(args.overrides());
    config.validate()?;
    Ok(config)
}

/// Run the run command.
pub fn run_run(args: &RunArgs) -> anyhow::Result<i32> {
    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Both are present after validation.
    let (Some(input), Some(output)) = (config.input.as_deref(), config.output.as_deref()) else {
        return Ok(EXIT_ERROR);
    };

    let discovery = match corpus::discover(input) {
        Ok(discovery) => discovery,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if discovery.files.is_empty() {
        eprintln!("Warning: no files match {}", input);
    }

    let sink = match OutputSink::create(output) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let summary = config.runner().run(&discovery.files, &sink)?;
    sink.finish()?;

    write_summary(&summary, config.granularity(), output);
    Ok(EXIT_SUCCESS)
}

fn write_summary(summary: &RunSummary, granularity: Granularity, output: &Path) {
    let paths = OutputPaths::from_stem(output);

    println!();
    println!(
        "  {} {} files ({} policy)",
        "Processed".bold(),
        summary.total(),
        granularity
    );
    println!(
        "  {:<10} {}",
        "accepted".green(),
        summary.accepted.to_string().green().bold()
    );
    if summary.rejected > 0 {
        println!(
            "  {:<10} {}",
            "rejected".yellow(),
            summary.rejected.to_string().yellow().bold()
        );
    } else {
        println!("  {:<10} {}", "rejected".dimmed(), 0);
    }
    println!();
    println!("  {}", paths.json.display().to_string().dimmed());
    println!("  {}", paths.index.display().to_string().dimmed());
    println!("  {}", paths.failed.display().to_string().dimmed());
    println!();
}

/// Run the flatten command.
pub fn run_flatten(args: &FlattenArgs) -> anyhow::Result<i32> {
    let mode = if args.member_only {
        ParseMode::Member
    } else {
        ParseMode::File
    };
    // No size filtering for a single file.
    let runner = CorpusRunner::new(".")
        .granularity(args.granularity)
        .mode(mode)
        .bounds(NodeBounds::new(0, usize::MAX));
    let path = args.file.clone();

    // Deep trees need the same stack as the corpus workers.
    let handle = std::thread::Builder::new()
        .name("astcorpus-flatten".to_string())
        .stack_size(WORKER_STACK_SIZE)
        .spawn(move || runner.process_file(&path))?;
    let result = handle
        .join()
        .map_err(|_| anyhow::anyhow!("flatten thread panicked"))?;

    let table = match result {
        Ok(table) => table,
        Err(e) => {
            eprintln!("{}\t{}", args.file.display(), e);
            return Ok(EXIT_FAILED);
        }
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&table)?
    } else {
        table.to_json_line()?
    };
    println!("{}", json);
    Ok(EXIT_SUCCESS)
}
