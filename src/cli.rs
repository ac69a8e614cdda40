//! Command-line interface for `graphprep`
//!
//! ```text
//! graphprep parse <FILE|-> [--format mtx|edges] [--relabel]
//! graphprep stats <FILE|-> [--format mtx|edges]
//! graphprep prepare <DIR|->
//! graphprep prepare-all [ROOT]
//! graphprep lcc [PATH] [--all]
//! graphprep obtain <URL> [--data-dir DIR] [--no-clobber]
//! ```
//!
//! A path given as `-` (or omitted, for `lcc`) is read from the first line of
//! stdin. Batch commands print one line per dataset and fail if any dataset
//! failed.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::algorithms::GraphProperties;
use crate::error::GraphError;
use crate::logging::{LogConfig, LogDestination, LogFormat};
use crate::parse::{parse_graph, Format};
use crate::pipeline::{
    add_lcc, add_lcc_all, prepare, prepare_all, BatchReport, LccOutcome, PrepareOutcome,
};
use crate::storage::canonical::write_edges;

/// Dataset root used when none is given
pub const DEFAULT_DATA_DIR: &str = "data/graphs";

const STDIN_PATH: &str = "-";

/// Top-level CLI options parsed by [`clap`]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "graphprep",
    version,
    about = "Normalize graph datasets into canonical edge lists with computed properties."
)]
pub struct Cli {
    /// Logging options
    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Logging options shared by every command
#[derive(Debug, Args, Clone)]
pub struct LoggingArgs {
    /// Most verbose level logged (off, error, warn, info, debug, trace)
    #[arg(long, env = "LOGLEVEL", default_value = "warn", global = true)]
    pub log_level: LevelFilter,

    /// Append log events to this file instead of stderr
    #[arg(long, env = "LOGFILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Event rendering (human or json)
    #[arg(long, env = "GRAPHPREP_LOG_FORMAT", default_value = "human", global = true)]
    pub log_format: LogFormat,
}

impl LoggingArgs {
    /// Logging configuration selected by these options
    #[must_use]
    pub fn to_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level,
            destination: self
                .log_file
                .clone()
                .map_or(LogDestination::Stderr, LogDestination::File),
            format: self.log_format,
        }
    }
}

/// Supported commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Parse a graph file and print its edge list
    Parse(ParseArgs),
    /// Parse a graph file and print its properties as YAML
    Stats(StatsArgs),
    /// Canonicalize one dataset directory in place
    Prepare(PrepareArgs),
    /// Canonicalize every dataset directory under a root
    PrepareAll(PrepareAllArgs),
    /// Add `<name>_lcc` variants of disconnected datasets
    Lcc(LccArgs),
    /// Download, extract and canonicalize a dataset archive
    #[cfg(feature = "fetch")]
    Obtain(ObtainArgs),
}

/// Arguments of `parse`
#[derive(Debug, Args, Clone)]
pub struct ParseArgs {
    /// Graph file, or `-` to read the path from stdin
    pub path: PathBuf,

    /// Format override (`mtx` or `edges`); inferred from the extension otherwise
    #[arg(long)]
    pub format: Option<Format>,

    /// Print nodes renumbered `0..N-1` in first-seen order
    #[arg(long)]
    pub relabel: bool,
}

/// Arguments of `stats`
#[derive(Debug, Args, Clone)]
pub struct StatsArgs {
    /// Graph file, or `-` to read the path from stdin
    pub path: PathBuf,

    /// Format override (`mtx` or `edges`)
    #[arg(long)]
    pub format: Option<Format>,
}

/// Arguments of `prepare`
#[derive(Debug, Args, Clone)]
pub struct PrepareArgs {
    /// Dataset directory, or `-` to read the path from stdin
    pub dir: PathBuf,
}

/// Arguments of `prepare-all`
#[derive(Debug, Args, Clone)]
pub struct PrepareAllArgs {
    /// Directory whose subdirectories are datasets
    #[arg(env = "GRAPHPREP_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub root: PathBuf,
}

/// Arguments of `lcc`
#[derive(Debug, Args, Clone)]
pub struct LccArgs {
    /// Dataset directory (read from stdin if omitted or `-`); the dataset
    /// root with `--all`
    pub path: Option<PathBuf>,

    /// Process every dataset under PATH (default: the data directory)
    #[arg(long)]
    pub all: bool,

    /// Dataset root used by `--all` when PATH is omitted
    #[arg(long, env = "GRAPHPREP_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
}

/// Arguments of `obtain`
#[cfg(feature = "fetch")]
#[derive(Debug, Args, Clone)]
pub struct ObtainArgs {
    /// URL of a `.zip` dataset archive
    pub url: String,

    /// Directory the dataset is extracted into
    #[arg(long, env = "GRAPHPREP_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Fail instead of replacing an existing download or dataset directory
    #[arg(long)]
    pub no_clobber: bool,
}

/// Errors surfaced while executing CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// A library operation failed
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Reading a path from stdin failed
    #[error("failed to read a path from stdin: {0}")]
    Stdin(#[source] io::Error),
    /// Stdin held no path
    #[error("expected a path on stdin, found none")]
    NoPathOnStdin,
    /// Writing command output failed
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    /// At least one dataset of a batch failed
    #[error("{failed} of {total} datasets failed")]
    BatchFailed {
        /// Number of failed datasets
        failed: usize,
        /// Number of datasets processed
        total: usize,
    },
}

/// Execute `cli`, reading `-` paths from `input` and printing to `out`
///
/// # Errors
///
/// Returns [`CliError`] if the command fails, or [`CliError::BatchFailed`]
/// after a batch in which any dataset failed
pub fn run_cli<R, W>(cli: &Cli, input: &mut R, out: &mut W) -> Result<(), CliError>
where
    R: BufRead,
    W: Write,
{
    match &cli.command {
        Command::Parse(args) => {
            let path = resolve_path(Some(&args.path), input)?;
            let graph = parse_graph(&path, args.format)?;
            let graph = if args.relabel { graph.relabeled() } else { graph };
            write_edges(&graph, out)?;
        }
        Command::Stats(args) => {
            let path = resolve_path(Some(&args.path), input)?;
            let graph = parse_graph(&path, args.format)?;
            out.write_all(GraphProperties::compute(&graph).to_yaml().as_bytes())?;
        }
        Command::Prepare(args) => {
            let dir = resolve_path(Some(&args.dir), input)?;
            let outcome = prepare(&dir)?;
            writeln!(out, "{}", describe_prepare(&outcome))?;
        }
        Command::PrepareAll(args) => {
            let report = prepare_all(&args.root)?;
            render_batch(&report, describe_prepare, out)?;
            check_batch(&report)?;
        }
        Command::Lcc(args) if args.all => {
            let root = args.path.clone().unwrap_or_else(|| args.data_dir.clone());
            let report = add_lcc_all(&root)?;
            render_batch(&report, describe_lcc, out)?;
            check_batch(&report)?;
        }
        Command::Lcc(args) => {
            let dir = resolve_path(args.path.as_deref(), input)?;
            let outcome = add_lcc(&dir)?;
            writeln!(out, "{}: {}", dir.display(), describe_lcc(&outcome))?;
        }
        #[cfg(feature = "fetch")]
        Command::Obtain(args) => {
            use crate::fetch::{DestinationPolicy, HttpDownloader, ZipArchiver};

            let policy = if args.no_clobber {
                DestinationPolicy::NoClobber
            } else {
                DestinationPolicy::Overwrite
            };
            let outcome = crate::pipeline::obtain(
                &args.url,
                &args.data_dir,
                &HttpDownloader,
                &ZipArchiver,
                policy,
            )?;
            writeln!(out, "{}", describe_prepare(&outcome))?;
        }
    }
    Ok(())
}

/// Use `arg`, or read the path from the first line of `input` if it is
/// missing or `-`
fn resolve_path<R: BufRead>(arg: Option<&Path>, input: &mut R) -> Result<PathBuf, CliError> {
    if let Some(path) = arg.filter(|path| path.as_os_str() != STDIN_PATH) {
        return Ok(path.to_path_buf());
    }

    let mut line = String::new();
    input.read_line(&mut line).map_err(CliError::Stdin)?;
    let line = line.trim();
    if line.is_empty() {
        return Err(CliError::NoPathOnStdin);
    }
    Ok(PathBuf::from(line))
}

fn describe_prepare(outcome: &PrepareOutcome) -> String {
    let source = outcome
        .source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut line = format!(
        "{}: prepared from {source} (order {}, size {}, connected {})",
        outcome.dir.display(),
        outcome.properties.order,
        outcome.properties.size,
        if outcome.properties.connected { "yes" } else { "no" },
    );
    if !outcome.discarded.is_empty() {
        line.push_str(&format!(", discarded {} other entries", outcome.discarded.len()));
    }
    line
}

fn describe_lcc(outcome: &LccOutcome) -> String {
    match outcome {
        LccOutcome::AlreadyConnected => "connected, no LCC needed".to_owned(),
        LccOutcome::AlreadyExists(dir) => format!("{} already exists", dir.display()),
        LccOutcome::Created { dir, properties } => format!(
            "wrote {} (order {}, size {})",
            dir.display(),
            properties.order,
            properties.size
        ),
    }
}

fn render_batch<T, F, W>(report: &BatchReport<T>, describe: F, out: &mut W) -> io::Result<()>
where
    F: Fn(&T) -> String,
    W: Write,
{
    for (dir, outcome) in &report.succeeded {
        writeln!(out, "ok   {}: {}", dir.display(), describe(outcome))?;
    }
    for (dir, err) in &report.failed {
        writeln!(out, "FAIL {}: {err}", dir.display())?;
    }
    Ok(())
}

fn check_batch<T>(report: &BatchReport<T>) -> Result<(), CliError> {
    if report.is_success() {
        return Ok(());
    }
    Err(CliError::BatchFailed {
        failed: report.failed.len(),
        total: report.len(),
    })
}
