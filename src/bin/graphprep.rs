//! CLI entry point for `graphprep`
//!
//! Parses command-line arguments with clap, installs logging from the parsed
//! options, runs the command against stdin/stdout, and maps errors to a
//! non-zero exit code.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use graphprep::cli::{run_cli, Cli};
use graphprep::logging::init_logging;

fn try_main(cli: &Cli) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = run_cli(cli, &mut input, &mut out);
    out.flush().context("failed to flush output")?;
    result.context("command failed")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli.logging.to_config()) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main(&cli) {
        tracing::debug!(error = ?err, "command execution failed");
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
