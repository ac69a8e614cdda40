//! Logging initialisation for the `graphprep` binary
//!
//! Installs a global `tracing` subscriber configured from an explicit
//! [`LogConfig`] and bridges the `log` facade so crates using either API
//! emit structured events. Library code only emits events; it never reads
//! logging configuration itself.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Errors raised while initialising structured logging
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Unsupported log format requested
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Raw value supplied by the user
        provided: String,
    },
    /// The log file could not be opened for appending
    #[error("failed to open log file `{}`: {source}", path.display())]
    OpenLogFile {
        /// Requested log file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Failed to install the global tracing subscriber
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Event rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line events
    #[default]
    Human,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

/// Where events are written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogDestination {
    /// Standard error, keeping stdout free for command output
    #[default]
    Stderr,
    /// Appended to a file
    File(PathBuf),
}

/// Complete logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Most verbose level emitted
    pub level: LevelFilter,
    /// Output target
    pub destination: LogDestination,
    /// Output rendering
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            destination: LogDestination::Stderr,
            format: LogFormat::Human,
        }
    }
}

/// Install global structured logging if it has not already been configured
///
/// Only the first call has an effect. If another subscriber already owns the
/// global slot, a note is printed to stderr and the existing one is kept.
///
/// # Errors
///
/// Returns [`LoggingError::OpenLogFile`] if the log file cannot be opened
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }

    match install_subscriber(config) {
        Ok(()) => {}
        Err(LoggingError::InstallFailed { source }) => {
            eprintln!("structured logging already configured elsewhere: {source}");
        }
        Err(err) => return Err(err),
    }
    let _ = INITIALISED.set(());
    Ok(())
}

fn install_subscriber(config: &LogConfig) -> Result<(), LoggingError> {
    let writer = match &config.destination {
        LogDestination::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogDestination::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenLogFile {
                    path: path.clone(),
                    source,
                })?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };
    let ansi = matches!(config.destination, LogDestination::Stderr);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(writer);

    let fmt_layer = match config.format {
        LogFormat::Json => fmt_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
        LogFormat::Human => fmt_layer.with_ansi(ansi).boxed(),
    };

    // Best-effort: another logger may already own the `log` slot.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(config.level)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_format() {
        assert_eq!("human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert_eq!("HUMAN".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert_eq!(" json ".parse::<LogFormat>().unwrap(), LogFormat::Json);
    }

    #[test]
    fn test_parse_log_format_rejects_unknown() {
        match "xml".parse::<LogFormat>().unwrap_err() {
            LoggingError::UnsupportedFormat { provided } => assert_eq!(provided, "xml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LevelFilter::WARN);
        assert_eq!(config.destination, LogDestination::Stderr);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(&LogConfig::default()).unwrap();
        init_logging(&LogConfig::default()).unwrap();
    }
}
