//! Error types shared by parsing, analysis and the dataset pipelines
//!
//! Line-level problems in edge lists are recovered locally by the parsers and
//! never surface here. Everything else is a [`GraphError`].

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::parse::Format;

/// Crate-wide result alias
pub type Result<T, E = GraphError> = std::result::Result<T, E>;

/// Errors raised while reading, analysing or rewriting graph datasets
#[derive(Debug, Error)]
pub enum GraphError {
    /// Empty path argument, missing path, or a path of the wrong kind
    #[error("invalid path `{}`: {reason}", path.display())]
    InvalidPath {
        /// Offending path (empty when the argument itself was empty)
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// Format could not be inferred from the file name, or an override was not recognized
    #[error("could not determine the graph format of `{input}` (expected `mtx` or `edges`)")]
    UnknownFormat {
        /// File name or override string that failed to resolve
        input: String,
    },

    /// Matrix Market header or body is invalid
    #[error("malformed Matrix Market data at line {line}: {reason}")]
    MalformedMatrixMarket {
        /// 1-based line number (0 when the input ended early)
        line: usize,
        /// Human-readable description
        reason: String,
    },

    /// Edge list yielded no edges, or a canonical edge file has a bad line
    #[error("malformed edge list{}: {reason}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    MalformedEdgeList {
        /// 1-based line number, when a specific line is at fault
        line: Option<usize>,
        /// Human-readable description
        reason: String,
    },

    /// Both the detected format and the fallback format failed
    #[error(
        "could not parse `{}` as {format} ({primary}) nor as {} ({fallback})",
        path.display(),
        format.other()
    )]
    UnparsableGraph {
        /// File that was being parsed
        path: PathBuf,
        /// Format attempted first
        format: Format,
        /// Failure of the first attempt
        primary: Box<GraphError>,
        /// Failure of the fallback attempt
        fallback: Box<GraphError>,
    },

    /// A dataset directory holds no recognized raw graph file
    #[error("no graph data files (.mtx or .edges) found in `{}`", dir.display())]
    NoGraphDataFound {
        /// Directory that was searched
        dir: PathBuf,
    },

    /// A collaborator refused to overwrite an existing destination
    #[error("destination `{}` already exists", path.display())]
    DestinationExists {
        /// Existing file or directory
        path: PathBuf,
    },

    /// Node index outside the graph
    #[error("node ID {node} out of bounds (graph has {num_nodes} nodes)")]
    NodeOutOfBounds {
        /// Requested node index
        node: u32,
        /// Number of nodes in the graph
        num_nodes: usize,
    },

    /// Node tables for the requested number of nodes cannot be allocated
    #[error("cannot allocate a graph with {requested} nodes")]
    TooManyNodes {
        /// Number of nodes asked for
        requested: usize,
    },

    /// `properties.yaml` could not be read back
    #[error("invalid properties file `{}`: {reason}", path.display())]
    InvalidProperties {
        /// Properties file
        path: PathBuf,
        /// Underlying parse failure
        reason: String,
    },

    /// Filesystem failure
    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying operating system error
        #[source]
        source: io::Error,
    },

    /// HTTP download failed
    #[error("failed to download `{url}`: {message}")]
    Download {
        /// Requested URL
        url: String,
        /// Client error message
        message: String,
    },

    /// Archive could not be extracted
    #[error("failed to extract `{}`: {message}", path.display())]
    Archive {
        /// Archive path
        path: PathBuf,
        /// Extraction error message
        message: String,
    },
}

impl GraphError {
    /// Build an [`GraphError::Io`] for `path`
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid_path(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_mtx(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedMatrixMarket {
            line,
            reason: reason.into(),
        }
    }
}

/// Reject empty path arguments before touching the filesystem
pub(crate) fn ensure_non_empty(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(GraphError::invalid_path(path, "path must not be empty"));
    }
    Ok(())
}
