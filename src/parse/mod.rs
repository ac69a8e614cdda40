//! Graph file parsing with format detection and one-shot fallback
//!
//! Dataset archives label their files unreliably: `.mtx` files sometimes
//! hold plain edge lists and vice versa. [`parse_graph`] therefore tries the
//! detected format first and, if that fails, the other format exactly once.
//!
//! # Example
//!
//! ```no_run
//! use graphprep::parse::{parse_graph, Format};
//! use std::path::Path;
//!
//! // format inferred from the extension
//! let graph = parse_graph(Path::new("data/graphs/karate/karate.mtx"), None)?;
//!
//! // explicit override
//! let graph = parse_graph(Path::new("data/graphs/karate/edges.txt"), Some(Format::EdgeList))?;
//! # Ok::<(), graphprep::GraphError>(())
//! ```

pub mod edge_list;
pub mod matrix_market;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ensure_non_empty, GraphError, Result};
use crate::storage::Graph;

pub use edge_list::parse_edge_list;
pub use matrix_market::parse_matrix_market;

/// Supported on-disk graph formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Matrix Market adjacency matrix (`.mtx`)
    MatrixMarket,
    /// Edge list (`.edges`)
    EdgeList,
}

impl Format {
    /// Infer the format from the final extension of `path`
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownFormat`] if the file name has no extension
    /// or an unrecognized one
    pub fn detect(path: &Path) -> Result<Self> {
        let unknown = || GraphError::UnknownFormat {
            input: path.display().to_string(),
        };
        let extension = path.extension().and_then(|ext| ext.to_str()).ok_or_else(unknown)?;
        Self::from_extension(extension).ok_or_else(unknown)
    }

    /// Map a bare extension (`mtx`, `edges`) to a format
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "mtx" => Some(Self::MatrixMarket),
            "edges" => Some(Self::EdgeList),
            _ => None,
        }
    }

    /// The format tried when this one fails
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::MatrixMarket => Self::EdgeList,
            Self::EdgeList => Self::MatrixMarket,
        }
    }

    /// Parse `text` as this format
    ///
    /// # Errors
    ///
    /// Returns the format parser's error
    pub fn parse_text(self, text: &str) -> Result<Graph> {
        match self {
            Self::MatrixMarket => parse_matrix_market(text),
            Self::EdgeList => parse_edge_list(text.lines()),
        }
    }
}

impl FromStr for Format {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s).ok_or_else(|| GraphError::UnknownFormat {
            input: s.to_string(),
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatrixMarket => f.write_str("Matrix Market"),
            Self::EdgeList => f.write_str("edge list"),
        }
    }
}

/// Read a graph file, inferring its format unless `format` is given
///
/// The indicated format is tried first; on failure the other format is tried
/// once. I/O failures are returned immediately without a fallback.
///
/// # Errors
///
/// - [`GraphError::InvalidPath`] for an empty path
/// - [`GraphError::UnknownFormat`] if no format is given and none can be inferred
/// - [`GraphError::Io`] if the file cannot be read
/// - [`GraphError::UnparsableGraph`] if both formats fail
#[tracing::instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn parse_graph(path: &Path, format: Option<Format>) -> Result<Graph> {
    ensure_non_empty(path)?;

    let format = match format {
        Some(format) => format,
        None => {
            tracing::debug!("guessing the format from the filename extension");
            Format::detect(path)?
        }
    };

    let bytes = fs::read(path).map_err(|e| GraphError::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);

    parse_with_fallback(path, &text, format)
}

fn parse_with_fallback(path: &Path, text: &str, format: Format) -> Result<Graph> {
    tracing::info!(%format, "reading graph");
    let primary = match format.parse_text(text) {
        Ok(graph) => return Ok(graph),
        Err(err) => err,
    };

    let fallback = format.other();
    tracing::warn!(%format, error = %primary, "failed to read graph, trying {fallback} instead");

    match fallback.parse_text(text) {
        Ok(graph) => {
            tracing::info!(format = %fallback, "read graph via fallback format");
            Ok(graph)
        }
        Err(err) => Err(GraphError::UnparsableGraph {
            path: path.to_path_buf(),
            format,
            primary: Box::new(primary),
            fallback: Box::new(err),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_detect() {
        assert_eq!(Format::detect(Path::new("a/b.mtx")).unwrap(), Format::MatrixMarket);
        assert_eq!(Format::detect(Path::new("b.tar.edges")).unwrap(), Format::EdgeList);
        assert!(matches!(
            Format::detect(Path::new("README")),
            Err(GraphError::UnknownFormat { .. })
        ));
        assert!(matches!(
            Format::detect(Path::new("notes.txt")),
            Err(GraphError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("mtx".parse::<Format>().unwrap(), Format::MatrixMarket);
        assert_eq!("edges".parse::<Format>().unwrap(), Format::EdgeList);
        assert!("csv".parse::<Format>().is_err());
    }

    #[test]
    fn test_mislabeled_mtx_falls_back_to_edge_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g.mtx");
        fs::write(&path, "1 2\n2 3\n").unwrap();

        let graph = parse_graph(&path, None).unwrap();
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_edges(), 2);
    }

    #[test]
    fn test_both_failures_are_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g.edges");
        // no edge lines, and a Matrix Market header without a size line
        fs::write(&path, "%%MatrixMarket matrix coordinate pattern general\n").unwrap();
        let err = parse_graph(&path, None).unwrap_err();
        match err {
            GraphError::UnparsableGraph {
                format,
                primary,
                fallback,
                ..
            } => {
                assert_eq!(format, Format::EdgeList);
                assert!(matches!(*primary, GraphError::MalformedEdgeList { .. }));
                assert!(matches!(*fallback, GraphError::MalformedMatrixMarket { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_override_skips_detection() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph_without_extension");
        fs::write(&path, "a b\n").unwrap();

        assert!(matches!(
            parse_graph(&path, None),
            Err(GraphError::UnknownFormat { .. })
        ));
        let graph = parse_graph(&path, Some(Format::EdgeList)).unwrap();
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = parse_graph(&dir.path().join("missing.mtx"), None);
        assert!(matches!(result, Err(GraphError::Io { .. })));
    }

    #[test]
    fn test_empty_path() {
        assert!(matches!(
            parse_graph(Path::new(""), None),
            Err(GraphError::InvalidPath { .. })
        ));
    }
}
