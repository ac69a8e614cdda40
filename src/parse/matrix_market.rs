//! Matrix Market adjacency-matrix parser
//!
//! Reads square matrices in either layout of the NIST Matrix Market format
//! and keeps only their sparsity structure:
//!
//! ```text
//! %%MatrixMarket matrix coordinate real symmetric
//! % comment
//! 3 3 2          <- rows cols nnz
//! 2 1 0.5        <- (row, col, value), 1-indexed; value dropped
//! 3 2 1.0
//! ```
//!
//! Every value type is treated as `pattern` for coordinate data, so each
//! listed entry is an edge regardless of its value. Dense `array` data has no
//! positions to list, so there an edge is any non-zero cell.
//!
//! Node `i` of the result is row/column `i + 1` of the file; every row is a
//! node even when it has no entries.

use std::fmt;
use std::str::FromStr;

use crate::error::{GraphError, Result};
use crate::storage::{Graph, NodeId, MAX_NODES};

const BANNER: &str = "%%matrixmarket";

/// Storage layout declared in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Sparse `(row, col[, value])` entries
    Coordinate,
    /// Dense column-major values
    Array,
}

/// Value type declared in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `real` or `double`
    Real,
    /// `complex` (two numbers per value)
    Complex,
    /// `integer`
    Integer,
    /// `pattern` (no values)
    Pattern,
}

/// Symmetry declared in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    /// All entries stored
    General,
    /// Lower triangle incl. diagonal stored
    Symmetric,
    /// Strictly lower triangle stored
    SkewSymmetric,
    /// Lower triangle incl. diagonal stored (complex conjugate mirror)
    Hermitian,
}

/// Parsed `%%MatrixMarket` banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Sparse or dense
    pub layout: Layout,
    /// Declared value type
    pub field: Field,
    /// Declared symmetry
    pub symmetry: Symmetry,
}

impl Header {
    /// Drop the value type from coordinate data
    ///
    /// Coordinate entries become pure positions. Dense data keeps its field so
    /// the cell values can still be tested for zero.
    #[must_use]
    pub const fn normalized(self) -> Self {
        match self.layout {
            Layout::Coordinate => Self {
                field: Field::Pattern,
                ..self
            },
            Layout::Array => self,
        }
    }

    const fn numbers_per_value(self) -> usize {
        match self.field {
            Field::Complex => 2,
            Field::Real | Field::Integer | Field::Pattern => 1,
        }
    }
}

impl FromStr for Header {
    type Err = GraphError;

    fn from_str(line: &str) -> Result<Self> {
        let tokens: Vec<String> = line.split_whitespace().map(str::to_ascii_lowercase).collect();
        let [banner, object, layout, field, symmetry] = tokens.as_slice() else {
            return Err(GraphError::malformed_mtx(
                1,
                format!("expected 5 header tokens, found {}", tokens.len()),
            ));
        };

        if banner.as_str() != BANNER {
            return Err(GraphError::malformed_mtx(1, "missing %%MatrixMarket header"));
        }
        if object.as_str() != "matrix" {
            return Err(GraphError::malformed_mtx(
                1,
                format!("unsupported object `{object}`"),
            ));
        }

        let layout = match layout.as_str() {
            "coordinate" => Layout::Coordinate,
            "array" => Layout::Array,
            other => {
                return Err(GraphError::malformed_mtx(
                    1,
                    format!("unknown format `{other}`"),
                ))
            }
        };
        let field = match field.as_str() {
            "real" | "double" => Field::Real,
            "complex" => Field::Complex,
            "integer" => Field::Integer,
            "pattern" => Field::Pattern,
            other => {
                return Err(GraphError::malformed_mtx(
                    1,
                    format!("unknown field `{other}`"),
                ))
            }
        };
        let symmetry = match symmetry.as_str() {
            "general" => Symmetry::General,
            "symmetric" => Symmetry::Symmetric,
            "skew-symmetric" => Symmetry::SkewSymmetric,
            "hermitian" => Symmetry::Hermitian,
            other => {
                return Err(GraphError::malformed_mtx(
                    1,
                    format!("unknown symmetry `{other}`"),
                ))
            }
        };

        Ok(Self {
            layout,
            field,
            symmetry,
        })
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = match self.layout {
            Layout::Coordinate => "coordinate",
            Layout::Array => "array",
        };
        let field = match self.field {
            Field::Real => "real",
            Field::Complex => "complex",
            Field::Integer => "integer",
            Field::Pattern => "pattern",
        };
        let symmetry = match self.symmetry {
            Symmetry::General => "general",
            Symmetry::Symmetric => "symmetric",
            Symmetry::SkewSymmetric => "skew-symmetric",
            Symmetry::Hermitian => "hermitian",
        };
        write!(f, "%%MatrixMarket matrix {layout} {field} {symmetry}")
    }
}

/// Data lines after the header: `(1-based line number, content)`, comments and blanks removed
struct Body<I> {
    lines: I,
}

impl<'a, I: Iterator<Item = (usize, &'a str)>> Iterator for Body<I> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.find(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('%')
        })
    }
}

/// Parse Matrix Market text into a graph
///
/// # Errors
///
/// Returns [`GraphError::MalformedMatrixMarket`] on a missing or invalid
/// header, a non-square matrix, out-of-range indices, unparsable numbers, or
/// an entry count that disagrees with the size line. The body is checked
/// against the size line before any per-node storage is allocated;
/// [`GraphError::TooManyNodes`] is returned if that allocation still fails.
///
/// # Example
///
/// ```
/// use graphprep::parse::parse_matrix_market;
///
/// let text = "%%MatrixMarket matrix coordinate real symmetric\n3 3 2\n2 1 0.5\n3 2 1.0\n";
/// let graph = parse_matrix_market(text).unwrap();
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.num_edges(), 2);
/// ```
pub fn parse_matrix_market(text: &str) -> Result<Graph> {
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

    let header: Header = match lines.next() {
        Some((_, first)) => first.parse()?,
        None => return Err(GraphError::malformed_mtx(0, "empty input")),
    };
    let header = header.normalized();
    tracing::debug!(%header, "read Matrix Market header");

    let mut body = Body { lines };
    let (size_line, size) = body
        .next()
        .ok_or_else(|| GraphError::malformed_mtx(0, "missing size line"))?;
    let dims = parse_usizes(size, size_line)?;

    let graph = match header.layout {
        Layout::Coordinate => {
            let [rows, cols, nnz] = dims.as_slice() else {
                return Err(GraphError::malformed_mtx(
                    size_line,
                    "coordinate size line must be `rows cols nnz`",
                ));
            };
            let n = square(*rows, *cols, size_line)?;
            read_coordinate(&mut body, n, *nnz)?
        }
        Layout::Array => {
            let [rows, cols] = dims.as_slice() else {
                return Err(GraphError::malformed_mtx(
                    size_line,
                    "array size line must be `rows cols`",
                ));
            };
            let n = square(*rows, *cols, size_line)?;
            read_array(&mut body, n, header, size_line)?
        }
    };

    tracing::debug!(
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        "parsed Matrix Market adjacency matrix"
    );
    Ok(graph)
}

fn square(rows: usize, cols: usize, line: usize) -> Result<usize> {
    if rows != cols {
        return Err(GraphError::malformed_mtx(
            line,
            format!("adjacency matrix must be square, found {rows}x{cols}"),
        ));
    }
    if rows > MAX_NODES {
        return Err(GraphError::malformed_mtx(
            line,
            format!("{rows} rows exceed the limit of {MAX_NODES} nodes"),
        ));
    }
    Ok(rows)
}

fn parse_usizes(line: &str, line_no: usize) -> Result<Vec<usize>> {
    line.split_whitespace()
        .map(|token| {
            token.parse().map_err(|_| {
                GraphError::malformed_mtx(line_no, format!("`{token}` is not a non-negative integer"))
            })
        })
        .collect()
}

/// Build the `n`-node graph once the body has been validated
fn build(n: usize, edges: Vec<(NodeId, NodeId)>) -> Result<Graph> {
    let mut graph = Graph::with_nodes(n)?;
    for (u, v) in edges {
        graph.add_edge_by_id(u, v)?;
    }
    Ok(graph)
}

fn read_coordinate<'a, I>(body: &mut Body<I>, n: usize, nnz: usize) -> Result<Graph>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut edges = Vec::new();

    for (line_no, line) in body {
        if edges.len() == nnz {
            return Err(GraphError::malformed_mtx(
                line_no,
                format!("more than the declared {nnz} entries"),
            ));
        }

        let mut tokens = line.split_whitespace();
        let row = coordinate(tokens.next(), n, line_no, "row")?;
        let col = coordinate(tokens.next(), n, line_no, "column")?;
        edges.push((row, col));
    }

    if edges.len() != nnz {
        return Err(GraphError::malformed_mtx(
            0,
            format!("expected {nnz} entries, found {}", edges.len()),
        ));
    }
    build(n, edges)
}

/// Convert a 1-based index token to a node
fn coordinate(token: Option<&str>, n: usize, line: usize, what: &str) -> Result<NodeId> {
    let token = token.ok_or_else(|| GraphError::malformed_mtx(line, format!("missing {what} index")))?;
    let index: usize = token
        .parse()
        .map_err(|_| GraphError::malformed_mtx(line, format!("invalid {what} index `{token}`")))?;
    if index == 0 || index > n {
        return Err(GraphError::malformed_mtx(
            line,
            format!("{what} index {index} outside 1..={n}"),
        ));
    }
    Ok(NodeId::from_index(index - 1))
}

/// First stored row of column `col`
const fn first_row(symmetry: Symmetry, col: usize) -> usize {
    match symmetry {
        Symmetry::General => 0,
        Symmetry::Symmetric | Symmetry::Hermitian => col,
        Symmetry::SkewSymmetric => col + 1,
    }
}

/// Number of cells stored for an `n`x`n` matrix, `None` on overflow
fn stored_cells(symmetry: Symmetry, n: usize) -> Option<usize> {
    match symmetry {
        Symmetry::General => n.checked_mul(n),
        Symmetry::Symmetric | Symmetry::Hermitian => n.checked_mul(n + 1).map(|c| c / 2),
        Symmetry::SkewSymmetric => n.checked_mul(n.saturating_sub(1)).map(|c| c / 2),
    }
}

fn read_array<'a, I>(
    body: &mut Body<I>,
    n: usize,
    header: Header,
    size_line: usize,
) -> Result<Graph>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let per_value = header.numbers_per_value();
    let expected = stored_cells(header.symmetry, n)
        .and_then(|cells| cells.checked_mul(per_value))
        .ok_or_else(|| {
            GraphError::malformed_mtx(size_line, format!("{n}x{n} array is too large"))
        })?;

    // Cells are stored column-major; (row, col) is the cell being read.
    let (mut row, mut col) = (first_row(header.symmetry, 0), 0);
    let mut seen = 0_usize;
    let mut nonzero = false;
    let mut edges = Vec::new();
    let mut last_line = size_line;

    for (line_no, line) in body {
        last_line = line_no;
        for token in line.split_whitespace() {
            if seen == expected {
                return Err(GraphError::malformed_mtx(
                    line_no,
                    format!("more than the declared {expected} values"),
                ));
            }
            let value: f64 = token.parse().map_err(|_| {
                GraphError::malformed_mtx(line_no, format!("`{token}` is not a number"))
            })?;
            seen += 1;
            nonzero |= value != 0.0;

            if seen % per_value == 0 {
                if nonzero {
                    edges.push((NodeId::from_index(row), NodeId::from_index(col)));
                }
                nonzero = false;
                row += 1;
                if row == n {
                    col += 1;
                    row = first_row(header.symmetry, col);
                }
            }
        }
    }

    if seen != expected {
        return Err(GraphError::malformed_mtx(
            last_line,
            format!("expected {expected} values, found {seen}"),
        ));
    }
    build(n, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_parse_case_insensitive() {
        let header: Header = "%%MatrixMarket MATRIX Coordinate Integer General".parse().unwrap();
        assert_eq!(header.layout, Layout::Coordinate);
        assert_eq!(header.field, Field::Integer);
        assert_eq!(header.symmetry, Symmetry::General);
        assert_eq!(header.normalized().field, Field::Pattern);
    }

    #[test]
    fn test_header_double_is_real() {
        let header: Header = "%%MatrixMarket matrix array double symmetric".parse().unwrap();
        assert_eq!(header.field, Field::Real);
        // dense data keeps its values
        assert_eq!(header.normalized().field, Field::Real);
    }

    #[test]
    fn test_missing_header() {
        let err = parse_matrix_market("1 2\n2 3\n").unwrap_err();
        assert!(matches!(err, GraphError::MalformedMatrixMarket { line: 1, .. }));
    }

    #[test]
    fn test_coordinate_general_with_weights() {
        let text = "%%MatrixMarket matrix coordinate real general\n\
                    % a comment\n\
                    4 4 4\n\
                    1 2 3.5\n\
                    2 1 3.5\n\
                    3 4 0.0\n\
                    4 4 1\n";
        let graph = parse_matrix_market(text).unwrap();

        assert_eq!(graph.num_nodes(), 4);
        // (1,2) and (2,1) are one undirected edge; zero values still count
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.self_loop_count(), 1);
    }

    #[test]
    fn test_coordinate_keeps_isolated_rows() {
        let text = "%%MatrixMarket matrix coordinate pattern symmetric\n5 5 1\n2 1\n";
        let graph = parse_matrix_market(text).unwrap();
        assert_eq!(graph.num_nodes(), 5);
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn test_coordinate_count_mismatch() {
        let short = "%%MatrixMarket matrix coordinate pattern general\n3 3 3\n1 2\n";
        assert!(matches!(
            parse_matrix_market(short),
            Err(GraphError::MalformedMatrixMarket { .. })
        ));

        let long = "%%MatrixMarket matrix coordinate pattern general\n3 3 1\n1 2\n2 3\n";
        assert!(matches!(
            parse_matrix_market(long),
            Err(GraphError::MalformedMatrixMarket { line: 4, .. })
        ));
    }

    #[test]
    fn test_coordinate_index_out_of_range() {
        let text = "%%MatrixMarket matrix coordinate pattern general\n3 3 1\n4 1\n";
        assert!(matches!(
            parse_matrix_market(text),
            Err(GraphError::MalformedMatrixMarket { line: 3, .. })
        ));

        let zero = "%%MatrixMarket matrix coordinate pattern general\n3 3 1\n0 1\n";
        assert!(parse_matrix_market(zero).is_err());
    }

    #[test]
    fn test_non_square_rejected() {
        let text = "%%MatrixMarket matrix coordinate pattern general\n3 4 1\n1 2\n";
        let err = parse_matrix_market(text).unwrap_err();
        assert!(err.to_string().contains("square"));
    }

    #[test]
    fn test_array_general() {
        // column-major 3x3:
        // [0 1 0]
        // [1 0 2]
        // [0 2 0]
        let text = "%%MatrixMarket matrix array real general\n3 3\n0\n1\n0\n1\n0\n2\n0\n2\n0\n";
        let graph = parse_matrix_market(text).unwrap();
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_edges(), 2);
    }

    #[test]
    fn test_array_symmetric_lower_triangle() {
        // lower triangle of a 3x3, column-major: (0,0) (1,0) (2,0) (1,1) (2,1) (2,2)
        let text = "%%MatrixMarket matrix array integer symmetric\n3 3\n0\n1\n1\n0\n0\n0\n";
        let graph = parse_matrix_market(text).unwrap();
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.self_loop_count(), 0);
    }

    #[test]
    fn test_array_skew_symmetric() {
        // strictly lower: (1,0) (2,0) (2,1)
        let text = "%%MatrixMarket matrix array real skew-symmetric\n3 3\n-1 0 2\n";
        let graph = parse_matrix_market(text).unwrap();
        assert_eq!(graph.num_edges(), 2);
    }

    #[test]
    fn test_array_complex_cells() {
        // 2x2 general, (re, im) per cell: a cell is non-zero if either part is
        let text = "%%MatrixMarket matrix array complex general\n2 2\n0 0\n0 1\n0 0\n0 0\n";
        let graph = parse_matrix_market(text).unwrap();
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn test_array_value_count_mismatch() {
        let text = "%%MatrixMarket matrix array real general\n2 2\n1\n0\n1\n";
        assert!(matches!(
            parse_matrix_market(text),
            Err(GraphError::MalformedMatrixMarket { .. })
        ));
    }

    #[test]
    fn test_array_dimensions_larger_than_body() {
        // 4e10 declared cells, one supplied: rejected without sizing the matrix
        let text = "%%MatrixMarket matrix array real general\n200000 200000\n1\n";
        let err = parse_matrix_market(text).unwrap_err();
        assert!(matches!(err, GraphError::MalformedMatrixMarket { line: 3, .. }));
        assert!(err.to_string().contains("expected 40000000000 values, found 1"));

        let complex = "%%MatrixMarket matrix array complex general\n\
                       4294967295 4294967295\n\
                       1 0\n";
        assert!(matches!(
            parse_matrix_market(complex),
            Err(GraphError::MalformedMatrixMarket { line: 2, .. })
        ));
    }

    #[test]
    fn test_array_extra_values_fail_early() {
        let text = "%%MatrixMarket matrix array real symmetric\n2 2\n1 0 1\n0\n";
        assert!(matches!(
            parse_matrix_market(text),
            Err(GraphError::MalformedMatrixMarket { line: 4, .. })
        ));
    }

    #[test]
    fn test_dimensions_beyond_node_ids() {
        let text = "%%MatrixMarket matrix coordinate pattern general\n\
                    4294967296 4294967296 1\n\
                    1 2\n";
        let err = parse_matrix_market(text).unwrap_err();
        assert!(matches!(err, GraphError::MalformedMatrixMarket { line: 2, .. }));
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_header_display_roundtrip() {
        let header: Header = "%%MatrixMarket matrix coordinate pattern skew-symmetric"
            .parse()
            .unwrap();
        assert_eq!(header.to_string().parse::<Header>().unwrap(), header);
    }
}
