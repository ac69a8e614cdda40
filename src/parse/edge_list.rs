//! Tolerant edge-list parser
//!
//! Accepts the loose edge lists found in dataset archives:
//! - `#` and `%` both start a comment that runs to the end of the line
//! - any run of whitespace and commas separates tokens
//! - the first two tokens are the endpoints; weights and other columns are ignored
//! - lines with fewer than two tokens are skipped
//!
//! Endpoints are opaque labels; `"01"` and `"1"` are different nodes.

use crate::error::{GraphError, Result};
use crate::storage::Graph;

/// Parse edge-list lines into a graph
///
/// # Errors
///
/// Returns [`GraphError::MalformedEdgeList`] if no line yields an edge
///
/// # Example
///
/// ```
/// use graphprep::parse::parse_edge_list;
///
/// let graph = parse_edge_list("1,2 % note\n3  4\n\n# comment\n5,6,99\n".lines()).unwrap();
/// assert_eq!(graph.num_nodes(), 6);
/// assert_eq!(graph.num_edges(), 3);
/// ```
pub fn parse_edge_list<I, S>(lines: I) -> Result<Graph>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut graph = Graph::new();
    let mut skipped = 0_usize;

    for line in lines {
        match endpoints(line.as_ref()) {
            Some((u, v)) => {
                graph.add_edge(u, v);
            }
            None => skipped += 1,
        }
    }

    tracing::debug!(
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        skipped,
        "parsed edge list"
    );

    if graph.num_edges() == 0 {
        return Err(GraphError::MalformedEdgeList {
            line: None,
            reason: "no edges found".to_string(),
        });
    }

    Ok(graph)
}

/// Extract the two endpoint tokens of a line, if it has them
fn endpoints(line: &str) -> Option<(&str, &str)> {
    let content = line.split(['#', '%']).next().unwrap_or_default();
    let mut tokens = content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty());
    let u = tokens.next()?;
    let v = tokens.next()?;
    Some((u, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::NodeId;

    fn labeled_edges(graph: &Graph) -> Vec<(String, String)> {
        graph
            .edges()
            .map(|(u, v)| {
                (
                    graph.label(u).unwrap().to_string(),
                    graph.label(v).unwrap().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_mixed_delimiters_and_comments() {
        let graph = parse_edge_list("1,2 % note\n3  4\n\n# comment\n5,6,99\n".lines()).unwrap();

        assert_eq!(graph.num_edges(), 3);
        assert_eq!(
            labeled_edges(&graph),
            vec![
                ("1".to_string(), "2".to_string()),
                ("3".to_string(), "4".to_string()),
                ("5".to_string(), "6".to_string()),
            ]
        );
        // the weight column never becomes a node
        assert!(graph.node_id("99").is_none());
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(endpoints("a b"), Some(("a", "b")));
        assert_eq!(endpoints("  a,,\tb  c"), Some(("a", "b")));
        assert_eq!(endpoints("a%b c"), None);
        assert_eq!(endpoints("#a b"), None);
        assert_eq!(endpoints("lonely"), None);
        assert_eq!(endpoints(""), None);
        assert_eq!(endpoints("x y # trailing"), Some(("x", "y")));
    }

    #[test]
    fn test_labels_are_opaque() {
        let graph = parse_edge_list(["01 1", "a b"]).unwrap();
        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.node_id("01"), Some(NodeId(0)));
        assert_eq!(graph.node_id("1"), Some(NodeId(1)));
    }

    #[test]
    fn test_self_loops_kept_for_cleaning() {
        let graph = parse_edge_list(["1 2", "2 2"]).unwrap();
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.self_loop_count(), 1);
    }

    #[test]
    fn test_no_edges_is_error() {
        let result = parse_edge_list(["% only comments", "", "single"]);
        assert!(matches!(
            result,
            Err(GraphError::MalformedEdgeList { line: None, .. })
        ));
    }
}
