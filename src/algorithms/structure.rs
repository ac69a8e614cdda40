//! Graph structure algorithms: connected components and the largest one
//!
//! Provides structural analysis algorithms:
//! - `components`: Partition the nodes into connected components
//! - `is_connected`: Whether one traversal reaches every node
//! - `largest_component`: The component with the most nodes
//! - `extract_lcc`: The largest component as a relabeled graph plus its node mapping
//!
//! # Example
//!
//! ```
//! use graphprep::{components, largest_component, Graph};
//!
//! // Two components: {1, 2, 3} and {4, 5}
//! let mut graph = Graph::new();
//! graph.add_edge("1", "2");
//! graph.add_edge("2", "3");
//! graph.add_edge("4", "5");
//!
//! assert_eq!(components(&graph).len(), 2);
//! assert_eq!(largest_component(&graph).len(), 3);
//! ```

use std::cmp::Ordering;

use crate::algorithms::traversal::mark_reachable;
use crate::error::Result;
use crate::storage::{label_cmp, Graph, NodeId, NodeMapping};

/// Partition the nodes of `graph` into connected components
///
/// Each component is sorted by node id and components are ordered by their
/// smallest node id. Isolated nodes form singleton components.
#[must_use]
pub fn components(graph: &Graph) -> Vec<Vec<NodeId>> {
    let n = graph.num_nodes();
    let mut visited = vec![false; n];
    let mut result = Vec::new();

    for start in 0..n {
        if !visited[start] {
            let mut component: Vec<NodeId> = mark_reachable(graph, start, &mut visited)
                .into_iter()
                .map(NodeId::from_index)
                .collect();
            component.sort_unstable();
            result.push(component);
        }
    }

    result
}

/// True if a single traversal from node 0 reaches every node
///
/// The empty graph is not connected.
#[must_use]
pub fn is_connected(graph: &Graph) -> bool {
    let n = graph.num_nodes();
    if n == 0 {
        return false;
    }
    let mut visited = vec![false; n];
    mark_reachable(graph, 0, &mut visited).len() == n
}

/// Nodes of the component with maximum cardinality, sorted by node id
///
/// Among equally large components, the one holding the smallest original
/// label (see [`label_cmp`]) wins. Empty for the empty graph.
#[must_use]
pub fn largest_component(graph: &Graph) -> Vec<NodeId> {
    components(graph)
        .into_iter()
        .reduce(|best, candidate| match candidate.len().cmp(&best.len()) {
            Ordering::Greater => candidate,
            Ordering::Less => best,
            Ordering::Equal => {
                if label_cmp(min_label(graph, &candidate), min_label(graph, &best)) == Ordering::Less
                {
                    candidate
                } else {
                    best
                }
            }
        })
        .unwrap_or_default()
}

fn min_label<'g>(graph: &'g Graph, component: &[NodeId]) -> &'g str {
    component
        .iter()
        .filter_map(|&node| graph.label(node))
        .min_by(|a, b| label_cmp(a, b))
        .unwrap_or_default()
}

/// Extract the largest connected component with nodes renumbered `0..M-1`
///
/// New ids follow the ascending order of the original labels, so the result
/// only depends on the graph's labels and edges, never on parse order. The
/// returned mapping records the original label of every new id.
///
/// # Errors
///
/// Returns an error if the component refers to nodes outside the graph
///
/// # Example
///
/// ```
/// use graphprep::{extract_lcc, Graph, NodeId};
///
/// let mut graph = Graph::new();
/// graph.add_edge("12", "4");
/// graph.add_edge("4", "9");
/// graph.add_edge("100", "101");
///
/// let (lcc, mapping) = extract_lcc(&graph).unwrap();
/// assert_eq!(lcc.num_nodes(), 3);
/// assert_eq!(mapping.original(NodeId(0)), Some("4"));
/// assert_eq!(mapping.original(NodeId(2)), Some("12"));
/// ```
pub fn extract_lcc(graph: &Graph) -> Result<(Graph, NodeMapping)> {
    let mut nodes = largest_component(graph);
    nodes.sort_by(|&a, &b| {
        label_cmp(
            graph.label(a).unwrap_or_default(),
            graph.label(b).unwrap_or_default(),
        )
    });

    let originals = nodes
        .iter()
        .map(|&node| graph.label(node).unwrap_or_default().to_owned())
        .collect();
    let lcc = graph.subgraph(&nodes)?.relabeled();

    tracing::debug!(
        nodes = lcc.num_nodes(),
        edges = lcc.num_edges(),
        of_nodes = graph.num_nodes(),
        "extracted largest connected component"
    );
    Ok((lcc, NodeMapping::from_originals(originals)))
}
