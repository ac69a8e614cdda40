//! Graph traversal (BFS)
//!
//! Iterative, queue-based: no recursion, so deep path graphs cannot
//! overflow the stack.

use std::collections::VecDeque;

use crate::error::Result;
use crate::storage::{Graph, NodeId};

/// Breadth-First Search from source node
///
/// Returns every node reachable from `source` (including `source`) in the
/// order it was first visited.
///
/// # Errors
///
/// Returns [`GraphError::NodeOutOfBounds`](crate::GraphError::NodeOutOfBounds)
/// if `source` is not a node of `graph`.
///
/// # Example
///
/// ```
/// use graphprep::{bfs, Graph, NodeId};
///
/// let mut graph = Graph::new();
/// graph.add_edge("a", "b");
/// graph.add_edge("b", "c");
/// graph.add_edge("x", "y");
///
/// let reachable = bfs(&graph, NodeId(0)).unwrap();
/// assert_eq!(reachable, vec![NodeId(0), NodeId(1), NodeId(2)]);
/// ```
pub fn bfs(graph: &Graph, source: NodeId) -> Result<Vec<NodeId>> {
    graph.degree(source)?;
    let mut visited = vec![false; graph.num_nodes()];
    Ok(mark_reachable(graph, source.index(), &mut visited)
        .into_iter()
        .map(NodeId::from_index)
        .collect())
}

/// BFS from `start` over unvisited nodes, marking each one in `visited`
///
/// Returns the newly visited node indices in visit order.
pub(crate) fn mark_reachable(graph: &Graph, start: usize, visited: &mut [bool]) -> Vec<usize> {
    let mut order = Vec::new();
    if visited[start] {
        return order;
    }

    let mut queue = VecDeque::new();
    visited[start] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        order.push(current);
        for &neighbor in graph.neighbor_set(current) {
            let neighbor = neighbor as usize;
            if !visited[neighbor] {
                visited[neighbor] = true;
                queue.push_back(neighbor);
            }
        }
    }

    order
}
