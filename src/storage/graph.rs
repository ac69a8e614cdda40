//! Undirected simple graph with labeled nodes
//!
//! Nodes are dense indices assigned in first-seen order. Each node keeps the
//! label it was parsed from (an opaque string) and a sorted neighbor set.
//!
//! ```text
//! Input lines:  "a b", "b c", "a b"
//!
//! labels:     ["a", "b", "c"]
//! adjacency:  [{1}, {0, 2}, {1}]   // parallel "a b" collapsed
//! num_edges:  2
//! ```
//!
//! Self-loops are representable so that cleaning can count and remove them;
//! a self-loop contributes 2 to its node's degree.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::error::{GraphError, Result};

/// Largest node count addressable by [`NodeId`]
pub const MAX_NODES: usize = u32::MAX as usize;

/// Node identifier (zero-indexed, first-seen order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[allow(clippy::cast_possible_truncation)] // Graphs >4B nodes not supported
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Undirected graph keyed by node labels
///
/// # Example
///
/// ```
/// use graphprep::Graph;
///
/// let mut graph = Graph::new();
/// graph.add_edge("a", "b");
/// graph.add_edge("b", "c");
/// graph.add_edge("b", "a"); // same undirected edge
///
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.num_edges(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    /// Label of each node, indexed by `NodeId`
    labels: Vec<String>,

    /// Reverse lookup: label -> node
    index: HashMap<String, NodeId>,

    /// Neighbor set of each node, indexed by `NodeId`
    adjacency: Vec<BTreeSet<u32>>,

    /// Number of distinct undirected edges (self-loops included)
    num_edges: usize,
}

impl Graph {
    /// Create new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with `n` isolated nodes labeled `"0"` .. `"n-1"`
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooManyNodes`] if `n` exceeds [`MAX_NODES`] or
    /// the node tables cannot be reserved
    pub fn with_nodes(n: usize) -> Result<Self> {
        let too_many = || GraphError::TooManyNodes { requested: n };
        if n > MAX_NODES {
            return Err(too_many());
        }

        let mut graph = Self::new();
        graph.labels.try_reserve_exact(n).map_err(|_| too_many())?;
        graph.adjacency.try_reserve_exact(n).map_err(|_| too_many())?;
        graph.index.try_reserve(n).map_err(|_| too_many())?;
        for i in 0..n {
            graph.add_node(&i.to_string());
        }
        Ok(graph)
    }

    /// Get or insert the node with `label`
    pub fn add_node(&mut self, label: &str) -> NodeId {
        if let Some(&id) = self.index.get(label) {
            return id;
        }
        let id = NodeId::from_index(self.labels.len());
        self.labels.push(label.to_owned());
        self.index.insert(label.to_owned(), id);
        self.adjacency.push(BTreeSet::new());
        id
    }

    /// Add an undirected edge between two labels, inserting unseen nodes
    ///
    /// Returns `true` if the edge was not already present.
    pub fn add_edge(&mut self, u: &str, v: &str) -> bool {
        let u = self.add_node(u);
        let v = self.add_node(v);
        self.link(u, v)
    }

    /// Add an undirected edge between existing nodes
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeOutOfBounds`] if either node does not exist
    pub fn add_edge_by_id(&mut self, u: NodeId, v: NodeId) -> Result<bool> {
        self.check(u)?;
        self.check(v)?;
        Ok(self.link(u, v))
    }

    fn link(&mut self, u: NodeId, v: NodeId) -> bool {
        let inserted = self.adjacency[u.index()].insert(v.0);
        if inserted {
            self.adjacency[v.index()].insert(u.0);
            self.num_edges += 1;
        }
        inserted
    }

    fn check(&self, node: NodeId) -> Result<()> {
        if node.index() >= self.labels.len() {
            return Err(GraphError::NodeOutOfBounds {
                node: node.0,
                num_nodes: self.labels.len(),
            });
        }
        Ok(())
    }

    /// Get number of nodes (the graph's order)
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Get number of edges (the graph's size)
    #[must_use]
    pub const fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// True if the graph has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over all node ids in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.labels.len()).map(NodeId::from_index)
    }

    /// Get the label of a node
    #[must_use]
    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.labels.get(node.index()).map(String::as_str)
    }

    /// Look up the node carrying `label`
    #[must_use]
    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    /// Get the neighbors of a node in ascending id order
    ///
    /// # Errors
    ///
    /// Returns error if node ID is out of bounds
    pub fn neighbors(&self, node: NodeId) -> Result<impl Iterator<Item = NodeId> + '_> {
        self.check(node)?;
        Ok(self.adjacency[node.index()].iter().map(|&n| NodeId(n)))
    }

    pub(crate) fn neighbor_set(&self, node: usize) -> &BTreeSet<u32> {
        &self.adjacency[node]
    }

    /// Get the degree of a node (a self-loop counts twice)
    ///
    /// # Errors
    ///
    /// Returns error if node ID is out of bounds
    pub fn degree(&self, node: NodeId) -> Result<usize> {
        self.check(node)?;
        Ok(self.degree_of(node.index()))
    }

    fn degree_of(&self, node: usize) -> usize {
        let neighbors = &self.adjacency[node];
        #[allow(clippy::cast_possible_truncation)]
        let loops = usize::from(neighbors.contains(&(node as u32)));
        neighbors.len() + loops
    }

    /// Degrees of all nodes in id order
    pub fn degrees(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.labels.len()).map(move |node| self.degree_of(node))
    }

    /// Iterate over every edge once as `(u, v)` with `u <= v`, ordered by `u` then `v`
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, neighbors)| {
                #[allow(clippy::cast_possible_truncation)]
                let u = u as u32;
                neighbors
                    .range(u..)
                    .map(move |&v| (NodeId(u), NodeId(v)))
            })
    }

    /// Number of self-loop edges
    #[must_use]
    pub fn self_loop_count(&self) -> usize {
        self.adjacency
            .iter()
            .enumerate()
            .filter(|(u, neighbors)| {
                #[allow(clippy::cast_possible_truncation)]
                let u = *u as u32;
                neighbors.contains(&u)
            })
            .count()
    }

    /// Remove every self-loop edge, keeping the nodes
    ///
    /// Returns the number of edges removed.
    pub fn remove_self_loops(&mut self) -> usize {
        let mut removed = 0;
        for (u, neighbors) in self.adjacency.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let u = u as u32;
            if neighbors.remove(&u) {
                removed += 1;
            }
        }
        self.num_edges -= removed;
        removed
    }

    /// Replace every label with its node id, so labels become `"0"` .. `"N-1"`
    ///
    /// Node ids follow first-seen order, so this is the relabeling produced by
    /// enumerating nodes in the order they were parsed.
    #[must_use]
    pub fn relabeled(&self) -> Self {
        let mut graph = self.clone();
        graph.labels = (0..self.labels.len()).map(|i| i.to_string()).collect();
        graph.index = graph
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), NodeId::from_index(i)))
            .collect();
        graph
    }

    /// Induced subgraph on `nodes`, where `nodes[i]` becomes node `i`
    ///
    /// Labels are carried over from this graph. Duplicate entries in `nodes`
    /// are ignored after their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns error if any node is out of bounds
    pub fn subgraph(&self, nodes: &[NodeId]) -> Result<Self> {
        let mut position: HashMap<u32, NodeId> = HashMap::with_capacity(nodes.len());
        let mut graph = Self::new();
        for &node in nodes {
            self.check(node)?;
            if !position.contains_key(&node.0) {
                let id = graph.add_node(&self.labels[node.index()]);
                position.insert(node.0, id);
            }
        }

        for (&old, &new_u) in &position {
            for neighbor in &self.adjacency[old as usize] {
                if let Some(&new_v) = position.get(neighbor) {
                    if new_u <= new_v {
                        graph.link(new_u, new_v);
                    }
                }
            }
        }

        Ok(graph)
    }
}

/// Total order on node labels
///
/// Two labels that are both non-negative integers compare numerically;
/// numeric labels sort before non-numeric ones; non-numeric labels compare
/// lexicographically.
#[must_use]
pub fn label_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
