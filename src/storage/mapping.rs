//! Relabeling record for extracted subgraphs

use crate::storage::NodeId;

/// Bijection between new node ids `0..M-1` and the original labels
///
/// Entry `i` holds the original label of new node `i`, so iteration is
/// always ascending by new id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMapping {
    originals: Vec<String>,
}

impl NodeMapping {
    /// Build a mapping from original labels listed in new-id order
    #[must_use]
    pub fn from_originals(originals: Vec<String>) -> Self {
        Self { originals }
    }

    /// Number of mapped nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    /// True if nothing is mapped
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Original label of a new node id
    #[must_use]
    pub fn original(&self, new_id: NodeId) -> Option<&str> {
        self.originals.get(new_id.index()).map(String::as_str)
    }

    /// Iterate `(new_id, original)` ascending by new id
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &str)> + '_ {
        self.originals
            .iter()
            .enumerate()
            .map(|(i, label)| (NodeId::from_index(i), label.as_str()))
    }
}
