//! Graph storage layer
//!
//! Provides the in-memory [`Graph`], the relabeling record [`NodeMapping`],
//! the canonical dataset file formats and staged directory rewrites.

pub mod canonical;
pub mod graph;
pub mod mapping;
pub mod staging;

pub use canonical::{EDGES_FILE, MAPPING_FILE, PROPERTIES_FILE};
pub use graph::{label_cmp, Graph, NodeId, MAX_NODES};
pub use mapping::NodeMapping;
