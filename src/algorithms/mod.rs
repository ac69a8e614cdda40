//! Graph algorithms (BFS, connected components, summary properties)

pub mod properties;
pub mod structure;
pub mod traversal;

pub use properties::GraphProperties;
pub use structure::{components, extract_lcc, is_connected, largest_component};
pub use traversal::bfs;
