//! graphprep: normalize graph datasets into a canonical layout
//!
//! # Overview
//!
//! graphprep reads graph files published in loosely specified formats
//! (Matrix Market adjacency matrices and free-form edge lists), cleans them
//! into simple undirected graphs, and rewrites each dataset directory into a
//! canonical form: a sorted `graph.edges` file plus a `properties.yaml`
//! summary. Disconnected datasets can additionally get a `<name>_lcc`
//! variant holding their largest connected component.
//!
//! # Quick Start
//!
//! ```no_run
//! use graphprep::{add_lcc, parse_graph, prepare, GraphProperties};
//! use std::path::Path;
//!
//! // Inspect a raw file (format from the extension, with fallback)
//! let graph = parse_graph(Path::new("data/graphs/karate/karate.mtx"), None)?;
//! println!("{}", GraphProperties::compute(&graph).to_yaml());
//!
//! // Canonicalize the dataset directory in place
//! let outcome = prepare(Path::new("data/graphs/karate"))?;
//! assert!(outcome.properties.order > 0);
//!
//! // Add the LCC variant if the graph is disconnected
//! add_lcc(Path::new("data/graphs/karate"))?;
//! # Ok::<(), graphprep::GraphError>(())
//! ```
//!
//! # Architecture
//!
//! - **Parsing**: Matrix Market and edge-list parsers behind a format-detecting
//!   orchestrator that retries once with the other format
//! - **Storage**: label-keyed undirected [`Graph`], canonical file readers and
//!   writers, staged directory swaps
//! - **Algorithms**: BFS, connected components, LCC extraction, properties
//! - **Pipelines**: prepare, LCC, batch runs, download + extract + prepare

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod cli;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod parse;
pub mod pipeline;
pub mod storage;

// Re-export core types
pub use algorithms::{
    bfs, components, extract_lcc, is_connected, largest_component, GraphProperties,
};
pub use parse::{parse_graph, Format};
pub use pipeline::{
    add_lcc, add_lcc_all, for_each_dataset, obtain, prepare, prepare_all, BatchReport,
    LccOutcome, PrepareOutcome,
};
pub use storage::{Graph, NodeId, NodeMapping};

// Error type
pub use error::{GraphError, Result};
