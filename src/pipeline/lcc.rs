//! Largest-connected-component variants of canonical datasets
//!
//! For a disconnected dataset `karate/`, writes a sibling `karate_lcc/`
//! holding the LCC renumbered `0..M-1`, its properties, and
//! `node_mapping.txt` pointing each new id back at the id in `karate/`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::algorithms::{extract_lcc, GraphProperties};
use crate::error::{GraphError, Result};
use crate::pipeline::{ensure_directory, for_each_dataset, BatchReport};
use crate::storage::canonical::{read_edges, read_properties, write_canonical};
use crate::storage::staging::create_directory;
use crate::storage::EDGES_FILE;

/// Suffix appended to a dataset's directory name for its LCC variant
pub const LCC_SUFFIX: &str = "_lcc";

/// What [`add_lcc`] did for one dataset
#[derive(Debug, Clone, PartialEq)]
pub enum LccOutcome {
    /// The graph is connected, so it is its own LCC; nothing written
    AlreadyConnected,
    /// The LCC directory already exists; nothing written
    AlreadyExists(PathBuf),
    /// A new LCC directory was written
    Created {
        /// The new `<name>_lcc` directory
        dir: PathBuf,
        /// Properties of the component
        properties: GraphProperties,
    },
}

/// The `<name>_lcc` sibling of a dataset directory
///
/// Paths without a final name (`.`, `a/..`) are resolved against the
/// filesystem first.
///
/// # Errors
///
/// Returns [`GraphError::Io`] if such a path cannot be resolved, or
/// [`GraphError::InvalidPath`] if it resolves to the filesystem root
pub fn lcc_dir_for(dir: &Path) -> Result<PathBuf> {
    let resolved;
    let dir = if dir.file_name().is_some() {
        dir
    } else {
        resolved = fs::canonicalize(dir).map_err(|e| GraphError::io(dir, e))?;
        resolved.as_path()
    };

    let name = dir
        .file_name()
        .ok_or_else(|| GraphError::invalid_path(dir, "directory has no name"))?;
    let mut lcc_name = name.to_os_string();
    lcc_name.push(LCC_SUFFIX);
    Ok(dir.with_file_name(lcc_name))
}

/// Write the LCC variant of a canonical dataset directory
///
/// Skips connected graphs and datasets whose LCC directory already exists.
/// The output depends only on `graph.edges`, so regenerating it after
/// deleting the LCC directory produces byte-identical files.
///
/// # Errors
///
/// - [`GraphError::InvalidPath`] if `dir` is empty or not a directory
/// - [`GraphError::Io`] / [`GraphError::InvalidProperties`] if
///   `properties.yaml` is missing or unreadable
/// - [`GraphError::MalformedEdgeList`] if `graph.edges` is not canonical
#[tracing::instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub fn add_lcc(dir: &Path) -> Result<LccOutcome> {
    ensure_directory(dir)?;

    let properties = read_properties(dir)?;
    if properties.connected {
        tracing::info!("graph is connected, skipping");
        return Ok(LccOutcome::AlreadyConnected);
    }

    let lcc_dir = lcc_dir_for(dir)?;
    if lcc_dir.exists() {
        tracing::info!(lcc_dir = %lcc_dir.display(), "LCC directory exists, skipping");
        return Ok(LccOutcome::AlreadyExists(lcc_dir));
    }

    let graph = read_edges(&dir.join(EDGES_FILE))?;
    let (lcc, mapping) = extract_lcc(&graph)?;
    let lcc_properties = GraphProperties::compute(&lcc);

    create_directory(&lcc_dir, dir, |stage| {
        write_canonical(stage, &lcc, &lcc_properties, Some(&mapping))
    })?;

    tracing::info!(
        lcc_dir = %lcc_dir.display(),
        order = lcc_properties.order,
        size = lcc_properties.size,
        "LCC written"
    );
    Ok(LccOutcome::Created {
        dir: lcc_dir,
        properties: lcc_properties,
    })
}

/// Run [`add_lcc`] on every dataset directory under `root`
///
/// # Errors
///
/// Returns an error only if `root` itself cannot be listed
pub fn add_lcc_all(root: &Path) -> Result<BatchReport<LccOutcome>> {
    for_each_dataset(root, add_lcc)
}
