//! Dataset directory pipelines
//!
//! - [`prepare`]: turn a directory holding one raw graph file into a
//!   canonical directory (`graph.edges` + `properties.yaml`)
//! - [`add_lcc`]: add a `<name>_lcc` sibling holding the largest connected
//!   component of a canonical, disconnected dataset
//! - [`for_each_dataset`]: run either over every dataset under a root
//! - [`obtain`]: download, extract and prepare a dataset archive

pub mod batch;
pub mod lcc;
pub mod obtain;
pub mod prepare;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GraphError, Result};

pub use batch::{for_each_dataset, prepare_all, BatchReport};
pub use lcc::{add_lcc, add_lcc_all, lcc_dir_for, LccOutcome};
pub use obtain::obtain;
pub use prepare::{find_raw_graph_file, prepare, PrepareOutcome};

/// Entries of `dir`, sorted byte-wise by file name
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| GraphError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()).map_err(|e| GraphError::io(dir, e)))
        .collect::<Result<Vec<_>>>()?;
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

fn ensure_directory(dir: &Path) -> Result<()> {
    crate::error::ensure_non_empty(dir)?;
    if !dir.is_dir() {
        return Err(GraphError::invalid_path(dir, "not a directory"));
    }
    Ok(())
}
