//! Canonicalize one raw dataset directory
//!
//! ```text
//! before:  karate/            after:  karate/
//!            karate.mtx                 graph.edges
//!            readme.html                properties.yaml
//! ```
//!
//! Steps: pick the raw file, parse (with format fallback), drop self-loops,
//! renumber nodes `0..N-1` in first-seen order, compute properties, then
//! swap a staged directory holding the canonical files into place.

use std::path::{Path, PathBuf};

use crate::algorithms::GraphProperties;
use crate::error::{GraphError, Result};
use crate::parse::{parse_graph, Format};
use crate::pipeline::{ensure_directory, sorted_entries};
use crate::storage::canonical::write_canonical;
use crate::storage::staging::replace_directory;
use crate::storage::{EDGES_FILE, PROPERTIES_FILE};

/// Result of preparing one dataset directory
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareOutcome {
    /// The dataset directory, now canonical
    pub dir: PathBuf,
    /// The raw file the graph was read from (no longer exists)
    pub source: PathBuf,
    /// Every other entry that was in the directory and has been removed
    pub discarded: Vec<PathBuf>,
    /// Number of self-loop edges dropped while cleaning
    pub self_loops_removed: usize,
    /// Properties of the canonical graph
    pub properties: GraphProperties,
}

/// Find the raw graph file `prepare` would use
///
/// Candidates are regular files ending in `.mtx` or `.edges`, taken in
/// byte-wise file name order. The canonical `graph.edges` of a directory that
/// also holds `properties.yaml` is never a candidate.
///
/// # Errors
///
/// Returns [`GraphError::NoGraphDataFound`] if there is no candidate, or
/// [`GraphError::Io`] if the directory cannot be listed
pub fn find_raw_graph_file(dir: &Path) -> Result<PathBuf> {
    let entries = sorted_entries(dir)?;
    first_candidate(dir, &entries)
}

fn first_candidate(dir: &Path, entries: &[PathBuf]) -> Result<PathBuf> {
    let canonical = dir.join(PROPERTIES_FILE).is_file();

    entries
        .iter()
        .find(|path| {
            let recognized = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(Format::from_extension)
                .is_some();
            let is_output = canonical && path.file_name().is_some_and(|name| name == EDGES_FILE);
            recognized && !is_output && path.is_file()
        })
        .cloned()
        .ok_or_else(|| GraphError::NoGraphDataFound {
            dir: dir.to_path_buf(),
        })
}

/// Replace the contents of a raw dataset directory with its canonical form
///
/// Only the first raw file is read. Everything else in the directory,
/// including further graph files and subdirectories, is deleted.
///
/// The swap happens at the resolved location of `dir`, so `.` and symlinked
/// dataset directories work; a process whose working directory is `dir`
/// is left in the old, removed directory.
///
/// # Errors
///
/// - [`GraphError::InvalidPath`] if `dir` is empty or not a directory
/// - [`GraphError::NoGraphDataFound`] if there is no raw graph file; the
///   directory is left untouched
/// - any parse error from [`parse_graph`]
/// - [`GraphError::Io`] if staging or swapping fails; the original contents
///   are kept
///
/// # Example
///
/// ```no_run
/// use graphprep::prepare;
/// use std::path::Path;
///
/// let outcome = prepare(Path::new("data/graphs/karate"))?;
/// println!("{} nodes", outcome.properties.order);
/// # Ok::<(), graphprep::GraphError>(())
/// ```
#[tracing::instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub fn prepare(dir: &Path) -> Result<PrepareOutcome> {
    ensure_directory(dir)?;

    let entries = sorted_entries(dir)?;
    let source = first_candidate(dir, &entries)?;
    tracing::info!(source = %source.display(), "preparing dataset");

    let mut graph = parse_graph(&source, None)?;
    let self_loops_removed = graph.remove_self_loops();
    if self_loops_removed > 0 {
        tracing::debug!(self_loops_removed, "removed self-loops");
    }
    let graph = graph.relabeled();
    let properties = GraphProperties::compute(&graph);

    let discarded: Vec<PathBuf> = entries.into_iter().filter(|path| *path != source).collect();
    for path in &discarded {
        tracing::warn!(path = %path.display(), "discarding non-graph entry");
    }

    replace_directory(dir, |stage| write_canonical(stage, &graph, &properties, None))?;

    tracing::info!(
        order = properties.order,
        size = properties.size,
        connected = properties.connected,
        "dataset prepared"
    );
    Ok(PrepareOutcome {
        dir: dir.to_path_buf(),
        source,
        discarded,
        self_loops_removed,
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_candidate_order_is_by_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.edges"), "1 2\n").unwrap();
        fs::write(dir.path().join("a.mtx"), "1 2\n").unwrap();
        fs::write(dir.path().join("0.txt"), "1 2\n").unwrap();

        let found = find_raw_graph_file(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "a.mtx");
    }

    #[test]
    fn test_directories_are_not_candidates() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested.mtx")).unwrap();
        assert!(matches!(
            find_raw_graph_file(dir.path()),
            Err(GraphError::NoGraphDataFound { .. })
        ));
    }

    #[test]
    fn test_canonical_edges_not_a_candidate() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(EDGES_FILE), "0 1\n").unwrap();
        // without properties.yaml a lone graph.edges is raw input
        assert!(find_raw_graph_file(dir.path()).is_ok());

        fs::write(dir.path().join(PROPERTIES_FILE), "order: 2\n").unwrap();
        assert!(find_raw_graph_file(dir.path()).is_err());
    }

    #[test]
    fn test_prepare_reports_discarded_entries() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("toy");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("toy.edges"), "1 2\n2 2\n2 3\n").unwrap();
        fs::write(data.join("readme.html"), "<p>toy</p>").unwrap();
        fs::write(data.join("zz.mtx"), "not used").unwrap();

        let outcome = prepare(&data).unwrap();
        assert_eq!(outcome.source, data.join("toy.edges"));
        assert_eq!(
            outcome.discarded,
            vec![data.join("readme.html"), data.join("zz.mtx")]
        );
        assert_eq!(outcome.self_loops_removed, 1);
        assert_eq!(outcome.properties.size, 2);
        assert_eq!(
            fs::read_to_string(data.join(EDGES_FILE)).unwrap(),
            "0 1\n1 2\n"
        );
    }

    #[test]
    fn test_prepare_through_parent_reference() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("toy");
        fs::create_dir_all(data.join("nested")).unwrap();
        fs::write(data.join("toy.edges"), "1 2\n").unwrap();

        let outcome = prepare(&data.join("nested").join("..")).unwrap();
        assert_eq!(outcome.discarded.len(), 1);

        let mut names: Vec<_> = fs::read_dir(&data)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec![EDGES_FILE, PROPERTIES_FILE]);
    }

    #[cfg(unix)]
    #[test]
    fn test_prepare_symlinked_dataset() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("store");
        let link = dir.path().join("toy");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("toy.edges"), "1 2\n2 3\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        prepare(&link).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert!(!real.join("toy.edges").exists());
        assert_eq!(
            fs::read_to_string(real.join(EDGES_FILE)).unwrap(),
            "0 1\n1 2\n"
        );
    }

    #[test]
    fn test_prepare_not_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("g.edges");
        fs::write(&file, "1 2\n").unwrap();
        assert!(matches!(prepare(&file), Err(GraphError::InvalidPath { .. })));
        assert!(matches!(
            prepare(Path::new("")),
            Err(GraphError::InvalidPath { .. })
        ));
    }
}
