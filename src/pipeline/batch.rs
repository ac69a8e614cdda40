//! Run a pipeline over every dataset directory under a root
//!
//! A failing dataset is logged and recorded; the remaining datasets still run.

use std::path::{Path, PathBuf};

use crate::error::{GraphError, Result};
use crate::pipeline::{ensure_directory, prepare, sorted_entries, PrepareOutcome};

/// Per-dataset results of a batch run, in processing order
#[derive(Debug)]
pub struct BatchReport<T> {
    /// Datasets that completed, with their outcome
    pub succeeded: Vec<(PathBuf, T)>,
    /// Datasets that failed, with their error
    pub failed: Vec<(PathBuf, GraphError)>,
}

impl<T> BatchReport<T> {
    /// True if no dataset failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of datasets processed
    #[must_use]
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// True if `root` held no datasets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Run `op` on each subdirectory of `root`, sorted by name
///
/// Hidden directories (names starting with `.`, such as leftover staging
/// directories) are skipped.
///
/// # Errors
///
/// Returns an error only if `root` is not a readable directory. Per-dataset
/// errors are collected in the report.
#[tracing::instrument(level = "info", skip_all, fields(root = %root.display()))]
pub fn for_each_dataset<T, F>(root: &Path, mut op: F) -> Result<BatchReport<T>>
where
    F: FnMut(&Path) -> Result<T>,
{
    ensure_directory(root)?;

    let datasets: Vec<PathBuf> = sorted_entries(root)?
        .into_iter()
        .filter(|path| {
            let hidden = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with('.'));
            !hidden && path.is_dir()
        })
        .collect();
    tracing::info!(datasets = datasets.len(), "processing datasets");

    let mut report = BatchReport::default();
    for dataset in datasets {
        match op(&dataset) {
            Ok(outcome) => report.succeeded.push((dataset, outcome)),
            Err(err) => {
                tracing::error!(dataset = %dataset.display(), error = %err, "dataset failed");
                report.failed.push((dataset, err));
            }
        }
    }

    tracing::info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "batch finished"
    );
    Ok(report)
}

/// [`prepare`] every dataset directory under `root`
///
/// # Errors
///
/// Returns an error only if `root` itself cannot be listed
pub fn prepare_all(root: &Path) -> Result<BatchReport<PrepareOutcome>> {
    for_each_dataset(root, prepare)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_visits_sorted_subdirectories_only() {
        let root = tempdir().unwrap();
        for name in ["b", "a", ".hidden", "c"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        fs::write(root.path().join("stray.txt"), "").unwrap();

        let mut seen = Vec::new();
        let report = for_each_dataset(root.path(), |dir| {
            seen.push(dir.file_name().unwrap().to_string_lossy().into_owned());
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, vec!["a", "b", "c"]);
        assert_eq!(report.len(), 3);
        assert!(report.is_success());
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let root = tempdir().unwrap();
        for name in ["a", "b", "c"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }

        let report = for_each_dataset(root.path(), |dir| {
            if dir.ends_with("b") {
                Err(GraphError::NoGraphDataFound {
                    dir: dir.to_path_buf(),
                })
            } else {
                Ok(1)
            }
        })
        .unwrap();

        assert_eq!(report.succeeded.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, root.path().join("b"));
        assert!(!report.is_success());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let root = tempdir().unwrap();
        let result = for_each_dataset(&root.path().join("missing"), |_| Ok(()));
        assert!(matches!(result, Err(GraphError::InvalidPath { .. })));
    }
}
