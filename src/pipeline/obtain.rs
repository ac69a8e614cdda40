//! Download, extract and prepare one dataset archive

use std::fs;
use std::path::Path;

use crate::error::{GraphError, Result};
use crate::fetch::{Archiver, DestinationPolicy, Downloader};
use crate::pipeline::{prepare, PrepareOutcome};

/// Fetch the archive at `url` and turn it into a canonical dataset under `data_dir`
///
/// The archive is downloaded into a fresh temporary directory, extracted to
/// `data_dir/<archive name up to the first '.'>`, deleted, and the extracted
/// directory is prepared.
///
/// # Errors
///
/// Returns the first failing step's error: download, extraction, or
/// [`prepare`]
#[tracing::instrument(level = "info", skip(downloader, archiver, data_dir))]
pub fn obtain(
    url: &str,
    data_dir: &Path,
    downloader: &dyn Downloader,
    archiver: &dyn Archiver,
    policy: DestinationPolicy,
) -> Result<PrepareOutcome> {
    let workdir = tempfile::tempdir().map_err(|e| GraphError::io(std::env::temp_dir(), e))?;
    let archive = downloader.download(url, workdir.path(), policy)?;

    fs::create_dir_all(data_dir).map_err(|e| GraphError::io(data_dir, e))?;
    let dataset = archiver.extract(&archive, data_dir, policy)?;
    fs::remove_file(&archive).map_err(|e| GraphError::io(&archive, e))?;
    tracing::debug!(dataset = %dataset.display(), "archive extracted and removed");

    prepare(&dataset)
}
