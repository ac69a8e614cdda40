//! ZIP extraction via the `zip` crate

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::{GraphError, Result};
use crate::fetch::{archive_stem, Archiver, DestinationPolicy};

/// Extracts `.zip` archives
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl Archiver for ZipArchiver {
    #[tracing::instrument(level = "info", skip_all, fields(archive = %archive.display()))]
    fn extract(
        &self,
        archive: &Path,
        out_parent: &Path,
        policy: DestinationPolicy,
    ) -> Result<PathBuf> {
        let out_dir = out_parent.join(archive_stem(archive)?);
        policy.check(&out_dir)?;

        let archive_error = |message: String| GraphError::Archive {
            path: archive.to_path_buf(),
            message,
        };

        let file = File::open(archive).map_err(|e| GraphError::io(archive, e))?;
        let mut zip = zip::ZipArchive::new(file).map_err(|e| archive_error(e.to_string()))?;

        if out_dir.exists() {
            tracing::warn!(dir = %out_dir.display(), "overwriting existing dataset directory");
            fs::remove_dir_all(&out_dir).map_err(|e| GraphError::io(&out_dir, e))?;
        }
        fs::create_dir_all(&out_dir).map_err(|e| GraphError::io(&out_dir, e))?;
        zip.extract(&out_dir)
            .map_err(|e| archive_error(e.to_string()))?;

        tracing::info!(dir = %out_dir.display(), entries = zip.len(), "extracted archive");
        Ok(out_dir)
    }
}
