//! Dataset download and extraction collaborators
//!
//! The pipelines only see the [`Downloader`] and [`Archiver`] traits. The
//! HTTP and ZIP implementations are compiled with the `fetch` feature.

#[cfg(feature = "fetch")]
pub mod archive;
#[cfg(feature = "fetch")]
pub mod download;

use std::path::{Path, PathBuf};

use crate::error::{GraphError, Result};

#[cfg(feature = "fetch")]
pub use archive::ZipArchiver;
#[cfg(feature = "fetch")]
pub use download::HttpDownloader;

/// What to do when a download or extraction target already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DestinationPolicy {
    /// Replace the existing file or directory
    #[default]
    Overwrite,
    /// Fail with [`GraphError::DestinationExists`]
    NoClobber,
}

impl DestinationPolicy {
    /// Apply the policy to an existing `path`
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DestinationExists`] under `NoClobber`
    pub fn check(self, path: &Path) -> Result<()> {
        if self == Self::NoClobber && path.exists() {
            return Err(GraphError::DestinationExists {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Fetches a remote file into a local directory
pub trait Downloader {
    /// Download `url` into `dest_dir`, returning the written file
    ///
    /// The file name is the last path segment of the URL.
    ///
    /// # Errors
    ///
    /// [`GraphError::DestinationExists`] under `NoClobber` if the file exists,
    /// [`GraphError::Download`] or [`GraphError::Io`] otherwise
    fn download(&self, url: &str, dest_dir: &Path, policy: DestinationPolicy) -> Result<PathBuf>;
}

/// Unpacks an archive into a directory named after it
pub trait Archiver {
    /// Extract `archive` into `<out_parent>/<archive name up to the first '.'>`
    ///
    /// # Errors
    ///
    /// [`GraphError::DestinationExists`] under `NoClobber` if the directory
    /// exists, [`GraphError::Archive`] or [`GraphError::Io`] otherwise
    fn extract(&self, archive: &Path, out_parent: &Path, policy: DestinationPolicy)
        -> Result<PathBuf>;
}

/// Guess a file name from the last path segment of `url`
///
/// # Errors
///
/// Returns [`GraphError::Download`] if the URL path has no final segment
pub fn file_name_from_url(url: &str) -> Result<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = path.split_once("://").map_or(path, |(_, rest)| rest);
    path.split_once('/')
        .map(|(_host, path)| path)
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_owned)
        .ok_or_else(|| GraphError::Download {
            url: url.to_owned(),
            message: "cannot guess a file name from the URL".to_owned(),
        })
}

/// Directory name for an extracted archive: its file name up to the first `.`
///
/// # Errors
///
/// Returns [`GraphError::Archive`] if that prefix is empty
pub fn archive_stem(archive: &Path) -> Result<String> {
    archive
        .file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_owned))
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| GraphError::Archive {
            path: archive.to_path_buf(),
            message: "cannot derive a directory name from the archive name".to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://nrvis.com/download/data/misc/karate.zip").unwrap(),
            "karate.zip"
        );
        assert_eq!(
            file_name_from_url("http://host/a/b.mtx.zip?token=1#frag").unwrap(),
            "b.mtx.zip"
        );
        assert!(file_name_from_url("https://host/dir/").is_err());
        assert!(file_name_from_url("https://host").is_err());
    }

    #[test]
    fn test_archive_stem() {
        assert_eq!(archive_stem(Path::new("/tmp/x/ca-GrQc.tar.zip")).unwrap(), "ca-GrQc");
        assert_eq!(archive_stem(Path::new("karate.zip")).unwrap(), "karate");
        assert!(archive_stem(Path::new(".zip")).is_err());
    }

    #[test]
    fn test_policy_check() {
        let dir = tempdir().unwrap();
        assert!(DestinationPolicy::Overwrite.check(dir.path()).is_ok());
        assert!(matches!(
            DestinationPolicy::NoClobber.check(dir.path()),
            Err(GraphError::DestinationExists { .. })
        ));
        assert!(DestinationPolicy::NoClobber
            .check(&dir.path().join("absent"))
            .is_ok());
    }
}
