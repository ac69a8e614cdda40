//! Blocking HTTP downloads via `ureq`

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{GraphError, Result};
use crate::fetch::{file_name_from_url, DestinationPolicy, Downloader};

/// Downloads over HTTP(S), streaming the body to disk
///
/// The body is written to `<name>.part` and renamed to `<name>` once
/// complete, so an interrupted download never leaves a truncated file under
/// the final name.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDownloader;

impl Downloader for HttpDownloader {
    #[tracing::instrument(level = "info", skip(self, dest_dir, policy))]
    fn download(&self, url: &str, dest_dir: &Path, policy: DestinationPolicy) -> Result<PathBuf> {
        let target = dest_dir.join(file_name_from_url(url)?);
        policy.check(&target)?;

        let download_error = |message: String| GraphError::Download {
            url: url.to_owned(),
            message,
        };

        let mut response = ureq::get(url)
            .call()
            .map_err(|error| download_error(error.to_string()))?;

        let part = part_path(&target);
        let file = File::create(&part).map_err(|e| GraphError::io(&part, e))?;
        let mut writer = BufWriter::new(file);
        let bytes = io::copy(&mut response.body_mut().as_reader(), &mut writer)
            .map_err(|error| download_error(error.to_string()))?;
        writer.flush().map_err(|e| GraphError::io(&part, e))?;
        drop(writer);

        fs::rename(&part, &target).map_err(|e| GraphError::io(&target, e))?;
        tracing::info!(path = %target.display(), bytes, "downloaded");
        Ok(target)
    }
}

fn part_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}
