//! Staged directory writes
//!
//! Output is always written into a temporary sibling directory first and then
//! moved into place with `rename`, so a dataset directory is either its old
//! contents or its new contents, never a half-deleted mix.
//!
//! Staging directories live next to the target so the final `rename` never
//! crosses a filesystem boundary. None of this is safe under concurrent
//! writers to the same directory; callers must serialize access.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::error::{GraphError, Result};

/// Replace the entire contents of `dir` with whatever `populate` writes
///
/// `populate` receives an empty staging directory. The swap moves `dir` aside
/// into a backup sibling, renames the staging directory to `dir`, and only
/// then deletes the backup. If the second rename fails, the backup is moved
/// back and the original contents are untouched.
///
/// `dir` is resolved first, so `.`, `..` and symlinked directories are
/// swapped at their real location and a symlink keeps pointing at them.
///
/// # Errors
///
/// Returns the error from `populate`, or [`GraphError::Io`] if `dir` cannot
/// be resolved, staging fails, or either rename fails
pub fn replace_directory<F>(dir: &Path, populate: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let dir = &fs::canonicalize(dir).map_err(|e| GraphError::io(dir, e))?;
    let parent = parent_of(dir)?;
    let name = file_name_of(dir)?;

    let staging = stage_in(parent, &name)?;
    populate(staging.path())?;

    let permissions = fs::metadata(dir)
        .map_err(|e| GraphError::io(dir, e))?
        .permissions();
    fs::set_permissions(staging.path(), permissions)
        .map_err(|e| GraphError::io(staging.path(), e))?;

    // An empty directory created by tempfile, which rename may replace.
    let backup = tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".old")
        .tempdir_in(parent)
        .map_err(|e| GraphError::io(parent, e))?;

    fs::rename(dir, backup.path()).map_err(|e| GraphError::io(dir, e))?;

    if let Err(err) = fs::rename(staging.path(), dir) {
        tracing::error!(dir = %dir.display(), error = %err, "swap failed, restoring original contents");
        fs::rename(backup.path(), dir).map_err(|e| GraphError::io(backup.path(), e))?;
        return Err(GraphError::io(dir, err));
    }

    tracing::debug!(
        dir = %dir.display(),
        backup = %backup.path().display(),
        "swapped staged contents into place"
    );
    // Dropping the backup deletes the old contents; dropping `staging` is a
    // no-op because its path no longer exists.
    backup.close().map_err(|e| GraphError::io(dir, e))?;
    drop(staging);
    Ok(())
}

/// Create `dir` with the contents `populate` writes, failing if it exists
///
/// The new directory takes the permissions of `template`.
///
/// # Errors
///
/// Returns [`GraphError::DestinationExists`] if `dir` already exists, the
/// error from `populate`, or [`GraphError::Io`]
pub fn create_directory<F>(dir: &Path, template: &Path, populate: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    if dir.exists() {
        return Err(GraphError::DestinationExists {
            path: dir.to_path_buf(),
        });
    }

    let parent = parent_of(dir)?;
    let name = file_name_of(dir)?;

    let staging = stage_in(parent, &name)?;
    populate(staging.path())?;

    let permissions = fs::metadata(template)
        .map_err(|e| GraphError::io(template, e))?
        .permissions();
    fs::set_permissions(staging.path(), permissions)
        .map_err(|e| GraphError::io(staging.path(), e))?;

    if dir.exists() {
        return Err(GraphError::DestinationExists {
            path: dir.to_path_buf(),
        });
    }
    fs::rename(staging.path(), dir).map_err(|e| GraphError::io(dir, e))?;
    drop(staging);
    Ok(())
}

fn stage_in(parent: &Path, name: &str) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".staging")
        .tempdir_in(parent)
        .map_err(|e| GraphError::io(parent, e))
}

fn parent_of(dir: &Path) -> Result<&Path> {
    match dir.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Ok(Path::new(".")),
        Some(parent) => Ok(parent),
        None => Err(GraphError::invalid_path(dir, "directory has no parent")),
    }
}

fn file_name_of(dir: &Path) -> Result<String> {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| GraphError::invalid_path(dir, "directory has no name"))
}
