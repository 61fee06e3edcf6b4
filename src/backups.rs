use std::{
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

use crate::errors::IndexError;

/// Returns the most recently modified regular file directly inside `dir`.
///
/// Modification times are compared at whole-second resolution. When several
/// files share the newest second, the lexicographically greatest file name
/// wins, so dated backup names resolve to the latest one on every platform.
/// Symlinks and subdirectories are never candidates.
pub fn latest_backup(dir: &Path) -> Result<PathBuf, IndexError> {
    if !dir.is_dir() {
        return Err(IndexError::DirectoryNotFound(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir).map_err(|source| IndexError::ReadError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut newest: Option<(u64, std::ffi::OsString)> = None;
    for entry in entries.filter_map(|entry| entry.ok()) {
        let is_file = entry
            .file_type()
            .map(|file_type| file_type.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }

        let Some(mtime) = modified_secs(&entry) else {
            continue;
        };

        let name = entry.file_name();
        let is_newer = match &newest {
            None => true,
            Some((max, max_name)) => mtime > *max || (mtime == *max && name > *max_name),
        };
        if is_newer {
            newest = Some((mtime, name));
        }
    }

    let Some((_, name)) = newest else {
        return Err(IndexError::EmptyDirectory(dir.to_path_buf()));
    };

    let path = still_present(dir.join(name))?;
    log::debug!("latest bookmark backup is {}", path.display());
    Ok(path)
}

// the browser may rotate backups between listing and use
fn still_present(path: PathBuf) -> Result<PathBuf, IndexError> {
    if path.exists() {
        Ok(path)
    } else {
        Err(IndexError::FileVanished(path))
    }
}

fn modified_secs(entry: &std::fs::DirEntry) -> Option<u64> {
    let modified = entry.metadata().ok()?.modified().ok()?;
    Some(
        modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
    )
}
