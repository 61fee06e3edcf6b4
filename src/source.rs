use std::path::{Path, PathBuf};

use crate::{backups, config::Config, errors::IndexError, profile};

pub const BOOKMARK_FILE_VAR: &str = "BOOKMARK_FILE";
pub const BOOKMARK_BACKUPS_DIR_VAR: &str = "BOOKMARK_BACKUPS_DIR";

const REGISTRY_FILE_NAME: &str = "profiles.ini";
const BACKUPS_DIR_NAME: &str = "bookmarkbackups";

/// Where the bookmark file comes from. Resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// `BOOKMARK_FILE`: used as is, validated on first read.
    File(PathBuf),
    /// `BOOKMARK_BACKUPS_DIR`: newest file in that directory.
    BackupsDir(PathBuf),
    /// Default profile's `bookmarkbackups/`, found through `<profile_root>/profiles.ini`.
    Discover { profile_root: Option<PathBuf> },
}

impl Source {
    pub fn from_env(config: &Config) -> Self {
        Self::from_vars(
            std::env::var(BOOKMARK_FILE_VAR).ok(),
            std::env::var(BOOKMARK_BACKUPS_DIR_VAR).ok(),
            config.profile_root.clone(),
        )
    }

    /// Picks the source from raw variable values. Empty values count as unset.
    pub fn from_vars(
        bookmark_file: Option<String>,
        backups_dir: Option<String>,
        profile_root: Option<PathBuf>,
    ) -> Self {
        if let Some(file) = bookmark_file.filter(|v| !v.is_empty()) {
            Source::File(PathBuf::from(file))
        } else if let Some(dir) = backups_dir.filter(|v| !v.is_empty()) {
            Source::BackupsDir(PathBuf::from(dir))
        } else {
            Source::Discover { profile_root }
        }
    }

    /// Resolves the bookmark file path. Only the explicit file skips validation.
    pub fn resolve(&self) -> Result<PathBuf, IndexError> {
        match self {
            Source::File(path) => Ok(path.clone()),
            Source::BackupsDir(dir) => backups::latest_backup(dir),
            Source::Discover { profile_root } => {
                let profile_root = match profile_root {
                    Some(root) => root.clone(),
                    None => default_profile_root()?,
                };
                backups::latest_backup(&default_backups_dir(&profile_root)?)
            }
        }
    }
}

pub fn default_profile_root() -> Result<PathBuf, IndexError> {
    let home = homedir::my_home()
        .ok()
        .flatten()
        .ok_or(IndexError::HomeNotFound)?;
    Ok(home.join(".mozilla").join("firefox"))
}

/// `bookmarkbackups/` of the default profile listed in `<profile_root>/profiles.ini`.
pub fn default_backups_dir(profile_root: &Path) -> Result<PathBuf, IndexError> {
    let profile = profile::default_profile(&profile_root.join(REGISTRY_FILE_NAME))?;
    log::debug!(
        "default profile {} (relative: {})",
        profile.path,
        profile.is_relative
    );

    let profile_dir = if profile.is_relative {
        profile_root.join(&profile.path)
    } else {
        PathBuf::from(&profile.path)
    };

    Ok(profile_dir.join(BACKUPS_DIR_NAME))
}
