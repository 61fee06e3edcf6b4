use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    #[error("profile registry {} does not exist", .0.display())]
    RegistryNotFound(PathBuf),

    #[error("profile registry {} lists no profile path", .0.display())]
    ProfileMissing(PathBuf),

    #[error("could not determine the home directory")]
    HomeNotFound,

    #[error("{} seems doesn't exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("it seems there are no files in {}", .0.display())]
    EmptyDirectory(PathBuf),

    #[error("{} disappeared before it could be used", .0.display())]
    FileVanished(PathBuf),

    #[error("couldnt read {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is empty", .0.display())]
    EmptyData(PathBuf),

    #[error("{} is not a bookmark tree: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("watch error: {0:?}")]
    Watch(#[from] notify::Error),

    #[error("bookmark index is not initialized")]
    NotInitialized,
}

impl IndexError {
    /// Short headline for the notification surface; `Display` is the detail.
    pub fn title(&self) -> &'static str {
        match self {
            IndexError::RegistryNotFound(_)
            | IndexError::ProfileMissing(_)
            | IndexError::HomeNotFound => "Profile Error",
            IndexError::DirectoryNotFound(_)
            | IndexError::EmptyDirectory(_)
            | IndexError::FileVanished(_) => "Directory Error",
            IndexError::ReadError { .. } => "Error reading file",
            IndexError::EmptyData(_) | IndexError::ParseError { .. } => "Error parsing file",
            IndexError::Watch(_) => "Watch Error",
            IndexError::NotInitialized => "Not Initialized",
        }
    }
}
