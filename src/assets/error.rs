use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    /// The sounds directory cannot be created or opened. Fatal to any
    /// operation that needs storage.
    #[error("sounds directory {path:?} unavailable: {source}")]
    CacheDirUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy {path:?} into the sounds directory: {source}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("invalid asset file name {0:?}")]
    InvalidName(String),
}

pub type AssetResult<T> = Result<T, AssetError>;
