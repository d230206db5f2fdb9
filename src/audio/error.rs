use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while opening playback for a track.
#[derive(Error, Debug)]
pub enum TrackError {
    /// The asset could not be opened or decoded.
    #[error("cannot play {path:?}: {reason}")]
    AssetUnplayable { path: PathBuf, reason: String },

    /// No audio output device could be opened.
    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),
}

pub type TrackResult<T> = Result<T, TrackError>;
