use std::io;

use thiserror::Error;
use uuid::Uuid;

use crate::soundscape::CodecError;

/// Transport-level failures reported by a record store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record {0:?} not found")]
    NotFound(String),

    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid record key {0:?}")]
    InvalidKey(String),

    #[error("record {key:?} is malformed: {reason}")]
    Malformed { key: String, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Sync failures. None of these affect the local soundscape list, which
/// stays authoritative.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("failed to write soundscape {id} to the record store: {source}")]
    RemoteWriteFailed {
        id: Uuid,
        #[source]
        source: StoreError,
    },

    #[error("failed to read from the record store: {0}")]
    RemoteReadFailed(#[source] StoreError),

    #[error("record {key:?} could not be decoded: {reason}")]
    DecodeFailed { key: String, reason: String },

    #[error("failed to encode soundscape {id}: {source}")]
    EncodeFailed {
        id: Uuid,
        #[source]
        source: CodecError,
    },
}

pub type SyncResult<T> = Result<T, SyncError>;

/// Why a soundscape entry was left out of a loaded mix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("asset could not be played: {0}")]
    AssetUnplayable(String),

    #[error("download failed: {0}")]
    FetchFailed(String),

    /// A local import that only ever lived on another device.
    #[error("asset is not on this device")]
    AssetMissingUnrecoverable,

    #[error("mix was replaced while loading")]
    Superseded,
}
