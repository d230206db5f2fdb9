use thiserror::Error;

/// Errors decoding a persisted soundscape.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("malformed soundsData: {0}")]
    Json(#[from] serde_json::Error),

    #[error("remote sound {name:?} has no source id")]
    MissingSourceId { name: String },

    #[error("local sound {name:?} carries a source id")]
    UnexpectedSourceId { name: String },

    #[error("unknown source type {0:?}")]
    UnknownSourceType(String),

    #[error("bad asset file name {0:?}")]
    BadFileName(String),

    #[error("bad volume {0}")]
    BadVolume(f32),

    #[error("record key {0:?} is not a soundscape id")]
    BadId(String),
}
