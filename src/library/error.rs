use thiserror::Error;

use crate::assets::AssetError;
use crate::audio::TrackError;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Track(#[from] TrackError),

    #[error("search result {0} has no downloadable preview")]
    NoPreview(i64),

    /// The mix was cleared or replaced before the sound could join it.
    #[error("the mix was replaced before the sound could start")]
    Superseded,
}

pub type LibraryResult<T> = Result<T, LibraryError>;
