//! Audio playback: looping tracks and the engines that drive them.

mod engine;
mod error;
mod track;

pub use engine::{PlaybackEngine, RodioEngine, Voice};
pub use error::{TrackError, TrackResult};
pub use track::{AudioTrack, Provenance, TrackId, clamp_volume};

#[cfg(test)]
pub(crate) mod testing;
