//! Soundscapes: named, persistable snapshots of a mix.

mod codec;
mod error;
mod model;

pub use codec::{Materialized, decode_sound_infos, encode_sound_infos, materialize, snapshot, sound_info};
pub use error::CodecError;
pub use model::{SoundInfo, SoundSource, Soundscape};
