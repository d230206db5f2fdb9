//! Mapping between a live mix and its persisted form.
//!
//! Nothing here fetches or plays anything. `materialize` only asks the
//! asset store whether each named file is present.

use std::path::PathBuf;

use crate::assets::AssetStore;
use crate::audio::AudioTrack;
use crate::mix::MixSession;

use super::error::CodecError;
use super::model::{SoundInfo, Soundscape};

/// The persisted facts for one track.
pub fn sound_info(track: &AudioTrack) -> SoundInfo {
    SoundInfo {
        source: track.provenance().into(),
        name: track.name().to_string(),
        file_name: track.file_name(),
        volume: track.volume(),
        muted: track.is_muted(),
    }
}

/// Snapshot the session, in order, as a new soundscape named `name`.
pub fn snapshot(session: &MixSession, name: impl Into<String>) -> Soundscape {
    let infos = session.tracks().iter().map(|t| sound_info(t)).collect();
    Soundscape::new(name, infos)
}

/// Encode the sound list as the single text blob stored remotely.
pub fn encode_sound_infos(infos: &[SoundInfo]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(infos)?)
}

pub fn decode_sound_infos(data: &str) -> Result<Vec<SoundInfo>, CodecError> {
    Ok(serde_json::from_str(data)?)
}

/// A sound entry paired with its local asset, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct Materialized {
    pub info: SoundInfo,
    pub local: Option<PathBuf>,
}

/// Resolve each entry against the sounds directory, preserving order.
pub fn materialize<F>(soundscape: &Soundscape, store: &AssetStore<F>) -> Vec<Materialized> {
    soundscape
        .sound_infos
        .iter()
        .map(|info| Materialized {
            info: info.clone(),
            local: store.locate(&info.file_name),
        })
        .collect()
}
