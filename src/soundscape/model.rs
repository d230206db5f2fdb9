use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audio::Provenance;

use super::error::CodecError;

/// Provenance as persisted. Unlike `Provenance`, a local entry says
/// nothing about how it got onto the device.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SoundSource {
    Remote { source_id: i64 },
    Local,
}

impl From<Provenance> for SoundSource {
    fn from(p: Provenance) -> Self {
        match p {
            Provenance::Remote { source_id } => Self::Remote { source_id },
            Provenance::Imported => Self::Local,
        }
    }
}

impl From<SoundSource> for Provenance {
    fn from(s: SoundSource) -> Self {
        match s {
            SoundSource::Remote { source_id } => Self::Remote { source_id },
            SoundSource::Local => Self::Imported,
        }
    }
}

/// The persisted facts about one track: enough to rebuild it once the
/// asset file is found or re-fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireSoundInfo", into = "WireSoundInfo")]
pub struct SoundInfo {
    pub source: SoundSource,
    pub name: String,
    /// Bare file name inside the sounds directory.
    pub file_name: String,
    pub volume: f32,
    pub muted: bool,
}

impl SoundInfo {
    pub fn source_id(&self) -> Option<i64> {
        match self.source {
            SoundSource::Remote { source_id } => Some(source_id),
            SoundSource::Local => None,
        }
    }
}

/// A named, persistable snapshot of a mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Soundscape {
    pub id: Uuid,
    pub name: String,
    pub sound_infos: Vec<SoundInfo>,
}

impl Soundscape {
    /// New soundscape with a fresh id.
    pub fn new(name: impl Into<String>, sound_infos: Vec<SoundInfo>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sound_infos,
        }
    }
}

const TAG_REMOTE: &str = "remote";
const TAG_LOCAL: &str = "local";
/// Tag written by older clients for remote sounds.
const TAG_REMOTE_LEGACY: &str = "freesound";

/// On-the-wire shape of a `SoundInfo` in the `soundsData` blob.
#[derive(Debug, Serialize, Deserialize)]
struct WireSoundInfo {
    #[serde(rename = "sourceType")]
    source_type: String,
    #[serde(rename = "freesoundID", default, skip_serializing_if = "Option::is_none")]
    freesound_id: Option<i64>,
    name: String,
    #[serde(rename = "fileName")]
    file_name: String,
    volume: f32,
    #[serde(rename = "isMuted")]
    is_muted: bool,
}

impl TryFrom<WireSoundInfo> for SoundInfo {
    type Error = CodecError;

    fn try_from(w: WireSoundInfo) -> Result<Self, Self::Error> {
        let source = match (w.source_type.as_str(), w.freesound_id) {
            (TAG_REMOTE | TAG_REMOTE_LEGACY, Some(source_id)) => SoundSource::Remote { source_id },
            (TAG_LOCAL, None) => SoundSource::Local,
            (TAG_REMOTE | TAG_REMOTE_LEGACY, None) => {
                return Err(CodecError::MissingSourceId { name: w.name });
            }
            (TAG_LOCAL, Some(_)) => {
                return Err(CodecError::UnexpectedSourceId { name: w.name });
            }
            (other, _) => return Err(CodecError::UnknownSourceType(other.to_string())),
        };
        if w.file_name.is_empty() || w.file_name.contains(['/', '\\']) {
            return Err(CodecError::BadFileName(w.file_name));
        }
        if !w.volume.is_finite() {
            return Err(CodecError::BadVolume(w.volume));
        }
        Ok(Self {
            source,
            name: w.name,
            file_name: w.file_name,
            volume: w.volume.clamp(0.0, 1.0),
            muted: w.is_muted,
        })
    }
}

impl From<SoundInfo> for WireSoundInfo {
    fn from(s: SoundInfo) -> Self {
        let (source_type, freesound_id) = match s.source {
            SoundSource::Remote { source_id } => (TAG_REMOTE, Some(source_id)),
            SoundSource::Local => (TAG_LOCAL, None),
        };
        Self {
            source_type: source_type.to_string(),
            freesound_id,
            name: s.name,
            file_name: s.file_name,
            volume: s.volume,
            is_muted: s.muted,
        }
    }
}
