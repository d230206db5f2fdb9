use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/soundscaper/config.toml` or
/// `~/.config/soundscaper/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SOUNDSCAPER__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub freesound: FreesoundSettings,
    pub mixer: MixerSettings,
    pub network: NetworkSettings,
    pub ui: UiSettings,
}

/// Where sounds and soundscape records live. Unset paths resolve under the
/// data directory (see `default_data_dir`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub sounds_dir: Option<PathBuf>,
    /// Directory backing the record store. Point it at a synced folder to
    /// share soundscapes between devices.
    pub records_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FreesoundSettings {
    /// API token for text search. Search is disabled while empty.
    pub api_key: String,
    pub base_url: String,
    /// Download location used to re-fetch a missing remote sound from its
    /// id alone. `{id}` is the sound id, `{bucket}` is `id / 1000`.
    /// Leave empty to disable re-fetching.
    pub preview_url_template: String,
}

impl Default for FreesoundSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://freesound.org/apiv2".to_string(),
            preview_url_template: "https://freesound.org/data/previews/{bucket}/{id}_{id}-hq.mp3".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MixerSettings {
    /// Volume for newly added sounds, in `[0, 1]`.
    pub default_volume: f32,
    /// Volume change per key press.
    pub volume_step: f32,
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self {
            default_volume: 1.0,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Per-request timeout for searches and downloads.
    pub timeout_secs: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: "soundscaper".to_string(),
        }
    }
}
