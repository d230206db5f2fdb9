//! A single looping track in the mix.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::engine::{PlaybackEngine, Voice};
use super::error::TrackResult;

static NEXT_TRACK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-local track identifier. Never persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(u64);

impl TrackId {
    fn next() -> Self {
        Self(NEXT_TRACK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a track's asset came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Downloaded from the remote sound provider.
    Remote { source_id: i64 },
    /// Imported from a file on this device.
    Imported,
}

struct TrackState {
    volume: f32,
    muted: bool,
    /// `None` once the track has been stopped.
    voice: Option<Box<dyn Voice>>,
}

impl TrackState {
    fn effective_gain(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }
}

/// One infinitely looping playback instance with its own volume and mute.
///
/// A track starts playing as soon as it is created and stays playing until
/// `stop` is called. Volume and mute changes after `stop` are ignored.
pub struct AudioTrack {
    id: TrackId,
    name: String,
    provenance: Provenance,
    path: PathBuf,
    state: Mutex<TrackState>,
}

impl AudioTrack {
    /// Open `path` on `engine` and start looping at `initial_volume`
    /// (clamped to `[0, 1]`).
    pub fn create(
        engine: &dyn PlaybackEngine,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        provenance: Provenance,
        initial_volume: f32,
    ) -> TrackResult<Self> {
        Self::restore(engine, name, path, provenance, initial_volume, false)
    }

    /// Like `create`, but with a saved mute state. A muted track opens
    /// silent and keeps `volume` for when it is unmuted.
    pub fn restore(
        engine: &dyn PlaybackEngine,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        provenance: Provenance,
        volume: f32,
        muted: bool,
    ) -> TrackResult<Self> {
        let path = path.into();
        let state = TrackState {
            volume: clamp_volume(volume).unwrap_or(1.0),
            muted,
            voice: None,
        };
        let voice = engine.open_looped(&path, state.effective_gain())?;

        Ok(Self {
            id: TrackId::next(),
            name: name.into(),
            provenance,
            path,
            state: Mutex::new(TrackState {
                voice: Some(voice),
                ..state
            }),
        })
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The asset's file name inside the sounds directory.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Stored volume. Preserved while muted.
    pub fn volume(&self) -> f32 {
        self.lock().volume
    }

    pub fn is_muted(&self) -> bool {
        self.lock().muted
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().voice.is_none()
    }

    /// Gain currently applied to the live output (0.0 when muted or stopped).
    pub fn live_gain(&self) -> f32 {
        let state = self.lock();
        if state.voice.is_none() {
            0.0
        } else {
            state.effective_gain()
        }
    }

    /// Set the stored volume, clamped to `[0, 1]`. NaN is ignored.
    ///
    /// The live gain follows immediately unless the track is muted.
    pub fn set_volume(&self, volume: f32) {
        let Some(volume) = clamp_volume(volume) else {
            return;
        };
        let mut state = self.lock();
        if state.voice.is_none() {
            return;
        }
        state.volume = volume;
        let gain = state.effective_gain();
        if let Some(voice) = state.voice.as_mut() {
            voice.set_gain(gain);
        }
    }

    /// Flip mute. Muting forces the live gain to 0.0 and keeps the stored
    /// volume; unmuting restores it.
    pub fn toggle_mute(&self) {
        let mut state = self.lock();
        if state.voice.is_none() {
            return;
        }
        state.muted = !state.muted;
        let gain = state.effective_gain();
        if let Some(voice) = state.voice.as_mut() {
            voice.set_gain(gain);
        }
    }

    /// Halt playback and release the voice.
    ///
    /// Returns `true` if this call stopped the track, `false` if it was
    /// already stopped.
    pub fn stop(&self) -> bool {
        let voice = self.lock().voice.take();
        match voice {
            Some(mut voice) => {
                voice.stop();
                log::debug!("stopped track {} ({})", self.id, self.name);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for AudioTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("AudioTrack")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("provenance", &self.provenance)
            .field("path", &self.path)
            .field("volume", &state.volume)
            .field("muted", &state.muted)
            .field("stopped", &state.voice.is_none())
            .finish()
    }
}

impl Drop for AudioTrack {
    fn drop(&mut self) {
        if self.stop() {
            log::warn!("track {} dropped while still playing", self.id);
        }
    }
}

/// Clamp into `[0, 1]`, rejecting NaN.
pub fn clamp_volume(volume: f32) -> Option<f32> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}
