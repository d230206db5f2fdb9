//! The mix session: the ordered set of tracks that are currently audible.
//!
//! `MixSession` is a cheap, clonable handle. Construct one at startup and
//! pass clones to whoever needs it; there is no global instance and no
//! explicit teardown. All mutations go through one lock, and observers are
//! notified before a mutating call returns.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::audio::{AudioTrack, TrackId};

/// What observers see: the tracks in display order.
pub type MixView = Vec<Arc<AudioTrack>>;

/// A load epoch. Every `clear_all` starts a new one, so work that was
/// started against an older mix can tell it has been superseded.
pub type Epoch = u64;

struct SessionState {
    tracks: Vec<Arc<AudioTrack>>,
    epoch: Epoch,
}

struct Shared {
    state: Mutex<SessionState>,
    observers: watch::Sender<MixView>,
}

#[derive(Clone)]
pub struct MixSession {
    shared: Arc<Shared>,
}

impl Default for MixSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MixSession {
    pub fn new() -> Self {
        let (observers, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SessionState {
                    tracks: Vec::new(),
                    epoch: 0,
                }),
                observers,
            }),
        }
    }

    /// Subscribe to mix changes.
    pub fn subscribe(&self) -> watch::Receiver<MixView> {
        self.shared.observers.subscribe()
    }

    /// Append a playing track. A track that was already stopped is
    /// refused and `None` is returned.
    pub fn add(&self, track: AudioTrack) -> Option<Arc<AudioTrack>> {
        if track.is_stopped() {
            log::warn!("refusing to add stopped track {}", track.id());
            return None;
        }
        let mut state = self.lock();
        Some(self.push(&mut state, track))
    }

    /// Append `track` only if no `clear_all` happened since `epoch` was
    /// read. A superseded track is stopped and handed back.
    pub fn add_in_epoch(&self, track: AudioTrack, epoch: Epoch) -> Result<Arc<AudioTrack>, AudioTrack> {
        let mut state = self.lock();
        if state.epoch != epoch || track.is_stopped() {
            track.stop();
            return Err(track);
        }
        Ok(self.push(&mut state, track))
    }

    /// Stop and remove the track with `id`. Unknown ids are ignored.
    pub fn remove(&self, id: TrackId) -> bool {
        let mut state = self.lock();
        let Some(pos) = state.tracks.iter().position(|t| t.id() == id) else {
            return false;
        };
        let track = state.tracks.remove(pos);
        track.stop();
        self.publish(&state);
        log::info!("removed track {} ({})", id, track.name());
        true
    }

    /// Stop and remove every track. Returns the new epoch.
    pub fn clear_all(&self) -> Epoch {
        let mut state = self.lock();
        for track in state.tracks.drain(..) {
            track.stop();
        }
        state.epoch += 1;
        self.publish(&state);
        log::info!("cleared mix (epoch {})", state.epoch);
        state.epoch
    }

    pub fn epoch(&self) -> Epoch {
        self.lock().epoch
    }

    /// Snapshot of the tracks in order.
    pub fn tracks(&self) -> MixView {
        self.lock().tracks.clone()
    }

    pub fn get(&self, id: TrackId) -> Option<Arc<AudioTrack>> {
        self.lock().tracks.iter().find(|t| t.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().tracks.is_empty()
    }

    pub fn set_volume(&self, id: TrackId, volume: f32) {
        if let Some(t) = self.get(id) {
            t.set_volume(volume);
            self.notify();
        }
    }

    pub fn toggle_mute(&self, id: TrackId) {
        if let Some(t) = self.get(id) {
            t.toggle_mute();
            self.notify();
        }
    }

    fn push(&self, state: &mut SessionState, track: AudioTrack) -> Arc<AudioTrack> {
        let track = Arc::new(track);
        state.tracks.push(track.clone());
        self.publish(state);
        log::info!("added track {} ({})", track.id(), track.name());
        track
    }

    fn notify(&self) {
        let state = self.lock();
        self.publish(&state);
    }

    fn publish(&self, state: &SessionState) {
        self.shared.observers.send_replace(state.tracks.clone());
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
