//! Recording playback engine for tests.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::engine::{PlaybackEngine, Voice};
use super::error::{TrackError, TrackResult};

#[derive(Debug, Default)]
pub struct VoiceLog {
    pub path: PathBuf,
    pub gains: Vec<f32>,
    pub stops: usize,
}

impl VoiceLog {
    pub fn gain(&self) -> f32 {
        self.gains.last().copied().unwrap_or(0.0)
    }
}

/// Engine that never touches a device. Every opened voice gets a log entry.
#[derive(Default)]
pub struct FakeEngine {
    pub voices: Mutex<Vec<Arc<Mutex<VoiceLog>>>>,
    unplayable: Mutex<HashSet<PathBuf>>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn refuse(&self, path: impl Into<PathBuf>) {
        self.unplayable.lock().unwrap().insert(path.into());
    }

    pub fn voice(&self, index: usize) -> Arc<Mutex<VoiceLog>> {
        self.voices.lock().unwrap()[index].clone()
    }

    pub fn opened(&self) -> usize {
        self.voices.lock().unwrap().len()
    }

    /// Voices opened but not yet stopped.
    pub fn live(&self) -> usize {
        self.voices
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.lock().unwrap().stops == 0)
            .count()
    }

    pub fn total_stops(&self) -> usize {
        self.voices
            .lock()
            .unwrap()
            .iter()
            .map(|v| v.lock().unwrap().stops)
            .sum()
    }
}

struct FakeVoice {
    log: Arc<Mutex<VoiceLog>>,
}

impl Voice for FakeVoice {
    fn set_gain(&mut self, gain: f32) {
        self.log.lock().unwrap().gains.push(gain);
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().stops += 1;
    }
}

impl PlaybackEngine for FakeEngine {
    fn open_looped(&self, path: &Path, gain: f32) -> TrackResult<Box<dyn Voice>> {
        if self.unplayable.lock().unwrap().contains(path) {
            return Err(TrackError::AssetUnplayable {
                path: path.to_path_buf(),
                reason: "refused by test".to_string(),
            });
        }
        let log = Arc::new(Mutex::new(VoiceLog {
            path: path.to_path_buf(),
            gains: vec![gain],
            stops: 0,
        }));
        self.voices.lock().unwrap().push(log.clone());
        Ok(Box::new(FakeVoice { log }))
    }
}
