//! Playback backends.
//!
//! A `PlaybackEngine` opens an asset and hands back a `Voice`: one live,
//! infinitely looping playback instance whose gain can be changed until it
//! is stopped. The rodio backend keeps its output stream on a dedicated
//! thread and connects one `Sink` per voice to the stream's mixer.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStreamBuilder, Sink};

use super::error::{TrackError, TrackResult};

/// A live playback instance owned by exactly one track.
pub trait Voice: Send {
    /// Apply `gain` to the live output.
    fn set_gain(&mut self, gain: f32);
    /// Halt playback and release the underlying resource.
    fn stop(&mut self);
}

/// Something that can start looped playback of a file.
pub trait PlaybackEngine: Send + Sync {
    /// Open `path` and start infinite looped playback at `gain`.
    fn open_looped(&self, path: &Path, gain: f32) -> TrackResult<Box<dyn Voice>>;
}

struct SinkVoice {
    sink: Sink,
}

impl Voice for SinkVoice {
    fn set_gain(&mut self, gain: f32) {
        self.sink.set_volume(gain);
    }

    fn stop(&mut self) {
        self.sink.stop();
    }
}

/// rodio-backed engine.
///
/// `OutputStream` must stay on the thread that opened it, so that thread
/// only opens the stream, publishes its mixer and then parks until shutdown.
pub struct RodioEngine {
    mixer: Mixer,
    shutdown: Mutex<Option<Sender<()>>>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioEngine {
    /// Open the default output device.
    pub fn open_default() -> TrackResult<Self> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<Mixer, String>>();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let join = thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || match OutputStreamBuilder::open_default_stream() {
                Ok(mut stream) => {
                    // rodio logs to stderr when the stream drops, which would
                    // scribble over the terminal UI.
                    stream.log_on_drop(false);
                    let _ = ready_tx.send(Ok(stream.mixer().clone()));
                    // Blocks until shutdown is requested or the engine is dropped.
                    let _ = shutdown_rx.recv();
                    drop(stream);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                }
            })
            .map_err(|e| TrackError::OutputUnavailable(e.to_string()))?;

        let mixer = match ready_rx.recv() {
            Ok(Ok(mixer)) => mixer,
            Ok(Err(reason)) => {
                let _ = join.join();
                return Err(TrackError::OutputUnavailable(reason));
            }
            Err(_) => {
                let _ = join.join();
                return Err(TrackError::OutputUnavailable(
                    "audio thread exited before opening a stream".to_string(),
                ));
            }
        };

        log::info!("audio output stream opened");

        Ok(Self {
            mixer,
            shutdown: Mutex::new(Some(shutdown_tx)),
            join: Mutex::new(Some(join)),
        })
    }

    /// Close the output stream and wait for the audio thread to exit.
    pub fn shutdown(&self) {
        if let Ok(mut tx) = self.shutdown.lock() {
            if let Some(tx) = tx.take() {
                let _ = tx.send(());
            }
        }
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl PlaybackEngine for RodioEngine {
    fn open_looped(&self, path: &Path, gain: f32) -> TrackResult<Box<dyn Voice>> {
        let unplayable = |reason: String| TrackError::AssetUnplayable {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| unplayable(e.to_string()))?;
        let source = Decoder::new_looped(BufReader::new(file)).map_err(|e| unplayable(e.to_string()))?;

        let sink = Sink::connect_new(&self.mixer);
        sink.set_volume(gain);
        sink.append(source);
        sink.play();

        Ok(Box::new(SinkVoice { sink }))
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
