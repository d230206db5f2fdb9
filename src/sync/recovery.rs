//! Loading a soundscape into the mix, re-fetching what is missing.
//!
//! Loading always replaces the current mix. Entries whose asset is present
//! are rebuilt directly. Missing remote assets are re-downloaded from a
//! location derived from their source id; missing local imports cannot be
//! recovered on this device. Failed entries are left out and reported, and
//! the rest of the load carries on.
//!
//! Downloads run concurrently but tracks are added strictly in entry order,
//! each as soon as it and every entry before it is ready, and only if the
//! mix has not been cleared again in the meantime. Entries already on disk
//! start playing without waiting for later downloads.

use std::fmt;
use std::path::PathBuf;

use futures_util::stream::{FuturesOrdered, StreamExt};
use uuid::Uuid;

use crate::assets::{AssetResult, Fetcher};
use crate::audio::{AudioTrack, TrackId, TrackResult};
use crate::mix::MixSession;
use crate::soundscape::{Materialized, SoundInfo, SoundSource, Soundscape, materialize};

use super::engine::SyncEngine;
use super::error::SkipReason;
use super::store::RecordStore;

/// Derives a download location for a remote sound from its id alone.
///
/// This is a guess at the provider's file layout: `{id}` is replaced by the
/// source id and `{bucket}` by `id / 1000`. It can and does fail for sounds
/// the provider stores elsewhere.
#[derive(Debug, Clone)]
pub struct FetchLocator {
    template: String,
}

impl FetchLocator {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// `None` when no template is configured.
    pub fn location(&self, source_id: i64) -> Option<String> {
        if self.template.trim().is_empty() {
            return None;
        }
        Some(
            self.template
                .replace("{bucket}", &(source_id / 1000).to_string())
                .replace("{id}", &source_id.to_string()),
        )
    }
}

/// One soundscape entry that did not make it into the mix.
#[derive(Debug, Clone, PartialEq)]
pub struct Omission {
    /// Position in the soundscape's entry list.
    pub index: usize,
    pub name: String,
    pub file_name: String,
    pub reason: SkipReason,
}

/// Outcome of loading a soundscape.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub soundscape: Uuid,
    pub requested: usize,
    /// Tracks added, in entry order.
    pub loaded: Vec<TrackId>,
    pub omitted: Vec<Omission>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.omitted.is_empty()
    }

    /// One-line summary for the user.
    pub fn summary(&self) -> String {
        if self.is_complete() {
            format!("Loaded {} sounds", self.loaded.len())
        } else {
            format!(
                "Loaded {} of {} sounds ({} skipped)",
                self.loaded.len(),
                self.requested,
                self.omitted.len()
            )
        }
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())?;
        for o in &self.omitted {
            write!(f, "\n  {} ({}): {}", o.name, o.file_name, o.reason)?;
        }
        Ok(())
    }
}

impl<S: RecordStore, F: Fetcher> SyncEngine<S, F> {
    /// Replace the mix in `session` with `soundscape`.
    ///
    /// Only a sounds directory that cannot be created at all is an error;
    /// everything else is reported per entry in the `LoadReport`.
    pub async fn load(&self, soundscape: &Soundscape, session: &MixSession) -> AssetResult<LoadReport> {
        self.assets.resolve_cache_directory()?;

        let epoch = session.clear_all();
        log::info!(
            "loading soundscape {:?} ({} sounds)",
            soundscape.name,
            soundscape.sound_infos.len()
        );

        let mut recovered = materialize(soundscape, &*self.assets)
            .into_iter()
            .map(|m| self.recover(m))
            .collect::<FuturesOrdered<_>>()
            .enumerate();

        let mut report = LoadReport {
            soundscape: soundscape.id,
            requested: soundscape.sound_infos.len(),
            loaded: Vec::new(),
            omitted: Vec::new(),
        };

        while let Some((index, (info, outcome))) = recovered.next().await {
            let result = outcome.and_then(|path| {
                self.restore_track(&info, path)
                    .map_err(|e| SkipReason::AssetUnplayable(e.to_string()))
            });
            let result = result.and_then(|track| {
                session
                    .add_in_epoch(track, epoch)
                    .map_err(|_| SkipReason::Superseded)
            });

            match result {
                Ok(track) => report.loaded.push(track.id()),
                Err(reason) => {
                    log::warn!("skipping {:?} ({}): {reason}", info.name, info.file_name);
                    report.omitted.push(Omission {
                        index,
                        name: info.name,
                        file_name: info.file_name,
                        reason,
                    });
                }
            }
        }

        log::info!("{}", report.summary());
        Ok(report)
    }

    /// Find or re-fetch the asset for one entry.
    async fn recover(&self, m: Materialized) -> (SoundInfo, Result<PathBuf, SkipReason>) {
        if let Some(path) = m.local {
            return (m.info, Ok(path));
        }

        let outcome = match m.info.source {
            SoundSource::Remote { source_id } => match self.locator.location(source_id) {
                Some(url) => self
                    .assets
                    .fetch_and_cache(&url, &m.info.file_name)
                    .await
                    .map_err(|e| SkipReason::FetchFailed(e.to_string())),
                None => Err(SkipReason::FetchFailed(format!(
                    "no download location for sound {source_id}"
                ))),
            },
            SoundSource::Local => Err(SkipReason::AssetMissingUnrecoverable),
        };
        (m.info, outcome)
    }

    fn restore_track(&self, info: &SoundInfo, path: PathBuf) -> TrackResult<AudioTrack> {
        AudioTrack::restore(
            &*self.playback,
            info.name.clone(),
            path,
            info.source.into(),
            info.volume,
            info.muted,
        )
    }
}
