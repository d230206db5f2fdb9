//! Local soundscape list and its reconciliation with the record store.
//!
//! The local list is authoritative for the UI. Saves land locally first and
//! are written to the record store in the background; a save whose remote
//! write has not succeeded stays queued until `retry_pending` gets it
//! through. `refresh` replaces the local list with whatever the store holds.
//! A delete that lands while a write is still in flight is replayed once the
//! write finishes, so the record does not come back.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::assets::AssetStore;
use crate::audio::PlaybackEngine;
use crate::mix::MixSession;
use crate::soundscape::{Soundscape, decode_sound_infos, encode_sound_infos, snapshot};

use super::error::{StoreError, SyncError, SyncResult};
use super::recovery::FetchLocator;
use super::store::{AccountStatus, RecordStore, RemoteRecord};

/// Result of listing the record store.
#[derive(Debug, Default)]
pub struct ListReport {
    pub soundscapes: Vec<Soundscape>,
    /// Records that were skipped, with the reason.
    pub skipped: Vec<SyncError>,
}

/// Remote write bookkeeping shared with background writes.
#[derive(Default)]
struct Writes {
    /// Saved soundscapes whose remote write has not succeeded yet.
    unsynced: Mutex<BTreeMap<Uuid, Soundscape>>,
    /// Soundscapes deleted in this session.
    deleted: Mutex<HashSet<Uuid>>,
}

pub struct SyncEngine<S, F> {
    pub(super) store: Arc<S>,
    pub(super) assets: Arc<AssetStore<F>>,
    pub(super) playback: Arc<dyn PlaybackEngine>,
    pub(super) locator: FetchLocator,
    library: Arc<Mutex<Vec<Soundscape>>>,
    writes: Arc<Writes>,
}

impl<S: RecordStore, F> SyncEngine<S, F> {
    pub fn new(
        store: Arc<S>,
        assets: Arc<AssetStore<F>>,
        playback: Arc<dyn PlaybackEngine>,
        locator: FetchLocator,
    ) -> Self {
        Self {
            store,
            assets,
            playback,
            locator,
            library: Arc::new(Mutex::new(Vec::new())),
            writes: Arc::new(Writes::default()),
        }
    }

    pub fn assets(&self) -> &Arc<AssetStore<F>> {
        &self.assets
    }

    /// The local soundscape list, in save order.
    pub fn soundscapes(&self) -> Vec<Soundscape> {
        lock(&self.library).clone()
    }

    /// Ids of saved soundscapes whose remote write has not succeeded yet.
    pub fn pending(&self) -> Vec<Uuid> {
        lock(&self.writes.unsynced).keys().copied().collect()
    }

    pub fn is_pending(&self, id: Uuid) -> bool {
        lock(&self.writes.unsynced).contains_key(&id)
    }

    /// Snapshot `session` as a new soundscape named `name` and save it.
    pub fn save_mix(&self, session: &MixSession, name: &str) -> (Soundscape, JoinHandle<SyncResult<()>>) {
        let soundscape = snapshot(session, name);
        let handle = self.save(soundscape.clone());
        (soundscape, handle)
    }

    /// Add `soundscape` to the local list, then write it to the record
    /// store in the background.
    ///
    /// The local list is updated before this returns; the returned handle
    /// resolves once the remote write finishes. A failed write leaves the
    /// soundscape queued for `retry_pending`.
    pub fn save(&self, soundscape: Soundscape) -> JoinHandle<SyncResult<()>> {
        {
            let mut library = lock(&self.library);
            match library.iter_mut().find(|s| s.id == soundscape.id) {
                Some(existing) => *existing = soundscape.clone(),
                None => library.push(soundscape.clone()),
            }
        }
        lock(&self.writes.deleted).remove(&soundscape.id);
        lock(&self.writes.unsynced).insert(soundscape.id, soundscape.clone());
        log::info!("saved soundscape {:?} ({})", soundscape.name, soundscape.id);

        let store = self.store.clone();
        let writes = self.writes.clone();
        tokio::spawn(async move { write_remote(&*store, &writes, &soundscape).await })
    }

    /// Re-attempt every queued remote write, sequentially.
    pub async fn retry_pending(&self) -> Vec<(Uuid, SyncResult<()>)> {
        let queued: Vec<Soundscape> = lock(&self.writes.unsynced).values().cloned().collect();
        let mut results = Vec::with_capacity(queued.len());
        for soundscape in queued {
            let result = write_remote(&*self.store, &self.writes, &soundscape).await;
            results.push((soundscape.id, result));
        }
        results
    }

    /// Fetch and decode every record. Records that fail to decode are
    /// skipped and reported; only a failed query fails the call.
    pub async fn list(&self) -> SyncResult<ListReport> {
        let records = self
            .store
            .query_all()
            .await
            .map_err(SyncError::RemoteReadFailed)?;

        let mut report = ListReport::default();
        for (key, record) in records {
            let decoded = record
                .map_err(|e| SyncError::DecodeFailed {
                    key: key.clone(),
                    reason: e.to_string(),
                })
                .and_then(|r| decode_record(&key, r));
            match decoded {
                Ok(s) => report.soundscapes.push(s),
                Err(e) => {
                    log::warn!("skipping record: {e}");
                    report.skipped.push(e);
                }
            }
        }
        Ok(report)
    }

    /// Replace the local list with the record store's contents.
    ///
    /// Last writer wins: local entries the store does not have disappear
    /// from the list (queued writes are kept and can still be retried).
    pub async fn refresh(&self) -> SyncResult<ListReport> {
        let report = self.list().await?;
        *lock(&self.library) = report.soundscapes.clone();
        log::info!(
            "refreshed soundscapes: {} loaded, {} skipped",
            report.soundscapes.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Remove a soundscape locally and from the record store. A record that
    /// is already gone counts as deleted.
    ///
    /// If a save of the same soundscape is still writing, that write deletes
    /// the record again once it lands.
    pub async fn delete(&self, id: Uuid) -> SyncResult<()> {
        lock(&self.library).retain(|s| s.id != id);
        lock(&self.writes.deleted).insert(id);
        lock(&self.writes.unsynced).remove(&id);

        match self.store.delete(&record_key(id)).await {
            Ok(()) | Err(StoreError::NotFound(_)) => {
                log::info!("deleted soundscape {id}");
                Ok(())
            }
            Err(source) => {
                log::warn!("failed to delete soundscape {id} remotely: {source}");
                Err(SyncError::RemoteWriteFailed { id, source })
            }
        }
    }

    pub async fn account_status(&self) -> AccountStatus {
        self.store.account_status().await
    }
}

/// Key under which a soundscape is stored.
pub fn record_key(id: Uuid) -> String {
    id.hyphenated().to_string()
}

pub fn encode_record(soundscape: &Soundscape) -> SyncResult<RemoteRecord> {
    let sounds_data =
        encode_sound_infos(&soundscape.sound_infos).map_err(|source| SyncError::EncodeFailed {
            id: soundscape.id,
            source,
        })?;
    Ok(RemoteRecord {
        name: soundscape.name.clone(),
        sounds_data,
    })
}

/// Decode a record; the soundscape id is the record key.
pub fn decode_record(key: &str, record: RemoteRecord) -> SyncResult<Soundscape> {
    let decode_failed = |reason: String| SyncError::DecodeFailed {
        key: key.to_string(),
        reason,
    };
    let id = Uuid::parse_str(key).map_err(|e| decode_failed(e.to_string()))?;
    let sound_infos = decode_sound_infos(&record.sounds_data).map_err(|e| decode_failed(e.to_string()))?;
    Ok(Soundscape {
        id,
        name: record.name,
        sound_infos,
    })
}

async fn write_remote<S: RecordStore>(store: &S, writes: &Writes, soundscape: &Soundscape) -> SyncResult<()> {
    let id = soundscape.id;
    let already_deleted = lock(&writes.deleted).contains(&id);
    if already_deleted {
        log::debug!("not syncing deleted soundscape {id}");
        return Ok(());
    }

    let key = record_key(id);
    let record = encode_record(soundscape)?;
    match store.put(&key, record).await {
        Ok(()) => {
            lock(&writes.unsynced).remove(&id);
            let deleted_meanwhile = lock(&writes.deleted).contains(&id);
            if !deleted_meanwhile {
                log::info!("synced soundscape {id}");
                return Ok(());
            }
            // The delete ran before this write landed and found nothing.
            match store.delete(&key).await {
                Ok(()) | Err(StoreError::NotFound(_)) => {
                    log::info!("removed soundscape {id} written after its delete");
                    Ok(())
                }
                Err(source) => {
                    log::warn!("failed to remove soundscape {id} written after its delete: {source}");
                    Err(SyncError::RemoteWriteFailed { id, source })
                }
            }
        }
        Err(source) => {
            log::warn!("failed to sync soundscape {}: {source}", soundscape.id);
            Err(SyncError::RemoteWriteFailed {
                id: soundscape.id,
                source,
            })
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
