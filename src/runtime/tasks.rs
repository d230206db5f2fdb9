//! Background work for the front end.
//!
//! Each method spawns onto the tokio runtime and reports back through
//! `AppEvent`s. Every spawned task sends `Started` before it runs and
//! `Finished` after, so the UI can show that something is in flight.

use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use tokio::runtime::Handle;
use uuid::Uuid;

use crate::assets::{AssetStore, HttpFetcher};
use crate::library::{self, CachedSound};
use crate::search::SearchHit;
use crate::soundscape::Soundscape;
use crate::sync::AccountStatus;

use super::startup::Services;

pub enum AppEvent {
    Started,
    Finished,
    Status(String),
    Soundscapes(Vec<Soundscape>),
    Sounds(Vec<CachedSound>),
    SearchResults { query: String, hits: Vec<SearchHit> },
    Account(AccountStatus),
    Unsynced(usize),
}

pub struct Tasks {
    rt: Handle,
    tx: Sender<AppEvent>,
    services: Services,
}

impl Tasks {
    pub fn new(rt: Handle, tx: Sender<AppEvent>, services: Services) -> Self {
        Self { rt, tx, services }
    }

    fn spawn<Fut>(&self, fut: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let _ = self.tx.send(AppEvent::Started);
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            fut.await;
            let _ = tx.send(AppEvent::Finished);
        });
    }

    fn publish_soundscapes(&self) -> impl Fn() + Send + 'static {
        let sync = self.services.sync.clone();
        let tx = self.tx.clone();
        move || {
            let _ = tx.send(AppEvent::Soundscapes(sync.soundscapes()));
            let _ = tx.send(AppEvent::Unsynced(sync.pending().len()));
        }
    }

    /// Replace the soundscape list with the record store's.
    pub fn refresh(&self) {
        let sync = self.services.sync.clone();
        let tx = self.tx.clone();
        let publish = self.publish_soundscapes();
        self.spawn(async move {
            match sync.refresh().await {
                Ok(report) if report.skipped.is_empty() => {
                    let _ = tx.send(AppEvent::Status(format!(
                        "{} soundscapes",
                        report.soundscapes.len()
                    )));
                }
                Ok(report) => {
                    let _ = tx.send(AppEvent::Status(format!(
                        "{} soundscapes ({} unreadable, see log)",
                        report.soundscapes.len(),
                        report.skipped.len()
                    )));
                }
                Err(e) => {
                    log::error!("refresh failed: {e}");
                    let _ = tx.send(AppEvent::Status(format!("Refresh failed: {e}")));
                }
            }
            publish();
        });
    }

    pub fn account_status(&self) {
        let sync = self.services.sync.clone();
        let tx = self.tx.clone();
        self.spawn(async move {
            let _ = tx.send(AppEvent::Account(sync.account_status().await));
        });
    }

    /// Rescan the sounds directory.
    pub fn rescan(&self) {
        let dir = self.services.sync.assets().dir().to_path_buf();
        let tx = self.tx.clone();
        self.spawn(async move {
            send_scan(&tx, dir).await;
        });
    }

    pub fn save(&self, name: String) {
        let sync = self.services.sync.clone();
        let session = self.services.session.clone();
        let tx = self.tx.clone();
        let publish = self.publish_soundscapes();
        self.spawn(async move {
            let (scape, write) = sync.save_mix(&session, &name);
            publish();
            let status = match write.await {
                Ok(Ok(())) => format!("Saved {:?}", scape.name),
                Ok(Err(e)) => format!("Saved {:?} locally; sync failed: {e}", scape.name),
                Err(e) => format!("Saved {:?} locally; sync task failed: {e}", scape.name),
            };
            let _ = tx.send(AppEvent::Status(status));
            publish();
        });
    }

    pub fn load(&self, soundscape: Soundscape) {
        let sync = self.services.sync.clone();
        let session = self.services.session.clone();
        let tx = self.tx.clone();
        let rescan_dir = sync.assets().dir().to_path_buf();
        self.spawn(async move {
            let status = match sync.load(&soundscape, &session).await {
                Ok(report) => report.summary(),
                Err(e) => {
                    log::error!("loading {:?} failed: {e}", soundscape.name);
                    format!("Load failed: {e}")
                }
            };
            let _ = tx.send(AppEvent::Status(status));
            send_scan(&tx, rescan_dir).await;
        });
    }

    pub fn delete(&self, id: Uuid) {
        let sync = self.services.sync.clone();
        let tx = self.tx.clone();
        let publish = self.publish_soundscapes();
        self.spawn(async move {
            let status = match sync.delete(id).await {
                Ok(()) => "Deleted soundscape".to_string(),
                Err(e) => format!("Deleted locally; {e}"),
            };
            let _ = tx.send(AppEvent::Status(status));
            publish();
        });
    }

    pub fn retry(&self) {
        let sync = self.services.sync.clone();
        let tx = self.tx.clone();
        let publish = self.publish_soundscapes();
        self.spawn(async move {
            let results = sync.retry_pending().await;
            let failed = results.iter().filter(|(_, r)| r.is_err()).count();
            let status = match (results.len(), failed) {
                (0, _) => "Nothing to sync".to_string(),
                (n, 0) => format!("Synced {n} soundscapes"),
                (n, f) => format!("Synced {} of {n} soundscapes", n - f),
            };
            let _ = tx.send(AppEvent::Status(status));
            publish();
        });
    }

    pub fn search(&self, query: String) {
        let client = self.services.search.clone();
        let tx = self.tx.clone();
        self.spawn(async move {
            match client.search(&query).await {
                Ok(hits) => {
                    let _ = tx.send(AppEvent::Status(format!("{} results for {query:?}", hits.len())));
                    let _ = tx.send(AppEvent::SearchResults { query, hits });
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::Status(format!("Search failed: {e}")));
                }
            }
        });
    }

    pub fn add_hit(&self, hit: SearchHit, volume: f32) {
        let services = self.services.clone();
        let tx = self.tx.clone();
        self.spawn(async move {
            let assets: &AssetStore<HttpFetcher> = services.sync.assets();
            let status = match library::add_search_hit(assets, &*services.playback, &services.session, &hit, volume).await
            {
                Ok(track) => format!("Added {}", track.name()),
                Err(e) => {
                    log::warn!("adding search result {} failed: {e}", hit.source_id);
                    format!("Could not add {}: {e}", hit.display_name)
                }
            };
            let _ = tx.send(AppEvent::Status(status));
            let dir = assets.dir().to_path_buf();
            send_scan(&tx, dir).await;
        });
    }

    pub fn import(&self, source: PathBuf, volume: f32) {
        let services = self.services.clone();
        let tx = self.tx.clone();
        self.spawn(async move {
            let assets: &AssetStore<HttpFetcher> = services.sync.assets();
            let status = match library::import_into_mix(assets, &*services.playback, &services.session, &source, volume).await
            {
                Ok(track) => format!("Imported {}", track.name()),
                Err(e) => {
                    log::warn!("import of {} failed: {e}", source.display());
                    format!("Import failed: {e}")
                }
            };
            let _ = tx.send(AppEvent::Status(status));
            let dir = assets.dir().to_path_buf();
            send_scan(&tx, dir).await;
        });
    }

    /// Delete downloaded sounds, keeping imports.
    pub fn purge(&self) {
        let assets = self.services.sync.assets().clone();
        let tx = self.tx.clone();
        self.spawn(async move {
            let dir = assets.dir().to_path_buf();
            let purged = tokio::task::spawn_blocking(move || assets.purge_fetched_assets(true)).await;
            let status = match purged {
                Ok(Ok(report)) if report.failed.is_empty() => {
                    format!("Removed {} downloaded sounds", report.removed.len())
                }
                Ok(Ok(report)) => format!(
                    "Removed {} downloaded sounds, {} could not be deleted",
                    report.removed.len(),
                    report.failed.len()
                ),
                Ok(Err(e)) => format!("Clearing downloads failed: {e}"),
                Err(e) => format!("Clearing downloads failed: {e}"),
            };
            let _ = tx.send(AppEvent::Status(status));
            send_scan(&tx, dir).await;
        });
    }
}

async fn send_scan(tx: &Sender<AppEvent>, dir: PathBuf) {
    match tokio::task::spawn_blocking(move || library::scan(&dir)).await {
        Ok(sounds) => {
            let _ = tx.send(AppEvent::Sounds(sounds));
        }
        Err(e) => log::error!("sound scan failed: {e}"),
    }
}
