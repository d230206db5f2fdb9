use std::path::Path;
use std::sync::Arc;

use crate::assets::{AssetStore, Fetcher, remote_file_name};
use crate::audio::{AudioTrack, PlaybackEngine, Provenance};
use crate::mix::{Epoch, MixSession};
use crate::search::SearchHit;

use super::error::{LibraryError, LibraryResult};
use super::model::CachedSound;
use super::scan::read_title;

fn start(
    engine: &dyn PlaybackEngine,
    session: &MixSession,
    epoch: Epoch,
    name: String,
    path: &Path,
    provenance: Provenance,
    volume: f32,
) -> LibraryResult<Arc<AudioTrack>> {
    let track = AudioTrack::create(engine, name, path, provenance, volume)?;
    session.add_in_epoch(track, epoch).map_err(|track| {
        log::info!("dropping {} ({}): mix was replaced", track.id(), track.name());
        LibraryError::Superseded
    })
}

/// Start a sound that is already cached.
pub fn add_cached_to_mix(
    engine: &dyn PlaybackEngine,
    session: &MixSession,
    sound: &CachedSound,
    volume: f32,
) -> LibraryResult<Arc<AudioTrack>> {
    start(
        engine,
        session,
        session.epoch(),
        sound.title.clone(),
        &sound.path,
        sound.provenance,
        volume,
    )
}

/// Copy `source` into the sounds directory and start it.
///
/// A `clear_all` while the copy is running discards the sound; the copied
/// file stays in the sounds directory.
pub async fn import_into_mix<F: Fetcher>(
    assets: &AssetStore<F>,
    engine: &dyn PlaybackEngine,
    session: &MixSession,
    source: &Path,
    volume: f32,
) -> LibraryResult<Arc<AudioTrack>> {
    let epoch = session.epoch();
    let path = assets.import_external_file(source).await?;
    let name = read_title(&path);
    let result = start(engine, session, epoch, name, &path, Provenance::Imported, volume);
    if let Err(LibraryError::Track(_)) = result {
        let _ = tokio::fs::remove_file(&path).await;
    }
    result
}

/// Download a search result's preview and start it, unless the mix was
/// cleared while the download was running.
pub async fn add_search_hit<F: Fetcher>(
    assets: &AssetStore<F>,
    engine: &dyn PlaybackEngine,
    session: &MixSession,
    hit: &SearchHit,
    volume: f32,
) -> LibraryResult<Arc<AudioTrack>> {
    let url = hit.download_url().ok_or(LibraryError::NoPreview(hit.source_id))?;
    let epoch = session.epoch();
    let path = assets
        .fetch_and_cache(url, &remote_file_name(hit.source_id))
        .await?;
    start(
        engine,
        session,
        epoch,
        hit.display_name.clone(),
        &path,
        Provenance::Remote {
            source_id: hit.source_id,
        },
        volume,
    )
}
