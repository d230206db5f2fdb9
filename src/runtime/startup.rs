use std::error::Error;
use std::sync::Arc;

use crate::assets::{AssetStore, HttpFetcher};
use crate::audio::RodioEngine;
use crate::config::Settings;
use crate::mix::MixSession;
use crate::search::FreesoundClient;
use crate::sync::{FetchLocator, FileRecordStore, SyncEngine};

pub type Engine = SyncEngine<FileRecordStore, HttpFetcher>;

/// Everything the front end drives. Cheap to clone.
#[derive(Clone)]
pub struct Services {
    pub session: MixSession,
    pub playback: Arc<RodioEngine>,
    pub sync: Arc<Engine>,
    pub search: Arc<FreesoundClient>,
}

pub fn build(settings: &Settings) -> Result<Services, Box<dyn Error>> {
    let sounds_dir = settings
        .sounds_dir()
        .ok_or("cannot determine a data directory; set storage.sounds_dir")?;
    let records_dir = settings
        .records_dir()
        .ok_or("cannot determine a data directory; set storage.records_dir")?;

    let client = reqwest::Client::builder()
        .timeout(settings.request_timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let playback = Arc::new(RodioEngine::open_default()?);
    let assets = Arc::new(AssetStore::open(sounds_dir, HttpFetcher::with_client(client.clone()))?);
    let store = Arc::new(FileRecordStore::open(&records_dir)?);
    log::info!("soundscape records: {}", records_dir.display());

    let sync = SyncEngine::new(
        store,
        assets,
        playback.clone(),
        FetchLocator::new(settings.freesound.preview_url_template.clone()),
    );
    let search = FreesoundClient::with_client(client, &settings.freesound.base_url, &settings.freesound.api_key);
    if !search.has_api_key() {
        log::warn!("no freesound.api_key configured; search is disabled");
    }

    Ok(Services {
        session: MixSession::new(),
        playback,
        sync: Arc::new(sync),
        search: Arc::new(search),
    })
}
