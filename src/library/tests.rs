use std::fs;
use std::time::Duration;

use tempfile::tempdir;

use super::*;
use crate::assets::AssetStore;
use crate::assets::testing::ScriptedFetcher;
use crate::audio::Provenance;
use crate::audio::testing::FakeEngine;
use crate::mix::MixSession;
use crate::search::SearchHit;

#[test]
fn scan_lists_top_level_audio_sorted_by_title() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("freesound_42.mp3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("birds.WAV"), b"not a real wav").unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();
    fs::write(dir.path().join(".0f3a.part"), b"partial").unwrap();
    let sub = dir.path().join("nested");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("deep.mp3"), b"not real").unwrap();

    let sounds = scan(dir.path());

    assert_eq!(sounds.len(), 2);
    assert_eq!(sounds[0].title, "birds");
    assert_eq!(sounds[0].provenance, Provenance::Imported);
    assert_eq!(sounds[0].duration, None);
    assert_eq!(sounds[1].title, "Sound 42");
    assert_eq!(sounds[1].file_name, "freesound_42.mp3");
    assert_eq!(sounds[1].provenance, Provenance::Remote { source_id: 42 });
}

#[test]
fn scan_of_missing_directory_is_empty() {
    let dir = tempdir().unwrap();
    assert!(scan(&dir.path().join("nope")).is_empty());
}

#[test]
fn read_title_falls_back_to_file_stem() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tavern_1.wav");
    fs::write(&path, b"untagged").unwrap();
    assert_eq!(read_title(&path), "tavern_1");
}

#[test]
fn display_shows_origin_and_duration() {
    let sound = CachedSound {
        path: "/s/freesound_42.mp3".into(),
        file_name: "freesound_42.mp3".into(),
        title: "Rain".into(),
        duration: Some(Duration::from_secs(75)),
        provenance: Provenance::Remote { source_id: 42 },
    };
    assert_eq!(sound.display(), "Rain  [remote 42]  1:15");

    let imported = CachedSound {
        duration: None,
        provenance: Provenance::Imported,
        ..sound
    };
    assert_eq!(imported.display(), "Rain  [imported]");
}

#[test]
fn cached_sound_joins_the_mix_with_its_provenance() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("freesound_9.mp3"), b"x").unwrap();
    let sound = scan(dir.path()).remove(0);
    let engine = FakeEngine::new();
    let session = MixSession::new();

    let track = add_cached_to_mix(&*engine, &session, &sound, 0.6).unwrap();

    assert_eq!(track.provenance(), Provenance::Remote { source_id: 9 });
    assert_eq!(track.volume(), 0.6);
    assert_eq!(session.len(), 1);
    session.clear_all();
}

#[tokio::test]
async fn import_copies_then_plays() {
    let root = tempdir().unwrap();
    let source = root.path().join("Market Day.wav");
    fs::write(&source, b"crowd").unwrap();
    let assets = AssetStore::open(root.path().join("sounds"), ScriptedFetcher::new()).unwrap();
    let engine = FakeEngine::new();
    let session = MixSession::new();

    let track = import_into_mix(&assets, &*engine, &session, &source, 0.8).await.unwrap();

    assert_eq!(track.provenance(), Provenance::Imported);
    assert!(track.path().starts_with(assets.dir()));
    assert_eq!(fs::read(track.path()).unwrap(), b"crowd");
    assert_eq!(session.tracks()[0].id(), track.id());
    session.clear_all();
}

#[tokio::test]
async fn unplayable_import_is_removed_again() {
    let root = tempdir().unwrap();
    let source = root.path().join("broken.wav");
    fs::write(&source, b"garbage").unwrap();
    let assets = AssetStore::open(root.path().join("sounds"), ScriptedFetcher::new()).unwrap();
    let engine = FakeEngine::new();
    engine.refuse(assets.dir().join("broken.wav"));
    let session = MixSession::new();

    let result = import_into_mix(&assets, &*engine, &session, &source, 1.0).await;

    assert!(matches!(result, Err(LibraryError::Track(_))));
    assert!(session.is_empty());
    assert!(!assets.dir().join("broken.wav").exists());
}

#[tokio::test]
async fn search_hit_downloads_preview_under_remote_name() {
    let root = tempdir().unwrap();
    let fetcher = ScriptedFetcher::new().ok("https://cdn.test/lq.mp3", b"lq");
    let assets = AssetStore::open(root.path(), fetcher).unwrap();
    let engine = FakeEngine::new();
    let session = MixSession::new();
    let hit = SearchHit {
        source_id: 77,
        display_name: "Creek".into(),
        preview: None,
        fallback_preview: Some("https://cdn.test/lq.mp3".into()),
    };

    let track = add_search_hit(&assets, &*engine, &session, &hit, 0.5).await.unwrap();

    assert_eq!(track.name(), "Creek");
    assert_eq!(track.file_name(), "freesound_77.mp3");
    assert_eq!(track.provenance(), Provenance::Remote { source_id: 77 });
    assert_eq!(fs::read(root.path().join("freesound_77.mp3")).unwrap(), b"lq");
    session.clear_all();
}

#[tokio::test]
async fn search_hit_without_preview_is_rejected() {
    let root = tempdir().unwrap();
    let assets = AssetStore::open(root.path(), ScriptedFetcher::new()).unwrap();
    let engine = FakeEngine::new();
    let session = MixSession::new();
    let hit = SearchHit {
        source_id: 5,
        display_name: "Silent".into(),
        preview: None,
        fallback_preview: None,
    };

    let result = add_search_hit(&assets, &*engine, &session, &hit, 0.5).await;
    assert!(matches!(result, Err(LibraryError::NoPreview(5))));
    assert!(assets.fetcher().calls().is_empty());
}

#[tokio::test]
async fn clearing_during_search_download_discards_the_sound() {
    let root = tempdir().unwrap();
    let fetcher = ScriptedFetcher::new().ok_after("https://cdn.test/hq.mp3", b"late", Duration::from_millis(50));
    let assets = AssetStore::open(root.path(), fetcher).unwrap();
    let engine = FakeEngine::new();
    let session = MixSession::new();
    let hit = SearchHit {
        source_id: 31,
        display_name: "Thunder".into(),
        preview: Some("https://cdn.test/hq.mp3".into()),
        fallback_preview: None,
    };

    let (result, ()) = tokio::join!(add_search_hit(&assets, &*engine, &session, &hit, 0.5), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        session.clear_all();
    });

    assert!(matches!(result, Err(LibraryError::Superseded)));
    assert!(session.is_empty());
    assert_eq!(engine.live(), 0);
    assert!(root.path().join("freesound_31.mp3").exists());
}
