use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::join_all;
use tempfile::tempdir;

use super::testing::ScriptedFetcher;
use super::*;

fn listing(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn open_creates_the_sounds_directory() {
    let root = tempdir().unwrap();
    let dir = root.path().join("nested").join("sounds");
    let store = AssetStore::open(&dir, ScriptedFetcher::new()).unwrap();
    assert!(dir.is_dir());
    assert_eq!(store.dir(), dir.as_path());

    fs::remove_dir_all(&dir).unwrap();
    assert_eq!(store.resolve_cache_directory().unwrap(), dir);
    assert!(dir.is_dir());
}

#[test]
fn open_fails_when_directory_cannot_be_created() {
    let root = tempdir().unwrap();
    let blocker = root.path().join("file");
    fs::write(&blocker, b"x").unwrap();
    let err = AssetStore::open(blocker.join("sounds"), ScriptedFetcher::new())
        .err()
        .unwrap();
    assert!(matches!(err, AssetError::CacheDirUnavailable { .. }));
}

#[tokio::test]
async fn import_copies_and_suffixes_on_collision() {
    let root = tempdir().unwrap();
    let src_dir = root.path().join("src");
    fs::create_dir_all(&src_dir).unwrap();
    let src = src_dir.join("tavern.wav");
    fs::write(&src, b"first").unwrap();

    let store = AssetStore::open(root.path().join("sounds"), ScriptedFetcher::new()).unwrap();

    let first = store.import_external_file(&src).await.unwrap();
    assert_eq!(first.file_name().unwrap(), "tavern.wav");

    fs::write(&src, b"second").unwrap();
    let second = store.import_external_file(&src).await.unwrap();
    assert_eq!(second.file_name().unwrap(), "tavern_1.wav");

    let third = store.import_external_file(&src).await.unwrap();
    assert_eq!(third.file_name().unwrap(), "tavern_2.wav");

    // Originals untouched.
    assert_eq!(fs::read(&first).unwrap(), b"first");
    assert_eq!(fs::read(&second).unwrap(), b"second");

    assert_eq!(
        listing(store.dir()),
        BTreeSet::from([
            "tavern.wav".to_string(),
            "tavern_1.wav".to_string(),
            "tavern_2.wav".to_string(),
        ])
    );
}

#[tokio::test]
async fn concurrent_imports_never_expose_an_empty_file() {
    let root = tempdir().unwrap();
    let src = root.path().join("rain.wav");
    let body = vec![7u8; 64 * 1024];
    fs::write(&src, &body).unwrap();
    let store = AssetStore::open(root.path().join("sounds"), ScriptedFetcher::new()).unwrap();
    let done = AtomicBool::new(false);

    let imports = async {
        let results = join_all((0..8).map(|_| store.import_external_file(&src))).await;
        done.store(true, Ordering::SeqCst);
        results
    };
    let watcher = async {
        let mut short = Vec::new();
        while !done.load(Ordering::SeqCst) {
            for entry in fs::read_dir(store.dir()).unwrap().flatten() {
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') {
                    continue;
                }
                if entry.metadata().map(|m| m.len()).unwrap_or(0) != body.len() as u64 {
                    short.push(name);
                }
            }
            tokio::task::yield_now().await;
        }
        short
    };
    let (results, short) = tokio::join!(imports, watcher);

    assert!(short.is_empty(), "saw incomplete files: {short:?}");
    let paths: BTreeSet<_> = results.into_iter().map(Result::unwrap).collect();
    assert_eq!(paths.len(), 8);
    for path in &paths {
        assert_eq!(fs::read(path).unwrap(), body);
    }
    assert_eq!(listing(store.dir()).len(), 8);
}

#[tokio::test]
async fn import_of_unreadable_source_fails_without_leftovers() {
    let root = tempdir().unwrap();
    let store = AssetStore::open(root.path().join("sounds"), ScriptedFetcher::new()).unwrap();

    let err = store
        .import_external_file(&root.path().join("missing.ogg"))
        .await
        .unwrap_err();
    assert!(matches!(err, AssetError::CopyFailed { .. }));
    assert!(listing(store.dir()).is_empty());
}

#[tokio::test]
async fn fetch_and_cache_writes_full_body() {
    let root = tempdir().unwrap();
    let fetcher = ScriptedFetcher::new().ok("https://example.test/a.mp3", b"mp3-bytes");
    let store = AssetStore::open(root.path().join("sounds"), fetcher).unwrap();

    let path = store
        .fetch_and_cache("https://example.test/a.mp3", "freesound_7.mp3")
        .await
        .unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"mp3-bytes");
    assert_eq!(store.locate("freesound_7.mp3"), Some(path));
    assert_eq!(listing(store.dir()), BTreeSet::from(["freesound_7.mp3".to_string()]));
}

#[tokio::test]
async fn fetch_failure_leaves_no_file() {
    let root = tempdir().unwrap();
    let fetcher = ScriptedFetcher::new().fail("https://example.test/a.mp3", "HTTP 500");
    let store = AssetStore::open(root.path().join("sounds"), fetcher).unwrap();

    let err = store
        .fetch_and_cache("https://example.test/a.mp3", "freesound_7.mp3")
        .await
        .unwrap_err();
    assert!(matches!(err, AssetError::FetchFailed { .. }));
    assert!(store.locate("freesound_7.mp3").is_none());
    assert!(listing(store.dir()).is_empty());
}

#[tokio::test]
async fn fetch_rejects_names_that_escape_the_directory() {
    let root = tempdir().unwrap();
    let fetcher = ScriptedFetcher::new().ok("u", b"x");
    let store = AssetStore::open(root.path().join("sounds"), fetcher).unwrap();

    for bad in ["../evil.mp3", "a/b.mp3", "", ".hidden"] {
        let err = store.fetch_and_cache("u", bad).await.unwrap_err();
        assert!(matches!(err, AssetError::InvalidName(_)), "{bad}");
    }
    assert!(store.fetcher().calls().is_empty());
}

#[test]
fn purge_keeps_imports_when_asked() {
    let root = tempdir().unwrap();
    let store = AssetStore::open(root.path().join("sounds"), ScriptedFetcher::new()).unwrap();
    for name in ["freesound_1.mp3", "freesound_22.mp3", "tavern.wav", "rain_1.ogg"] {
        fs::write(store.dir().join(name), b"x").unwrap();
    }

    let before = listing(store.dir());
    assert_eq!(before.len(), 4);

    let report = store.purge_fetched_assets(true).unwrap();
    let mut removed = report.removed.clone();
    removed.sort();
    assert_eq!(removed, vec!["freesound_1.mp3", "freesound_22.mp3"]);
    assert!(report.failed.is_empty());

    assert_eq!(
        listing(store.dir()),
        BTreeSet::from(["tavern.wav".to_string(), "rain_1.ogg".to_string()])
    );
}

#[test]
fn purge_without_keep_removes_everything() {
    let root = tempdir().unwrap();
    let store = AssetStore::open(root.path().join("sounds"), ScriptedFetcher::new()).unwrap();
    for name in ["freesound_1.mp3", "tavern.wav"] {
        fs::write(store.dir().join(name), b"x").unwrap();
    }

    let report = store.purge_fetched_assets(false).unwrap();
    assert_eq!(report.removed.len(), 2);
    assert!(listing(store.dir()).is_empty());
}

#[test]
fn purge_skips_in_flight_partials() {
    let root = tempdir().unwrap();
    let store = AssetStore::open(root.path().join("sounds"), ScriptedFetcher::new()).unwrap();
    fs::write(store.dir().join(".abc.part"), b"x").unwrap();

    let report = store.purge_fetched_assets(false).unwrap();
    assert!(report.removed.is_empty());
    assert!(store.dir().join(".abc.part").exists());
}
