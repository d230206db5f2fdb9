use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;
use walkdir::WalkDir;

use super::error::{AssetError, AssetResult};
use super::fetch::Fetcher;
use super::naming::{candidate_name, is_partial_file_name, is_remote_file_name, sanitize_import_name};

/// Upper bound on `_<n>` suffixes tried for a single import.
const MAX_COLLISION_SUFFIX: usize = 10_000;

/// Outcome of `purge_fetched_assets`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PurgeReport {
    pub removed: Vec<String>,
    pub kept: Vec<String>,
    /// File name and error text for deletions that failed.
    pub failed: Vec<(String, String)>,
}

/// The local sounds directory.
///
/// Every write lands in a hidden `.part` file first and is moved or linked
/// into place only once complete, so concurrent readers never see a partial
/// file.
pub struct AssetStore<F> {
    dir: PathBuf,
    fetcher: F,
}

impl<F> AssetStore<F> {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Path of `file_name` inside the sounds directory if it exists.
    pub fn locate(&self, file_name: &str) -> Option<PathBuf> {
        let path = self.path_for(file_name).ok()?;
        path.is_file().then_some(path)
    }

    /// Path `file_name` would have inside the sounds directory.
    pub fn path_for(&self, file_name: &str) -> AssetResult<PathBuf> {
        validate_file_name(file_name)?;
        Ok(self.dir.join(file_name))
    }
}

impl<F: Fetcher> AssetStore<F> {
    /// Open (creating if needed) the sounds directory at `dir`.
    pub fn open(dir: impl Into<PathBuf>, fetcher: F) -> AssetResult<Self> {
        let store = Self {
            dir: dir.into(),
            fetcher,
        };
        store.resolve_cache_directory()?;
        log::info!("sounds directory: {}", store.dir.display());
        Ok(store)
    }

    /// Return the sounds directory, recreating it if it went missing.
    pub fn resolve_cache_directory(&self) -> AssetResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|source| AssetError::CacheDirUnavailable {
            path: self.dir.clone(),
            source,
        })?;
        Ok(self.dir.clone())
    }

    /// Copy `source` into the sounds directory under a collision-free name.
    ///
    /// An existing cached file is never overwritten: a taken name gets a
    /// `_<n>` suffix instead.
    pub async fn import_external_file(&self, source: &Path) -> AssetResult<PathBuf> {
        let name = sanitize_import_name(source)
            .ok_or_else(|| AssetError::InvalidName(source.display().to_string()))?;
        let dir = self.resolve_cache_directory()?;

        let partial = partial_path(&dir);
        if let Err(e) = fs::copy(source, &partial).await {
            let _ = fs::remove_file(&partial).await;
            return Err(AssetError::CopyFailed {
                path: source.to_path_buf(),
                source: e,
            });
        }

        let claimed = claim_unique(&partial, &dir, &name).await;
        let _ = fs::remove_file(&partial).await;
        let path = claimed.map_err(|e| AssetError::CopyFailed {
            path: source.to_path_buf(),
            source: e,
        })?;

        log::info!("imported {} as {}", source.display(), path.display());
        Ok(path)
    }

    /// Download `url` and store the body as `file_name`.
    pub async fn fetch_and_cache(&self, url: &str, file_name: &str) -> AssetResult<PathBuf> {
        validate_file_name(file_name)?;
        let body = self.fetcher.fetch(url).await?;
        let dir = self.resolve_cache_directory()?;
        let target = dir.join(file_name);
        let partial = partial_path(&dir);

        let write_failed = |e: std::io::Error| AssetError::FetchFailed {
            url: url.to_string(),
            reason: format!("cannot store {file_name}: {e}"),
        };

        if let Err(e) = fs::write(&partial, &body).await {
            let _ = fs::remove_file(&partial).await;
            return Err(write_failed(e));
        }
        if let Err(e) = fs::rename(&partial, &target).await {
            let _ = fs::remove_file(&partial).await;
            return Err(write_failed(e));
        }

        log::info!("cached {url} as {file_name} ({} bytes)", body.len());
        Ok(target)
    }

    /// Delete remote-fetched assets. With `keep_imported`, everything else
    /// is left alone; without it, every cached asset goes.
    ///
    /// Best effort: a failed deletion is logged and recorded, and the purge
    /// carries on.
    pub fn purge_fetched_assets(&self, keep_imported: bool) -> AssetResult<PurgeReport> {
        let dir = self.resolve_cache_directory()?;
        let mut report = PurgeReport::default();

        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_partial_file_name(&name) {
                continue;
            }
            if keep_imported && !is_remote_file_name(&name) {
                report.kept.push(name);
                continue;
            }
            match std::fs::remove_file(entry.path()) {
                Ok(()) => report.removed.push(name),
                Err(e) => {
                    log::warn!("purge: failed to delete {name}: {e}");
                    report.failed.push((name, e.to_string()));
                }
            }
        }

        log::info!(
            "purged {} cached sounds ({} kept, {} failed)",
            report.removed.len(),
            report.kept.len(),
            report.failed.len()
        );
        Ok(report)
    }
}

fn validate_file_name(file_name: &str) -> AssetResult<()> {
    let ok = !file_name.is_empty()
        && !file_name.starts_with('.')
        && !file_name.contains(['/', '\\'])
        && Path::new(file_name).file_name().is_some_and(|n| n == file_name);
    if ok {
        Ok(())
    } else {
        Err(AssetError::InvalidName(file_name.to_string()))
    }
}

fn partial_path(dir: &Path) -> PathBuf {
    dir.join(format!(".{}.part", Uuid::new_v4().simple()))
}

/// Link the complete file at `partial` under the first free
/// `candidate_name`. `hard_link` fails with `AlreadyExists` instead of
/// replacing, so a taken name is never touched and the new name only ever
/// points at complete contents.
async fn claim_unique(partial: &Path, dir: &Path, name: &str) -> std::io::Result<PathBuf> {
    for n in 0..MAX_COLLISION_SUFFIX {
        let path = dir.join(candidate_name(name, n));
        match fs::hard_link(partial, &path).await {
            Ok(()) => return Ok(path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free name for {name}"),
    ))
}
