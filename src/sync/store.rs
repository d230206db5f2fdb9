//! The remote record store seam and a file-backed implementation.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use uuid::Uuid;

use super::error::{StoreError, StoreResult};

/// Fields of one soundscape record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub name: String,
    /// JSON-encoded list of sound entries.
    #[serde(rename = "soundsData")]
    pub sounds_data: String,
}

/// One result of `query_all`. A record that could not be read on its own
/// is reported rather than failing the whole query.
pub type QueriedRecord = (String, StoreResult<RemoteRecord>);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccountStatus {
    Available,
    NoAccount,
    Restricted,
    Unknown,
}

impl AccountStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Signed in",
            Self::NoAccount => "Not signed in",
            Self::Restricted => "Restricted",
            Self::Unknown => "Unknown",
        }
    }
}

/// Account-scoped key/value store for soundscape records.
pub trait RecordStore: Send + Sync + 'static {
    /// Create or replace the record at `key`.
    fn put(&self, key: &str, record: RemoteRecord) -> impl Future<Output = StoreResult<()>> + Send;

    /// Every record visible to this account.
    fn query_all(&self) -> impl Future<Output = StoreResult<Vec<QueriedRecord>>> + Send;

    /// Remove the record at `key`. Fails with `NotFound` if there is none.
    fn delete(&self, key: &str) -> impl Future<Output = StoreResult<()>> + Send;

    fn account_status(&self) -> impl Future<Output = AccountStatus> + Send;
}

const RECORD_EXTENSION: &str = "toml";

/// Records as `<key>.toml` files in one directory, e.g. a folder kept in
/// sync across devices by a file-sync service.
pub struct FileRecordStore {
    dir: PathBuf,
}

impl FileRecordStore {
    /// Use `dir` as the store, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{RECORD_EXTENSION}")))
    }

    async fn ensure_dir(&self) -> StoreResult<()> {
        match fs::metadata(&self.dir).await {
            Ok(m) if m.is_dir() => Ok(()),
            Ok(_) => Err(StoreError::Unavailable(format!(
                "{} is not a directory",
                self.dir.display()
            ))),
            Err(e) => Err(StoreError::Unavailable(format!("{}: {e}", self.dir.display()))),
        }
    }
}

impl RecordStore for FileRecordStore {
    async fn put(&self, key: &str, record: RemoteRecord) -> StoreResult<()> {
        let path = self.record_path(key)?;
        self.ensure_dir().await?;

        let body = toml::to_string(&record).map_err(|e| StoreError::Malformed {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let partial = self.dir.join(format!(".{key}.{}.part", Uuid::new_v4().simple()));
        if let Err(e) = fs::write(&partial, body).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&partial, &path).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e.into());
        }
        log::debug!("wrote record {}", path.display());
        Ok(())
    }

    async fn query_all(&self) -> StoreResult<Vec<QueriedRecord>> {
        self.ensure_dir().await?;

        let mut entries = fs::read_dir(&self.dir).await?;
        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            if key.starts_with('.') {
                continue;
            }

            let record = match fs::read_to_string(&path).await {
                Ok(text) => toml::from_str::<RemoteRecord>(&text).map_err(|e| StoreError::Malformed {
                    key: key.clone(),
                    reason: e.to_string(),
                }),
                Err(e) => Err(StoreError::Io(e)),
            };
            records.push((key, record));
        }

        records.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(records)
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let path = self.record_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn account_status(&self) -> AccountStatus {
        match fs::metadata(&self.dir).await {
            Ok(m) if m.is_dir() && m.permissions().readonly() => AccountStatus::Restricted,
            Ok(m) if m.is_dir() => AccountStatus::Available,
            Ok(_) => AccountStatus::Restricted,
            Err(e) if e.kind() == ErrorKind::NotFound => AccountStatus::NoAccount,
            Err(_) => AccountStatus::Unknown,
        }
    }
}
