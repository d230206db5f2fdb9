//! In-memory record store for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::Notify;

use super::error::{StoreError, StoreResult};
use super::store::{AccountStatus, QueriedRecord, RecordStore, RemoteRecord};

pub struct MemoryRecordStore {
    pub records: Mutex<BTreeMap<String, StoreResult<RemoteRecord>>>,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
    /// When set, `put` waits for a permit before writing.
    pub put_gate: Option<Notify>,
    /// Number of `put` calls that have started.
    pub puts_started: AtomicUsize,
    pub status: Mutex<AccountStatus>,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            put_gate: None,
            puts_started: AtomicUsize::new(0),
            status: Mutex::new(AccountStatus::Available),
        }
    }
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            put_gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    /// Let one gated `put` through.
    pub fn release_put(&self) {
        if let Some(gate) = &self.put_gate {
            gate.notify_one();
        }
    }

    pub fn puts_started(&self) -> usize {
        self.puts_started.load(Ordering::SeqCst)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn insert(&self, key: &str, record: RemoteRecord) {
        self.records.lock().unwrap().insert(key.to_string(), Ok(record));
    }

    /// Store a record the transport itself could not read.
    pub fn insert_unreadable(&self, key: &str) {
        self.records.lock().unwrap().insert(
            key.to_string(),
            Err(StoreError::Malformed {
                key: key.to_string(),
                reason: "truncated".to_string(),
            }),
        );
    }

    pub fn keys(&self) -> Vec<String> {
        self.records.lock().unwrap().keys().cloned().collect()
    }

    pub fn get(&self, key: &str) -> Option<RemoteRecord> {
        match self.records.lock().unwrap().get(key) {
            Some(Ok(r)) => Some(r.clone()),
            _ => None,
        }
    }
}

impl RecordStore for MemoryRecordStore {
    async fn put(&self, key: &str, record: RemoteRecord) -> StoreResult<()> {
        self.puts_started.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.put_gate {
            gate.notified().await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("offline".to_string()));
        }
        self.insert(key, record);
        Ok(())
    }

    async fn query_all(&self) -> StoreResult<Vec<QueriedRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("offline".to_string()));
        }
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .map(|(key, r)| {
                let r = match r {
                    Ok(record) => Ok(record.clone()),
                    Err(e) => Err(StoreError::Malformed {
                        key: key.clone(),
                        reason: e.to_string(),
                    }),
                };
                (key.clone(), r)
            })
            .collect())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("offline".to_string()));
        }
        match self.records.lock().unwrap().remove(key) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    async fn account_status(&self) -> AccountStatus {
        *self.status.lock().unwrap()
    }
}
