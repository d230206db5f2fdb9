mod engine;
mod error;
mod recovery;
mod store;

pub use engine::{ListReport, SyncEngine, decode_record, encode_record, record_key};
pub use error::{SkipReason, StoreError, StoreResult, SyncError, SyncResult};
pub use recovery::{FetchLocator, LoadReport, Omission};
pub use store::{AccountStatus, FileRecordStore, QueriedRecord, RecordStore, RemoteRecord};

#[cfg(test)]
pub(crate) mod testing;
