//! Local sound cache: import, download-and-cache and purge.

mod error;
mod fetch;
mod naming;
mod store;

pub use error::{AssetError, AssetResult};
pub use fetch::{Fetcher, HttpFetcher};
pub use naming::{REMOTE_PREFIX, is_remote_file_name, remote_file_name, remote_source_id};
pub use store::{AssetStore, PurgeReport};

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;
