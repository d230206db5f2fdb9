//! Text search against the remote sound provider.

mod client;
mod error;

pub use client::{FreesoundClient, SearchHit, parse_results};
pub use error::{SearchError, SearchResult};
