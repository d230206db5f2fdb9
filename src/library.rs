//! Sounds already in the sounds directory, and the ways a sound joins the mix.

mod add;
mod error;
mod model;
mod scan;

pub use add::{add_cached_to_mix, add_search_hit, import_into_mix};
pub use error::{LibraryError, LibraryResult};
pub use model::CachedSound;
pub use scan::{read_title, scan};

#[cfg(test)]
mod tests;
