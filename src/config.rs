//! Configuration loader and schema types.
//!
//! Settings come from an optional TOML file overlaid by `SOUNDSCAPER__`
//! environment variables, with struct defaults underneath.

mod load;
mod schema;

pub use load::{default_config_path, default_data_dir, resolve_config_path};
pub use schema::*;
