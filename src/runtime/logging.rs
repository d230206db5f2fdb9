use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use env_logger::{Env, Target};

const LOG_FILE: &str = "soundscaper.log";

/// Send log output to `<dir>/soundscaper.log`; the terminal belongs to the UI.
///
/// Returns the log path, or `None` if logging stays off because the file
/// could not be opened.
pub fn init(dir: &Path) -> Option<PathBuf> {
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("soundscaper: cannot create {}: {e}; logging disabled", dir.display());
        return None;
    }
    let path = dir.join(LOG_FILE);
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("soundscaper: cannot open {}: {e}; logging disabled", path.display());
            return None;
        }
    };

    // RUST_LOG overrides the default filter.
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .ok()?;
    Some(path)
}
