//! File naming inside the sounds directory.
//!
//! Remote assets are named `freesound_<id>.mp3` so they can be recognised
//! (and re-fetched or purged) from the name alone. Imported assets keep a
//! sanitised version of their original name, with `_<n>` appended before
//! the extension on collision.

use std::path::Path;

/// Prefix shared by every remote-fetched asset.
pub const REMOTE_PREFIX: &str = "freesound_";

/// Prefix given to imports whose name would otherwise look remote.
const IMPORT_PREFIX: &str = "import_";

const REMOTE_EXTENSION: &str = "mp3";

/// Deterministic cache name for a remote sound.
pub fn remote_file_name(source_id: i64) -> String {
    format!("{REMOTE_PREFIX}{source_id}.{REMOTE_EXTENSION}")
}

/// Whether `file_name` follows the remote naming convention.
pub fn is_remote_file_name(file_name: &str) -> bool {
    file_name.starts_with(REMOTE_PREFIX)
}

/// Source id encoded in a remote file name, if any.
pub fn remote_source_id(file_name: &str) -> Option<i64> {
    let rest = file_name.strip_prefix(REMOTE_PREFIX)?;
    let stem = rest.split('.').next()?;
    stem.parse().ok()
}

/// Split a file name into `(stem, extension)`; extension excludes the dot.
pub fn split_name(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rfind('.') {
        Some(0) | None => (file_name, None),
        Some(i) => (&file_name[..i], Some(&file_name[i + 1..])),
    }
}

/// Sanitise an imported file's name for use inside the sounds directory.
///
/// Path separators, control characters and leading dots are removed, and
/// names that would collide with the remote convention are prefixed.
/// Returns `None` when nothing usable is left.
pub fn sanitize_import_name(source: &Path) -> Option<String> {
    let raw = source.file_name()?.to_string_lossy();
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();

    let (stem, _) = split_name(&cleaned);
    if stem.trim_matches('_').is_empty() {
        return None;
    }

    if is_remote_file_name(&cleaned) {
        Some(format!("{IMPORT_PREFIX}{cleaned}"))
    } else {
        Some(cleaned)
    }
}

/// The `n`-th collision candidate for `file_name` (`n == 0` is the name
/// itself).
pub fn candidate_name(file_name: &str, n: usize) -> String {
    if n == 0 {
        return file_name.to_string();
    }
    match split_name(file_name) {
        (stem, Some(ext)) => format!("{stem}_{n}.{ext}"),
        (stem, None) => format!("{stem}_{n}"),
    }
}

/// Whether a directory entry is one of our in-flight temporary files.
pub fn is_partial_file_name(file_name: &str) -> bool {
    file_name.starts_with('.') && file_name.ends_with(".part")
}
