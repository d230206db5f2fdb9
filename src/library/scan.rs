use std::path::Path;
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use walkdir::WalkDir;

use crate::assets::remote_source_id;
use crate::audio::Provenance;

use super::model::CachedSound;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg", "m4a", "aac", "aiff", "aif"];

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Title tag and duration, if the file has readable metadata.
fn read_metadata(path: &Path) -> (Option<String>, Option<Duration>) {
    let Ok(tagged) = lofty::read_from_path(path) else {
        return (None, None);
    };
    let duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());
    let title = tagged
        .primary_tag()
        .or_else(|| tagged.first_tag())
        .and_then(|tag| tag.title().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty());
    (title, duration)
}

/// Display name for `path`: the title tag, else the file stem.
pub fn read_title(path: &Path) -> String {
    read_metadata(path).0.unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled")
            .to_string()
    })
}

/// List the audio files directly inside `dir`, sorted by title.
///
/// Hidden files, which include in-progress downloads, are skipped.
pub fn scan(dir: &Path) -> Vec<CachedSound> {
    let mut sounds: Vec<CachedSound> = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !entry.file_type().is_file() || is_hidden(path) || !is_audio_file(path) {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let provenance = match remote_source_id(&file_name) {
            Some(source_id) => Provenance::Remote { source_id },
            None => Provenance::Imported,
        };

        let (tag_title, duration) = read_metadata(path);
        let title = tag_title.unwrap_or_else(|| match provenance {
            Provenance::Remote { source_id } => format!("Sound {source_id}"),
            Provenance::Imported => path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string(),
        });

        sounds.push(CachedSound {
            path: path.to_path_buf(),
            file_name,
            title,
            duration,
            provenance,
        });
    }

    sounds.sort_by(|a, b| {
        a.title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
    log::debug!("scanned {} cached sounds in {}", sounds.len(), dir.display());
    sounds
}
