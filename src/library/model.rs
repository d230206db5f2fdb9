use std::path::PathBuf;
use std::time::Duration;

use crate::audio::Provenance;

/// An audio file in the sounds directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSound {
    pub path: PathBuf,
    pub file_name: String,
    pub title: String,
    pub duration: Option<Duration>,
    /// Inferred from the file name.
    pub provenance: Provenance,
}

impl CachedSound {
    /// List label, e.g. `Rain  [remote 42]  0:12`.
    pub fn display(&self) -> String {
        let origin = match self.provenance {
            Provenance::Remote { source_id } => format!("remote {source_id}"),
            Provenance::Imported => "imported".to_string(),
        };
        match self.duration {
            Some(d) => {
                let secs = d.as_secs();
                format!("{}  [{origin}]  {}:{:02}", self.title, secs / 60, secs % 60)
            }
            None => format!("{}  [{origin}]", self.title),
        }
    }
}
