//! Application model types: `App`, `Pane` and `Prompt`.
//!
//! The `App` struct holds what the front end shows: a copy of the mix, the
//! saved soundscapes, the cached sounds and the last search results, plus
//! which pane and row are selected. It never touches audio or storage.

use crate::audio::{Provenance, TrackId};
use crate::library::CachedSound;
use crate::mix::MixView;
use crate::search::SearchHit;
use crate::soundscape::Soundscape;
use crate::sync::AccountStatus;

/// The four list panes, in `Tab` order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pane {
    Mixer,
    Soundscapes,
    Sounds,
    Search,
}

impl Pane {
    pub const ALL: [Pane; 4] = [Pane::Mixer, Pane::Soundscapes, Pane::Sounds, Pane::Search];

    fn index(self) -> usize {
        match self {
            Pane::Mixer => 0,
            Pane::Soundscapes => 1,
            Pane::Sounds => 2,
            Pane::Search => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Pane::Mixer => " mix ",
            Pane::Soundscapes => " soundscapes ",
            Pane::Sounds => " sounds ",
            Pane::Search => " search ",
        }
    }
}

/// Single-line text input currently open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    SaveName,
    Search,
    ImportPath,
}

impl Prompt {
    pub fn label(self) -> &'static str {
        match self {
            Prompt::SaveName => " save mix as ",
            Prompt::Search => " search freesound ",
            Prompt::ImportPath => " import file ",
        }
    }
}

/// A mix track as shown in the mixer pane.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackRow {
    pub id: TrackId,
    pub name: String,
    pub volume: f32,
    pub muted: bool,
    pub provenance: Provenance,
}

/// The main application model.
pub struct App {
    pub pane: Pane,
    pub mix: Vec<TrackRow>,
    pub soundscapes: Vec<Soundscape>,
    pub sounds: Vec<CachedSound>,
    pub hits: Vec<SearchHit>,
    pub last_query: String,

    selected: [usize; 4],

    pub prompt: Option<Prompt>,
    pub input: String,

    pub status: String,
    pub account: Option<AccountStatus>,
    /// Saves whose remote write has not gone through.
    pub unsynced: usize,
    /// Background tasks still running.
    pub busy: usize,

    pub default_volume: f32,
    pub volume_step: f32,
}

impl App {
    pub fn new(default_volume: f32, volume_step: f32) -> Self {
        Self {
            pane: Pane::Mixer,
            mix: Vec::new(),
            soundscapes: Vec::new(),
            sounds: Vec::new(),
            hits: Vec::new(),
            last_query: String::new(),
            selected: [0; 4],
            prompt: None,
            input: String::new(),
            status: String::new(),
            account: None,
            unsynced: 0,
            busy: 0,
            default_volume,
            volume_step,
        }
    }

    fn len_of(&self, pane: Pane) -> usize {
        match pane {
            Pane::Mixer => self.mix.len(),
            Pane::Soundscapes => self.soundscapes.len(),
            Pane::Sounds => self.sounds.len(),
            Pane::Search => self.hits.len(),
        }
    }

    /// Selected row in `pane`, clamped to its current length.
    pub fn selected(&self, pane: Pane) -> Option<usize> {
        let len = self.len_of(pane);
        (len > 0).then(|| self.selected[pane.index()].min(len - 1))
    }

    fn clamp(&mut self, pane: Pane) {
        let len = self.len_of(pane);
        let sel = &mut self.selected[pane.index()];
        *sel = if len == 0 { 0 } else { (*sel).min(len - 1) };
    }

    pub fn next_pane(&mut self) {
        self.pane = Pane::ALL[(self.pane.index() + 1) % Pane::ALL.len()];
    }

    pub fn prev_pane(&mut self) {
        self.pane = Pane::ALL[(self.pane.index() + Pane::ALL.len() - 1) % Pane::ALL.len()];
    }

    /// Move selection down in the active pane. Wraps around.
    pub fn next(&mut self) {
        let len = self.len_of(self.pane);
        if len == 0 {
            return;
        }
        let sel = &mut self.selected[self.pane.index()];
        *sel = (*sel + 1) % len;
    }

    /// Move selection up in the active pane. Wraps around.
    pub fn prev(&mut self) {
        let len = self.len_of(self.pane);
        if len == 0 {
            return;
        }
        let sel = &mut self.selected[self.pane.index()];
        *sel = if *sel == 0 { len - 1 } else { (*sel).min(len) - 1 };
    }

    pub fn select_first(&mut self) {
        self.selected[self.pane.index()] = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.len_of(self.pane);
        self.selected[self.pane.index()] = len.saturating_sub(1);
    }

    /// Replace the mixer rows with a fresh view of the session.
    pub fn set_mix(&mut self, view: &MixView) {
        self.mix = view
            .iter()
            .map(|t| TrackRow {
                id: t.id(),
                name: t.name().to_string(),
                volume: t.volume(),
                muted: t.is_muted(),
                provenance: t.provenance(),
            })
            .collect();
        self.clamp(Pane::Mixer);
    }

    pub fn set_soundscapes(&mut self, soundscapes: Vec<Soundscape>) {
        self.soundscapes = soundscapes;
        self.clamp(Pane::Soundscapes);
    }

    pub fn set_sounds(&mut self, sounds: Vec<CachedSound>) {
        self.sounds = sounds;
        self.clamp(Pane::Sounds);
    }

    pub fn set_hits(&mut self, query: String, hits: Vec<SearchHit>) {
        self.last_query = query;
        self.hits = hits;
        self.selected[Pane::Search.index()] = 0;
    }

    pub fn selected_track(&self) -> Option<&TrackRow> {
        self.selected(Pane::Mixer).map(|i| &self.mix[i])
    }

    pub fn selected_soundscape(&self) -> Option<&Soundscape> {
        self.selected(Pane::Soundscapes).map(|i| &self.soundscapes[i])
    }

    pub fn selected_sound(&self) -> Option<&CachedSound> {
        self.selected(Pane::Sounds).map(|i| &self.sounds[i])
    }

    pub fn selected_hit(&self) -> Option<&SearchHit> {
        self.selected(Pane::Search).map(|i| &self.hits[i])
    }

    pub fn open_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
        self.input.clear();
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.input.clear();
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    /// Close the prompt and hand back what was typed. `None` when no prompt
    /// is open or the input is blank.
    pub fn submit_prompt(&mut self) -> Option<(Prompt, String)> {
        let prompt = self.prompt.take()?;
        let text = std::mem::take(&mut self.input).trim().to_string();
        (!text.is_empty()).then_some((prompt, text))
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}
