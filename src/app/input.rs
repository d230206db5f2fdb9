//! Key handling: turns key presses into model changes and `Action`s.
//!
//! Anything that needs audio, storage or the network comes back as an
//! `Action` for the runtime to carry out.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use uuid::Uuid;

use crate::audio::TrackId;
use crate::library::CachedSound;
use crate::search::SearchHit;

use super::model::{App, Pane, Prompt};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Quit,
    SetVolume(TrackId, f32),
    ToggleMute(TrackId),
    Remove(TrackId),
    ClearMix,
    Save(String),
    Load(Uuid),
    Delete(Uuid),
    Refresh,
    Search(String),
    AddCached(CachedSound),
    AddHit(SearchHit),
    Import(PathBuf),
    Purge,
    Retry,
}

/// Handle one key press. `pending_g` tracks the first half of `gg`.
pub fn handle_key(app: &mut App, key: KeyEvent, pending_g: &mut bool) -> Option<Action> {
    if app.prompt.is_some() {
        *pending_g = false;
        return handle_prompt_key(app, key);
    }

    if key.code != KeyCode::Char('g') {
        *pending_g = false;
    }

    match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Action::Quit);
        }
        KeyCode::Tab => app.next_pane(),
        KeyCode::BackTab => app.prev_pane(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Char('g') => {
            if *pending_g {
                *pending_g = false;
                app.select_first();
            } else {
                *pending_g = true;
            }
        }
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('s') => app.open_prompt(Prompt::SaveName),
        KeyCode::Char('/') => app.open_prompt(Prompt::Search),
        KeyCode::Char('i') => app.open_prompt(Prompt::ImportPath),
        KeyCode::Char('r') => return Some(Action::Refresh),
        KeyCode::Char('R') => return Some(Action::Retry),
        KeyCode::Char('P') => return Some(Action::Purge),
        KeyCode::Char('C') => return Some(Action::ClearMix),
        _ => return handle_pane_key(app, key),
    }
    None
}

fn handle_pane_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    match app.pane {
        Pane::Mixer => {
            let track = app.selected_track()?;
            let step = app.volume_step;
            match key.code {
                KeyCode::Char('l') | KeyCode::Char('+') | KeyCode::Right => {
                    Some(Action::SetVolume(track.id, (track.volume + step).min(1.0)))
                }
                KeyCode::Char('h') | KeyCode::Char('-') | KeyCode::Left => {
                    Some(Action::SetVolume(track.id, (track.volume - step).max(0.0)))
                }
                KeyCode::Char('m') => Some(Action::ToggleMute(track.id)),
                KeyCode::Char('x') | KeyCode::Delete => Some(Action::Remove(track.id)),
                _ => None,
            }
        }
        Pane::Soundscapes => {
            let id = app.selected_soundscape()?.id;
            match key.code {
                KeyCode::Enter => Some(Action::Load(id)),
                KeyCode::Char('D') => Some(Action::Delete(id)),
                _ => None,
            }
        }
        Pane::Sounds => match key.code {
            KeyCode::Enter => app.selected_sound().cloned().map(Action::AddCached),
            _ => None,
        },
        Pane::Search => match key.code {
            KeyCode::Enter => app.selected_hit().cloned().map(Action::AddHit),
            _ => None,
        },
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Backspace => app.pop_input(),
        KeyCode::Enter => {
            let (prompt, text) = app.submit_prompt()?;
            return Some(match prompt {
                Prompt::SaveName => Action::Save(text),
                Prompt::Search => Action::Search(text),
                Prompt::ImportPath => Action::Import(expand_home(&text)),
            });
        }
        KeyCode::Char(c) if !c.is_control() => app.push_input(c),
        _ => {}
    }
    None
}

/// Expand a leading `~/` using `$HOME`.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}
