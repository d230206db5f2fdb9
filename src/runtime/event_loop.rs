use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{Action, App, handle_key};
use crate::config;
use crate::library;
use crate::ui;

use super::startup::Services;
use super::tasks::{AppEvent, Tasks};

/// Main terminal event loop: mirrors the mix into `app`, applies background
/// results, draws, and handles input. Returns `Ok(())` on quit.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    services: &Services,
    tasks: &Tasks,
    app: &mut App,
    events: &mpsc::Receiver<AppEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mix_rx = services.session.subscribe();
    let mut pending_g = false;

    let view = mix_rx.borrow_and_update().clone();
    app.set_mix(&view);

    loop {
        if mix_rx.has_changed().unwrap_or(false) {
            let view = mix_rx.borrow_and_update().clone();
            app.set_mix(&view);
        }

        while let Ok(ev) = events.try_recv() {
            apply_event(app, ev);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = handle_key(app, key, &mut pending_g) {
                    if perform(action, app, services, tasks) {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn apply_event(app: &mut App, ev: AppEvent) {
    match ev {
        AppEvent::Started => app.busy += 1,
        AppEvent::Finished => app.busy = app.busy.saturating_sub(1),
        AppEvent::Status(s) => app.set_status(s),
        AppEvent::Soundscapes(list) => app.set_soundscapes(list),
        AppEvent::Sounds(sounds) => app.set_sounds(sounds),
        AppEvent::SearchResults { query, hits } => app.set_hits(query, hits),
        AppEvent::Account(status) => app.account = Some(status),
        AppEvent::Unsynced(n) => app.unsynced = n,
    }
}

/// Carry out `action`. Returns `true` when the app should quit.
fn perform(action: Action, app: &mut App, services: &Services, tasks: &Tasks) -> bool {
    let session = &services.session;
    match action {
        Action::Quit => return true,
        Action::SetVolume(id, v) => session.set_volume(id, v),
        Action::ToggleMute(id) => session.toggle_mute(id),
        Action::Remove(id) => {
            if session.remove(id) {
                app.set_status("Removed sound");
            }
        }
        Action::ClearMix => {
            session.clear_all();
            app.set_status("Mix cleared");
        }
        Action::Save(name) => {
            if session.is_empty() {
                app.set_status("Nothing to save: the mix is empty");
            } else {
                tasks.save(name);
            }
        }
        Action::Load(id) => match app.soundscapes.iter().find(|s| s.id == id).cloned() {
            Some(s) => {
                app.set_status(format!("Loading {:?}...", s.name));
                tasks.load(s);
            }
            None => app.set_status("Soundscape no longer exists"),
        },
        Action::Delete(id) => tasks.delete(id),
        Action::Refresh => {
            tasks.refresh();
            tasks.rescan();
            tasks.account_status();
        }
        Action::Search(query) => tasks.search(query),
        Action::AddCached(sound) => {
            let status = match library::add_cached_to_mix(&*services.playback, session, &sound, app.default_volume) {
                Ok(track) => format!("Added {}", track.name()),
                Err(e) => {
                    log::warn!("adding {} failed: {e}", sound.file_name);
                    format!("Could not add {}: {e}", sound.title)
                }
            };
            app.set_status(status);
        }
        Action::AddHit(hit) => {
            app.set_status(format!("Downloading {}...", hit.display_name));
            tasks.add_hit(hit, app.default_volume);
        }
        Action::Import(path) => tasks.import(path, app.default_volume),
        Action::Purge => tasks.purge(),
        Action::Retry => tasks.retry(),
    }
    false
}
