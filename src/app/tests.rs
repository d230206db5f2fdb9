use super::*;
use crate::audio::testing::FakeEngine;
use crate::audio::{AudioTrack, Provenance};
use crate::mix::MixSession;
use crate::search::SearchHit;
use crate::soundscape::Soundscape;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(app: &mut App, code: KeyCode) -> Option<Action> {
    let mut pending_g = false;
    handle_key(app, key(code), &mut pending_g)
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn hit(id: i64) -> SearchHit {
    SearchHit {
        source_id: id,
        display_name: format!("hit {id}"),
        preview: Some(format!("https://cdn.test/{id}.mp3")),
        fallback_preview: None,
    }
}

fn app_with_mix(volumes: &[f32]) -> (App, MixSession) {
    let engine = FakeEngine::new();
    let session = MixSession::new();
    for (i, v) in volumes.iter().enumerate() {
        let track = AudioTrack::create(
            &*engine,
            format!("t{i}"),
            format!("/s/t{i}.wav"),
            Provenance::Imported,
            *v,
        )
        .unwrap();
        session.add(track);
    }
    let mut app = App::new(1.0, 0.1);
    app.set_mix(&session.tracks());
    (app, session)
}

#[test]
fn tab_cycles_panes_both_ways() {
    let mut app = App::new(1.0, 0.05);
    assert_eq!(app.pane, Pane::Mixer);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.pane, Pane::Soundscapes);
    press(&mut app, KeyCode::BackTab);
    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.pane, Pane::Search);
}

#[test]
fn selection_wraps_and_survives_shrinking_lists() {
    let mut app = App::new(1.0, 0.05);
    app.pane = Pane::Search;
    app.set_hits("rain".into(), vec![hit(1), hit(2), hit(3)]);

    press(&mut app, KeyCode::Char('k'));
    assert_eq!(app.selected(Pane::Search), Some(2));
    press(&mut app, KeyCode::Char('j'));
    assert_eq!(app.selected(Pane::Search), Some(0));

    app.pane = Pane::Soundscapes;
    app.set_soundscapes(vec![Soundscape::new("a", vec![]), Soundscape::new("b", vec![])]);
    press(&mut app, KeyCode::Char('G'));
    assert_eq!(app.selected(Pane::Soundscapes), Some(1));
    app.set_soundscapes(vec![Soundscape::new("c", vec![])]);
    assert_eq!(app.selected(Pane::Soundscapes), Some(0));
    app.set_soundscapes(vec![]);
    assert_eq!(app.selected(Pane::Soundscapes), None);
}

#[test]
fn gg_jumps_to_top() {
    let mut app = App::new(1.0, 0.05);
    app.pane = Pane::Search;
    app.set_hits("x".into(), vec![hit(1), hit(2), hit(3)]);
    press(&mut app, KeyCode::Char('G'));

    let mut pending_g = false;
    handle_key(&mut app, key(KeyCode::Char('g')), &mut pending_g);
    assert_eq!(app.selected(Pane::Search), Some(2));
    handle_key(&mut app, key(KeyCode::Char('g')), &mut pending_g);
    assert_eq!(app.selected(Pane::Search), Some(0));
}

#[test]
fn volume_keys_step_and_clamp() {
    let (mut app, session) = app_with_mix(&[0.95, 0.5]);
    let first = app.mix[0].id;

    let action = press(&mut app, KeyCode::Char('l'));
    assert_eq!(action, Some(Action::SetVolume(first, 1.0)));

    press(&mut app, KeyCode::Char('j'));
    let second = app.mix[1].id;
    match press(&mut app, KeyCode::Char('-')) {
        Some(Action::SetVolume(id, v)) => {
            assert_eq!(id, second);
            assert!((v - 0.4).abs() < 1e-6);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(press(&mut app, KeyCode::Char('m')), Some(Action::ToggleMute(second)));
    assert_eq!(press(&mut app, KeyCode::Char('x')), Some(Action::Remove(second)));
    session.clear_all();
}

#[test]
fn mixer_keys_do_nothing_on_empty_mix() {
    let mut app = App::new(1.0, 0.05);
    assert_eq!(press(&mut app, KeyCode::Char('l')), None);
    assert_eq!(press(&mut app, KeyCode::Char('m')), None);
}

#[test]
fn enter_maps_to_pane_action() {
    let mut app = App::new(1.0, 0.05);
    let scape = Soundscape::new("Night", vec![]);
    app.set_soundscapes(vec![scape.clone()]);
    app.set_hits("owl".into(), vec![hit(9)]);

    app.pane = Pane::Soundscapes;
    assert_eq!(press(&mut app, KeyCode::Enter), Some(Action::Load(scape.id)));
    assert_eq!(press(&mut app, KeyCode::Char('D')), Some(Action::Delete(scape.id)));

    app.pane = Pane::Search;
    assert_eq!(press(&mut app, KeyCode::Enter), Some(Action::AddHit(hit(9))));
}

#[test]
fn save_prompt_collects_text_until_enter() {
    let mut app = App::new(1.0, 0.05);
    assert_eq!(press(&mut app, KeyCode::Char('s')), None);
    assert_eq!(app.prompt, Some(Prompt::SaveName));

    type_text(&mut app, "Forestq");
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.input, "Forest");

    assert_eq!(press(&mut app, KeyCode::Enter), Some(Action::Save("Forest".into())));
    assert_eq!(app.prompt, None);
}

#[test]
fn blank_or_cancelled_prompt_yields_nothing() {
    let mut app = App::new(1.0, 0.05);
    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "   ");
    assert_eq!(press(&mut app, KeyCode::Enter), None);
    assert_eq!(app.prompt, None);

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "rain");
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.prompt, None);
    assert!(app.input.is_empty());
}

#[test]
fn import_prompt_expands_home() {
    let mut app = App::new(1.0, 0.05);
    press(&mut app, KeyCode::Char('i'));
    type_text(&mut app, "/tmp/tavern.wav");
    assert_eq!(
        press(&mut app, KeyCode::Enter),
        Some(Action::Import("/tmp/tavern.wav".into()))
    );
}

#[test]
fn global_keys() {
    let mut app = App::new(1.0, 0.05);
    assert_eq!(press(&mut app, KeyCode::Char('q')), Some(Action::Quit));
    assert_eq!(press(&mut app, KeyCode::Char('r')), Some(Action::Refresh));
    assert_eq!(press(&mut app, KeyCode::Char('R')), Some(Action::Retry));
    assert_eq!(press(&mut app, KeyCode::Char('P')), Some(Action::Purge));
    assert_eq!(press(&mut app, KeyCode::Char('C')), Some(Action::ClearMix));
}

#[test]
fn set_mix_copies_track_state() {
    let (app, session) = app_with_mix(&[0.3]);
    let row = &app.mix[0];
    assert_eq!(row.name, "t0");
    assert_eq!(row.volume, 0.3);
    assert!(!row.muted);
    assert_eq!(app.selected_track().map(|t| t.id), Some(row.id));
    session.clear_all();
}
