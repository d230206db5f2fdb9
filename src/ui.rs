//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, Pane, TrackRow};
use crate::audio::Provenance;
use crate::config::UiSettings;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("tab", "next pane");
    map.insert("j/k", "up/down");
    map.insert("h/l", "volume -/+");
    map.insert("m", "mute");
    map.insert("x", "remove");
    map.insert("C", "clear mix");
    map.insert("enter", "load/add");
    map.insert("s", "save mix");
    map.insert("D", "delete soundscape");
    map.insert("r", "refresh");
    map.insert("R", "retry sync");
    map.insert("/", "search");
    map.insert("i", "import");
    map.insert("P", "clear downloads");
    map.insert("q", "quit");
    map
});

/// Render the controls help text.
fn controls_text() -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "tab", "j/k", "h/l", "m", "x", "C", "enter", "s", "D", "r", "R", "/", "i", "P", "q",
    ];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Ten-cell volume bar, e.g. `[######----]`.
fn volume_bar(volume: f32) -> String {
    let filled = (volume.clamp(0.0, 1.0) * 10.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}

fn track_line(row: &TrackRow) -> String {
    let origin = match row.provenance {
        Provenance::Remote { .. } => "",
        Provenance::Imported => " (imported)",
    };
    let mute = if row.muted { " MUTED" } else { "" };
    format!(
        "{} {:>3}%{mute}  {}{origin}",
        volume_bar(row.volume),
        (row.volume * 100.0).round() as u32,
        row.name
    )
}

fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    let account = app.account.map(|a| a.label()).unwrap_or("Checking account");
    parts.push(format!(" SYNC: {account}"));
    if app.unsynced > 0 {
        parts.push(format!("{} unsynced", app.unsynced));
    }
    parts.push(format!("MIX: {} sounds", app.mix.len()));
    if app.busy > 0 {
        parts.push("working...".to_string());
    }
    if !app.status.is_empty() {
        parts.push(app.status.clone());
    }

    parts.join(" • ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_list(frame: &mut Frame, app: &App, pane: Pane, items: Vec<ListItem>, area: Rect, title: String) {
    let active = app.pane == pane;
    let border_style = if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(if active { "> " } else { "  " });

    let mut state = ListState::default();
    state.select(app.selected(pane));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" soundscaper ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(app))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Mixer on the left, library panes stacked on the right.
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(body[1]);

    let mix_items: Vec<ListItem> = app.mix.iter().map(|r| ListItem::new(track_line(r))).collect();
    render_list(frame, app, Pane::Mixer, mix_items, body[0], Pane::Mixer.title().to_string());

    let scape_items: Vec<ListItem> = app
        .soundscapes
        .iter()
        .map(|s| ListItem::new(format!("{}  ({} sounds)", s.name, s.sound_infos.len())))
        .collect();
    render_list(
        frame,
        app,
        Pane::Soundscapes,
        scape_items,
        side[0],
        Pane::Soundscapes.title().to_string(),
    );

    let sound_items: Vec<ListItem> = app.sounds.iter().map(|s| ListItem::new(s.display())).collect();
    render_list(frame, app, Pane::Sounds, sound_items, side[1], Pane::Sounds.title().to_string());

    let hit_items: Vec<ListItem> = app
        .hits
        .iter()
        .map(|h| ListItem::new(format!("{}  #{}", h.display_name, h.source_id)))
        .collect();
    let search_title = if app.last_query.is_empty() {
        Pane::Search.title().to_string()
    } else {
        format!(" search: {} ", app.last_query)
    };
    render_list(frame, app, Pane::Search, hit_items, side[2], search_title);

    // Prompt popup over the body.
    if let Some(prompt) = app.prompt {
        let area = centered_rect_sized(60, 3, chunks[2]);
        frame.render_widget(Clear, area);
        let input = Paragraph::new(format!("{}_", app.input)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(prompt.label())
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        );
        frame.render_widget(input, area);
    }

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
