//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the process-state buckets, the thread view of the
//! current track and the transport panel using `ratatui`. Nothing here mutates
//! the `App`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::process::{ProcessState, ThreadKind, Track, TrackId};

// Symbols that also have an emoji form carry Variation Selector-15 so
// terminals render them as text and keep our colours.
const ICON_NEW: &str = "+";
const ICON_READY: &str = "\u{21BB}";
const ICON_RUNNING: &str = "\u{25B6}\u{FE0E}";
const ICON_WAITING: &str = "\u{23F8}\u{FE0E}";
const ICON_END: &str = "\u{23F9}\u{FE0E}";
const ICON_CURRENT: &str = "\u{25CF}";

const BAR_WIDTH: usize = 12;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "select".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("l/n".to_string(), "next".to_string());
    // H/L is filled dynamically from config.
    map.insert("0-9".to_string(), "seek to 0-90%".to_string());
    map.insert("x".to_string(), "terminate".to_string());
    map.insert("i".to_string(), "interrupt".to_string());
    map.insert("K".to_string(), "details".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating the seek step.
pub(crate) fn controls_text(seek_step: f64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "enter", "space/p", "l/n", "H/L", "0-9", "x", "i", "gg/G", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}%", seek_step))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format whole seconds as `m:ss`.
pub(crate) fn format_mmss(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Build the time text (elapsed/total/remaining) per `UiSettings`.
pub(crate) fn time_text(elapsed: u64, total: u64, ui: &UiSettings) -> Option<String> {
    if ui.time_fields.is_empty() {
        return None;
    }

    let parts: Vec<String> = ui
        .time_fields
        .iter()
        .map(|f| match f {
            TimeField::Elapsed => format_mmss(elapsed),
            TimeField::Total => format_mmss(total),
            TimeField::Remaining => format!("-{}", format_mmss(total.saturating_sub(elapsed))),
        })
        .collect();

    Some(parts.join(&ui.time_separator))
}

/// Text progress bar of `width` cells for a percent value.
pub(crate) fn progress_bar(percent: f64, width: usize) -> String {
    let ratio = percent.clamp(0.0, 100.0) / 100.0;
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(width - filled)
    )
}

fn state_colour(state: ProcessState) -> Color {
    match state {
        ProcessState::New => Color::Rgb(96, 165, 250),
        ProcessState::Ready => Color::Rgb(251, 191, 36),
        ProcessState::Running => Color::Rgb(34, 197, 94),
        ProcessState::Waiting => Color::Rgb(251, 146, 60),
        ProcessState::End => Color::Rgb(239, 68, 68),
    }
}

fn state_icon(state: ProcessState) -> &'static str {
    match state {
        ProcessState::New => ICON_NEW,
        ProcessState::Ready => ICON_READY,
        ProcessState::Running => ICON_RUNNING,
        ProcessState::Waiting => ICON_WAITING,
        ProcessState::End => ICON_END,
    }
}

fn thread_colour(kind: ThreadKind) -> Color {
    match kind {
        ThreadKind::Decode => Color::Rgb(59, 130, 246),
        ThreadKind::Buffer => Color::Rgb(168, 85, 247),
        ThreadKind::Play => Color::Rgb(74, 222, 128),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into the provided `frame`.
///
/// `highlight` names a track whose state just changed; it is drawn emphasised.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    highlight: Option<TrackId>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(4),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app, ui_settings);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    draw_states(frame, body[0], app, highlight);
    draw_threads(frame, body[1], app);
    draw_transport(frame, chunks[2], app, ui_settings);

    if app.details_window {
        // Keep the popup inside the body so header and transport stay visible.
        let popup_area = centered_rect_sized(76, 10, chunks[1]);
        frame.render_widget(Clear, popup_area);
        draw_details(frame, popup_area, app.cursor_track());
    }

    let footer = Paragraph::new(controls_text(controls_settings.seek_step))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_padded()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App, ui: &UiSettings) {
    let line = Line::from(vec![
        Span::raw(ui.header_text.as_str()),
        Span::raw(" \u{2022} "),
        Span::styled(
            format!("Processes: {}", app.tracks.len()),
            Style::default().fg(state_colour(ProcessState::Running)),
        ),
        Span::raw(" \u{2022} "),
        Span::styled(
            format!("Threads: {}", app.thread_count()),
            Style::default().fg(state_colour(ProcessState::Ready)),
        ),
        Span::raw(" \u{2022} "),
        Span::raw(format!("Active: {}", app.active_thread_count())),
    ]);

    let header = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" proctune ")
            .title_alignment(Alignment::Center),
    );
    frame.render_widget(header, area);
}

fn track_item<'a>(app: &App, track: &'a Track, highlight: Option<TrackId>) -> ListItem<'a> {
    let is_current = app.current_id() == Some(track.id);
    let marker = if is_current { ICON_CURRENT } else { " " };

    let mut title_style = Style::default().add_modifier(Modifier::BOLD);
    if highlight == Some(track.id) {
        title_style = title_style
            .fg(state_colour(track.state))
            .add_modifier(Modifier::UNDERLINED);
    }

    let line = Line::from(vec![
        Span::styled(format!("  {} ", marker), Style::default().fg(Color::White)),
        Span::styled(
            format!("{} ", state_icon(track.state)),
            Style::default().fg(state_colour(track.state)),
        ),
        Span::styled(track.title.as_str(), title_style),
        Span::raw(" - "),
        Span::styled(track.artist.as_str(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(
            progress_bar(track.progress, BAR_WIDTH),
            Style::default().fg(state_colour(track.state)),
        ),
        Span::raw(format!(" {:>3.0}%", track.progress)),
    ]);
    ListItem::new(line)
}

fn draw_states(frame: &mut Frame, area: Rect, app: &App, highlight: Option<TrackId>) {
    let mut items: Vec<ListItem> = Vec::new();
    let mut cursor_row: Option<usize> = None;
    let cursor_id = app.cursor_track().map(|t| t.id);

    for state in ProcessState::ALL {
        let colour = state_colour(state);
        items.push(ListItem::new(Line::from(vec![
            Span::styled(
                format!("{} ", state_icon(state)),
                Style::default().fg(colour),
            ),
            Span::styled(
                state.label(),
                Style::default().fg(colour).add_modifier(Modifier::BOLD),
            ),
        ])));

        let mut any = false;
        for track in app.tracks_in_state(state) {
            any = true;
            if cursor_id == Some(track.id) {
                cursor_row = Some(items.len());
            }
            items.push(track_item(app, track, highlight));
        }

        if !any {
            items.push(ListItem::new(Line::from(Span::styled(
                format!("    No {} processes", state.name()),
                Style::default().fg(Color::DarkGray),
            ))));
        }
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" process states "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(cursor_row);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_threads(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" threads ")
        .padding(left_padded());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(track) = app.current_track() else {
        let hint = Paragraph::new("Select a track to visualize threads")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);
        frame.render_widget(hint, rows[1]);
        return;
    };

    let mut constraints = vec![
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ];
    for _ in &track.threads {
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let status_dot = if app.is_playing() {
        Span::styled(
            ICON_CURRENT,
            Style::default().fg(state_colour(ProcessState::Running)),
        )
    } else {
        Span::styled(ICON_CURRENT, Style::default().fg(Color::DarkGray))
    };

    frame.render_widget(Paragraph::new(track.title.as_str()).bold(), rows[0]);
    frame.render_widget(Paragraph::new(track.artist.as_str()).fg(Color::Gray), rows[1]);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            status_dot,
            Span::raw(format!(" {} | PID: {}", track.state.label(), track.id)),
        ])),
        rows[2],
    );
    frame.render_widget(Paragraph::new("Active Threads").bold(), rows[4]);

    for (n, thread) in track.threads.iter().enumerate() {
        let label_row = rows[5 + n * 2];
        let gauge_row = rows[6 + n * 2];

        let (status, status_style) = if thread.active {
            (
                "ACTIVE",
                Style::default().fg(state_colour(ProcessState::Running)),
            )
        } else {
            ("INACTIVE", Style::default().fg(Color::DarkGray))
        };
        let label = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(9)])
            .split(label_row);
        frame.render_widget(
            Paragraph::new(format!("{} Thread (TID {})", thread.kind.label(), thread.id)),
            label[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(status, status_style)).alignment(Alignment::Right),
            label[1],
        );

        let gauge = Gauge::default()
            .gauge_style(
                Style::default()
                    .fg(thread_colour(thread.kind))
                    .bg(Color::Rgb(40, 40, 48)),
            )
            .ratio((thread.progress / 100.0).clamp(0.0, 1.0))
            .label("")
            .use_unicode(true);
        frame.render_widget(gauge, gauge_row);
    }

    let count_row = rows[5 + track.threads.len() * 2];
    frame.render_widget(
        Paragraph::new(format!("{} Active Threads", track.active_thread_count()))
            .alignment(Alignment::Center),
        count_row,
    );
}

fn draw_transport(frame: &mut Frame, area: Rect, app: &App, ui: &UiSettings) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" player ")
        .padding(left_padded());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let (ratio, elapsed, total) = match app.current_track() {
        Some(t) => (t.progress / 100.0, t.elapsed_secs(), u64::from(t.duration)),
        None => (0.0, 0, 0),
    };

    let time_width = 24;
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(time_width)])
        .split(rows[0]);

    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(Color::Rgb(250, 189, 47))
                .bg(Color::Rgb(50, 30, 60)),
        )
        .ratio(ratio.clamp(0.0, 1.0))
        .label("")
        .use_unicode(true);
    frame.render_widget(gauge, top[0]);

    if let Some(time) = time_text(elapsed, total, ui) {
        frame.render_widget(Paragraph::new(time).alignment(Alignment::Right), top[1]);
    }

    let status = match app.current_track() {
        Some(t) => {
            let icon = if app.is_playing() {
                ICON_RUNNING
            } else {
                ICON_WAITING
            };
            let mut spans = vec![
                Span::raw(format!("{} ", icon)),
                Span::styled(t.state.describe(), Style::default().fg(state_colour(t.state))),
            ];
            if t.state == ProcessState::Running {
                spans.push(Span::styled(
                    format!(" {}", ICON_CURRENT),
                    Style::default()
                        .fg(state_colour(ProcessState::Running))
                        .add_modifier(Modifier::SLOW_BLINK),
                ));
            }
            Line::from(spans)
        }
        None => Line::from(Span::styled(
            "No process scheduled",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(status).alignment(Alignment::Center), rows[1]);
}

fn draw_details(frame: &mut Frame, area: Rect, track: Option<&Track>) {
    let text = match track {
        Some(t) => format!(
            "Title: {}\nArtist: {}\nPID: {}\nDuration: {}\nState: {}\nProgress: {:.1}%\nCover: {}",
            t.title,
            t.artist,
            t.id,
            format_mmss(u64::from(t.duration)),
            t.state.label(),
            t.progress,
            if t.cover.is_empty() { "-" } else { t.cover.as_str() },
        ),
        None => "No track selected".to_string(),
    };

    let popup = Paragraph::new(text)
        .block(
            Block::default()
                .padding(left_padded())
                .borders(Borders::ALL)
                .title(" details (K closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(popup, area);
}
