//! Rendering.
//!
//! ```text
//! Current path: /media/movies
//! ┌ Files ───────────────┐┌ Streams ─────────────────────────┐
//! │ extras/              ││> [X] Stream 0 (v:0=h264):        │
//! │ movie.mkv            ││  [ ] Stream 1 (a:0=aac): (eng)   │
//! └──────────────────────┘└──────────────────────────────────┘
//! status
//! Output: /media/movies/movie_remux.mkv
//! help
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use rmx_core::browse::DirectoryLister;
use rmx_core::mux::Remuxer;
use rmx_core::navigation::ListContext;
use rmx_core::probe::Prober;
use rmx_core::session::Mode;

use crate::app::{App, StatusKind};

const BROWSE_HELP: &[(&str, &str)] = &[
    ("↑↓", "move"),
    ("→/Enter", "open"),
    ("←", "parent"),
    ("r", "refresh"),
    ("q", "quit"),
];

const INSPECT_HELP: &[(&str, &str)] = &[
    ("↑↓", "move"),
    ("Space", "include"),
    ("m", "drag"),
    ("s", "save"),
    ("r", "reload"),
    ("←/Esc", "close"),
    ("q", "quit"),
];

pub fn draw<L, P, R>(frame: &mut Frame<'_>, app: &App<L, P, R>)
where
    L: DirectoryLister,
    P: Prober,
    R: Remuxer,
{
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, layout[0], app);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(layout[1]);
    draw_files(frame, panes[0], app);
    draw_streams(frame, panes[1], app);

    draw_status(frame, layout[2], app);
    draw_output(frame, layout[3], app);
    draw_help(frame, layout[4], app);
}

fn draw_header<L, P, R>(frame: &mut Frame<'_>, area: Rect, app: &App<L, P, R>)
where
    L: DirectoryLister,
    P: Prober,
    R: Remuxer,
{
    let header = Paragraph::new(Line::from(vec![
        Span::styled("Current path: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(app.session().current_dir().display().to_string()),
    ]));
    frame.render_widget(header, area);
}

fn pane_block(title: &str, active: bool) -> Block<'_> {
    let border = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", title))
}

fn draw_files<L, P, R>(frame: &mut Frame<'_>, area: Rect, app: &App<L, P, R>)
where
    L: DirectoryLister,
    P: Prober,
    R: Remuxer,
{
    let session = app.session();
    let active = session.navigation().active_context() == ListContext::Files;

    let items: Vec<ListItem> = session
        .entries()
        .iter()
        .map(|entry| {
            let style = if entry.is_dir {
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(entry.display_name(), style))
        })
        .collect();

    let selected = (!items.is_empty()).then(|| session.navigation().index(ListContext::Files));
    let list = List::new(items)
        .block(pane_block("Files", active))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_streams<L, P, R>(frame: &mut Frame<'_>, area: Rect, app: &App<L, P, R>)
where
    L: DirectoryLister,
    P: Prober,
    R: Remuxer,
{
    let session = app.session();
    let active = session.navigation().active_context() == ListContext::Streams;
    let arrangement = session.arrangement();
    let dragged = arrangement.dragged_position();

    let title = match session.opened_path().and_then(|p| p.file_name()) {
        Some(name) => format!(
            "Streams of {} ({}/{})",
            name.to_string_lossy(),
            arrangement.included_count(),
            arrangement.len()
        ),
        None => "Streams".to_string(),
    };

    let items: Vec<ListItem> = arrangement
        .rows()
        .zip(arrangement.iter())
        .enumerate()
        .map(|(pos, (row, stream))| {
            let mut style = Style::default();
            if !stream.is_included() {
                style = style.fg(Color::DarkGray);
            }
            if dragged == Some(pos) {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            ListItem::new(Span::styled(row, style))
        })
        .collect();

    let selected = (session.mode() == Mode::Inspecting && !items.is_empty())
        .then(|| session.navigation().index(ListContext::Streams));
    let list = List::new(items)
        .block(pane_block(&title, active))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status<L, P, R>(frame: &mut Frame<'_>, area: Rect, app: &App<L, P, R>)
where
    L: DirectoryLister,
    P: Prober,
    R: Remuxer,
{
    let status = app.status();
    let style = match status.kind {
        StatusKind::Info => Style::default(),
        StatusKind::Success => Style::default().fg(Color::Green),
        StatusKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    frame.render_widget(Paragraph::new(Span::styled(status.text.as_str(), style)), area);
}

fn draw_output<L, P, R>(frame: &mut Frame<'_>, area: Rect, app: &App<L, P, R>)
where
    L: DirectoryLister,
    P: Prober,
    R: Remuxer,
{
    let Some(output) = app.session().proposed_output() else {
        return;
    };
    let line = Line::from(vec![
        Span::styled("Output: ", Style::default().fg(Color::DarkGray)),
        Span::raw(output.display().to_string()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_help<L, P, R>(frame: &mut Frame<'_>, area: Rect, app: &App<L, P, R>)
where
    L: DirectoryLister,
    P: Prober,
    R: Remuxer,
{
    let hints = match app.session().mode() {
        Mode::Browsing => BROWSE_HELP,
        Mode::Inspecting => INSPECT_HELP,
    };

    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (key, action) in hints {
        spans.push(Span::styled(
            *key,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", action)));
        spans.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
