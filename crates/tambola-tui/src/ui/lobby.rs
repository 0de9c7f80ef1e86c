//! Lobby screen
//!
//! Explains how to open or join a room.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::App;

/// Render the lobby help.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let name = app.default_name().unwrap_or("<name>");
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(Span::styled("Welcome to Tambola", heading)),
        Line::default(),
        Line::from(format!("  /create {name} [auto|manual]   open a room as host")),
        Line::from(format!("  /join {name} <room>            join a friend's room")),
        Line::from("  /quit                          leave"),
        Line::default(),
        Line::from(Span::styled(
            "AUTO marks your ticket for you; MANUAL lets you tap numbers as they are called.",
            muted,
        )),
    ];

    let block = Block::default().borders(Borders::ALL).title(" Lobby ");
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
