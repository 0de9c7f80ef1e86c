//! Status bar
//!
//! Displays connection status, room and the latest status message.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tambola_app::ConnectionState;

use crate::App;

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let connection_status = match app.connection_state() {
        ConnectionState::Disconnected => {
            Span::styled("Disconnected", Style::default().fg(Color::Red))
        },
        ConnectionState::Connecting => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Connected => Span::styled(
            format!("Connected ({})", app.server_addr()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let game = app.game();
    let room_info = game.room_id.as_ref().map_or_else(String::new, |room_id| {
        format!(" | Room: {room_id} | Players: {}", game.roster.len())
    });
    let message = app.status_message().map_or_else(String::new, |m| format!(" | {m}"));

    let status_line = Line::from(vec![
        Span::raw(" "),
        connection_status,
        Span::raw(room_info),
        Span::styled(message, Style::default().fg(Color::Yellow)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
