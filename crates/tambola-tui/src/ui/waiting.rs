//! Waiting room
//!
//! Room code, roster and who starts the game.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::App;

const HEADER_HEIGHT: u16 = 5;

/// Render the waiting room.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let game = app.game();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(1)])
        .split(area);
    let [header_area, roster_area] = chunks.as_ref() else {
        return;
    };

    let room = game.room_id.as_deref().unwrap_or("(waiting for the server)");
    let mode = if game.mode_confirmed {
        game.mode.to_string()
    } else {
        format!("{} (until the host starts)", game.mode)
    };
    let hint = if game.capabilities.start_game {
        Span::styled("Type /start when everyone is here", Style::default().fg(Color::Green))
    } else {
        Span::styled("Waiting for the host to start...", Style::default().fg(Color::DarkGray))
    };

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("Room: "),
            Span::styled(room, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(format!("Mode: {mode}")),
        Line::from(hint),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Waiting Room "));
    frame.render_widget(header, *header_area);

    let me = game.player_name.as_deref();
    let items: Vec<ListItem> = game
        .roster
        .iter()
        .map(|name| {
            let style = if Some(name.as_str()) == me {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(format!(" {name}"), style)))
        })
        .collect();

    let title = format!(" Players ({}) ", game.roster.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, *roster_area);
}
