//! Leaderboard
//!
//! Final standings once the game is over.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::App;

/// Render the final standings.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .game()
        .leaderboard_lines()
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let style = if i == 0 {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(format!(" {}. {line}", i + 1), style)))
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title(" Game Over - /quit to leave ");
    frame.render_widget(List::new(items).block(block), area);
}
