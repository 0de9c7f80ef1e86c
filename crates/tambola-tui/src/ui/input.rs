//! Command line
//!
//! One bordered row holding the `> ` prompt, the typed command and the
//! terminal cursor. An empty line shows a dimmed hint instead.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tambola_app::InputState;

const PROMPT: &str = "> ";
const HINT: &str = "type a command, e.g. /claim 1";

/// Render the command line and place the cursor.
pub fn render(frame: &mut Frame, input: &InputState, area: Rect) {
    let text = if input.buffer().is_empty() {
        let hint = Span::styled(HINT, Style::default().fg(Color::DarkGray));
        Line::from(vec![Span::raw(PROMPT), hint])
    } else {
        Line::from(format!("{PROMPT}{}", input.buffer()))
    };
    frame.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL)), area);

    // Inside the border: one column left, one row down
    let first_col = area.x.saturating_add(1 + PROMPT.len() as u16);
    let last_col = area.right().saturating_sub(2);
    let column = first_col.saturating_add(input.cursor() as u16).min(last_col);
    frame.set_cursor_position((column, area.y.saturating_add(1)));
}
