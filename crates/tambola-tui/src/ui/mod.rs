//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod game;
mod input;
mod leaderboard;
mod lobby;
mod status;
mod waiting;

pub use game::ticket_rows;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};
use tambola_app::Screen;

use crate::App;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    match app.screen() {
        Screen::Lobby => lobby::render(frame, app, *main_area),
        Screen::Waiting => waiting::render(frame, app, *main_area),
        Screen::Game => game::render(frame, app, *main_area),
        Screen::Leaderboard => leaderboard::render(frame, app, *main_area),
    }
    input::render(frame, app.input(), *input_area);
    status::render(frame, app, *status_area);
}
