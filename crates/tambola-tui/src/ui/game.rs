//! Game screen
//!
//! Ticket with marks, called numbers, the claim catalog, scores and the
//! claim banner.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use tambola_app::GameSnapshot;
use tambola_client::{BannerOutcome, GameMode, Ticket};
use tambola_core::Cell;

use crate::App;

const TICKET_HEIGHT: u16 = 7;
const BANNER_HEIGHT: u16 = 3;
const SIDEBAR_WIDTH: u16 = 32;
const CLAIMS_HEIGHT: u16 = 8;

/// Plain-text rows of a ticket: `[NN]` marked, ` NN ` unmarked, ` .. `
/// blank.
pub fn ticket_rows(ticket: &Ticket) -> Vec<String> {
    ticket.rows().iter().map(|row| row.iter().map(|cell| cell_text(*cell)).collect()).collect()
}

fn cell_text(cell: Cell) -> String {
    match cell {
        Cell::Empty => " .. ".to_string(),
        Cell::Numbered { value, marked: true } => format!("[{value:>2}]"),
        Cell::Numbered { value, marked: false } => format!(" {value:>2} "),
    }
}

/// Render the game screen.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)])
        .split(area);
    let [board_area, sidebar_area] = chunks.as_ref() else {
        return;
    };

    render_board(frame, app.game(), *board_area);
    render_sidebar(frame, app.game(), *sidebar_area);
}

fn render_board(frame: &mut Frame, game: &GameSnapshot, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TICKET_HEIGHT),
            Constraint::Length(BANNER_HEIGHT),
            Constraint::Min(3),
        ])
        .split(area);
    let [ticket_area, banner_area, drawn_area] = chunks.as_ref() else {
        return;
    };

    render_ticket(frame, game, *ticket_area);
    render_banner(frame, game, *banner_area);
    render_drawn(frame, game, *drawn_area);
}

fn render_ticket(frame: &mut Frame, game: &GameSnapshot, area: Rect) {
    let marked = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let current = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let blank = Style::default().fg(Color::DarkGray);

    let mut lines: Vec<Line> = game
        .ticket
        .rows()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| {
                    let style = match cell {
                        Cell::Empty => blank,
                        Cell::Numbered { marked: true, .. } => marked,
                        Cell::Numbered { value, .. } if Some(*value) == game.current_number => {
                            current
                        },
                        Cell::Numbered { .. } => Style::default(),
                    };
                    Span::styled(cell_text(*cell), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled("No ticket yet", blank)));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        match game.mode {
            GameMode::Auto => "AUTO: numbers are marked for you",
            GameMode::Manual => "MANUAL: /mark <row> <col> when your number is called",
        },
        blank,
    )));

    let block = Block::default().borders(Borders::ALL).title(" Ticket ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_banner(frame: &mut Frame, game: &GameSnapshot, area: Rect) {
    let line = game.banner.as_ref().map_or_else(Line::default, |banner| {
        let color = match banner.outcome {
            BannerOutcome::Success { .. } => Color::Green,
            BannerOutcome::Invalid => Color::Red,
            BannerOutcome::Already => Color::Yellow,
        };
        let label = banner.claim.map_or_else(String::new, |claim| format!(" ({claim})"));
        Line::from(Span::styled(
            format!("{}{label}", banner.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    });

    frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

fn render_drawn(frame: &mut Frame, game: &GameSnapshot, area: Rect) {
    let current = game.current_number.map_or_else(|| "--".to_string(), |n| n.to_string());
    let title = format!(" Current: {current} | Drawn {}/90 ", game.drawn.len());

    // Newest first so the latest calls stay visible
    let calls: Vec<String> = game.drawn.iter().rev().map(ToString::to_string).collect();
    let mut lines = vec![Line::from(calls.join(" "))];
    if game.capabilities.draw_number {
        lines.push(Line::from(Span::styled(
            "/draw to call the next number",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn render_sidebar(frame: &mut Frame, game: &GameSnapshot, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(CLAIMS_HEIGHT), Constraint::Min(3)])
        .split(area);
    let [claims_area, scores_area] = chunks.as_ref() else {
        return;
    };

    let claims: Vec<ListItem> = game
        .claims
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let line = match &entry.winner {
                Some(winner) => Line::from(Span::styled(
                    format!("{} {:<12} {winner}", i + 1, entry.kind.label()),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT),
                )),
                None => Line::from(format!("{} {:<12} open", i + 1, entry.kind.label())),
            };
            ListItem::new(line)
        })
        .collect();
    let block = Block::default().borders(Borders::ALL).title(" Claims (/claim N) ");
    frame.render_widget(List::new(claims).block(block), *claims_area);

    let scores: Vec<ListItem> =
        game.score_lines.iter().map(|line| ListItem::new(format!(" {line}"))).collect();
    let block = Block::default().borders(Borders::ALL).title(" Scores ");
    frame.render_widget(List::new(scores).block(block), *scores_area);
}

#[cfg(test)]
mod tests {
    use tambola_core::CellPos;

    use super::*;

    #[test]
    fn ticket_rows_show_marks_and_blanks() {
        let mut ticket = Ticket::from_grid(&[
            vec![4, 0, 21, 0, 45, 0, 63, 0, 88],
            vec![9, 12, 0, 33, 0, 56, 0, 72, 0],
        ]);
        ticket.mark_number(21);
        ticket.mark_number(9);
        assert_eq!(ticket.marked_positions(), vec![CellPos::new(0, 2), CellPos::new(1, 0)]);

        let rows: Vec<String> =
            ticket_rows(&ticket).iter().map(|r| format!("|{}|", r.trim_end())).collect();
        insta::assert_snapshot!(rows.join("\n"), @r"
        |  4  .. [21] ..  45  ..  63  ..  88|
        |[ 9] 12  ..  33  ..  56  ..  72  ..|
        ");
    }

    #[test]
    fn unassigned_ticket_has_no_rows() {
        assert!(ticket_rows(&Ticket::default()).is_empty());
    }
}
