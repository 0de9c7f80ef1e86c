//! Ticket grid and marking policy.
//!
//! A [`Ticket`] is built from the server's grid and keeps its shape for its
//! whole life. Only the `marked` flag of numbered cells ever changes, and it
//! only ever goes from unmarked to marked.
//!
//! Two marking paths exist and the game mode picks one:
//!
//! - AUTO: [`Ticket::mark_number`] is applied for every drawn number.
//! - MANUAL: [`Ticket::tap`] accepts a player tap only on a cell holding the
//!   current number.

use std::fmt;

use tambola_proto::{GameMode, Number};
use thiserror::Error;

/// One cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Non-playable placeholder.
    Empty,
    /// Playable cell.
    Numbered {
        /// Printed number.
        value: Number,
        /// Whether the player has this number.
        marked: bool,
    },
}

impl Cell {
    fn from_wire(value: Number) -> Self {
        if value == 0 { Self::Empty } else { Self::Numbered { value, marked: false } }
    }

    /// Printed number. `None` for empty cells.
    pub fn value(&self) -> Option<Number> {
        match self {
            Self::Empty => None,
            Self::Numbered { value, .. } => Some(*value),
        }
    }

    /// Whether this is a marked numbered cell.
    pub fn is_marked(&self) -> bool {
        matches!(self, Self::Numbered { marked: true, .. })
    }
}

/// Zero-based grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl CellPos {
    /// Create a position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Why a player tap did not mark anything.
///
/// Mis-taps are ordinary usage, so these are reported to the caller for
/// logging only and never surface as errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkRejection {
    /// The game marks cells by itself.
    #[error("cells are marked automatically in AUTO mode")]
    AutoMode,
    /// No number has been drawn yet.
    #[error("no number has been drawn yet")]
    NoCurrentNumber,
    /// Position lies outside the grid.
    #[error("position is outside the ticket")]
    OutOfBounds,
    /// Position is a placeholder cell.
    #[error("cell is blank")]
    EmptyCell,
    /// Cell number differs from the current number.
    #[error("cell holds {value}, current number is {current}")]
    NotCurrentNumber {
        /// Number printed on the tapped cell.
        value: Number,
        /// Number currently called.
        current: Number,
    },
    /// Cell was marked before.
    #[error("cell is already marked")]
    AlreadyMarked,
}

/// The local player's ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ticket {
    rows: Vec<Vec<Cell>>,
}

impl Ticket {
    /// Build an unmarked ticket from the wire grid (`0` = empty cell).
    pub fn from_grid(grid: &[Vec<Number>]) -> Self {
        let rows =
            grid.iter().map(|row| row.iter().copied().map(Cell::from_wire).collect()).collect();
        Self { rows }
    }

    /// Whether a ticket has been assigned.
    pub fn is_assigned(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Rows of cells.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell count of every row.
    pub fn shape(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }

    /// Cell at `pos`. `None` if out of bounds.
    pub fn cell(&self, pos: CellPos) -> Option<Cell> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.col)).copied()
    }

    /// Whether this ticket prints exactly `grid`, ignoring marks.
    pub fn matches_grid(&self, grid: &[Vec<Number>]) -> bool {
        self.rows.len() == grid.len()
            && self.rows.iter().zip(grid).all(|(row, wire)| {
                row.len() == wire.len()
                    && row.iter().zip(wire).all(|(cell, value)| cell.value().unwrap_or(0) == *value)
            })
    }

    /// Positions of every marked cell, row-major.
    pub fn marked_positions(&self) -> Vec<CellPos> {
        self.positions().filter(|(_, cell)| cell.is_marked()).map(|(pos, _)| pos).collect()
    }

    /// Every numbered value on the ticket, row-major.
    pub fn numbers(&self) -> Vec<Number> {
        self.positions().filter_map(|(_, cell)| cell.value()).collect()
    }

    /// Mark every cell printing `number`. Returns the newly marked positions.
    pub fn mark_number(&mut self, number: Number) -> Vec<CellPos> {
        let mut newly_marked = Vec::new();
        for (r, row) in self.rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                if let Cell::Numbered { value, marked } = cell
                    && *value == number
                    && !*marked
                {
                    *marked = true;
                    newly_marked.push(CellPos::new(r, c));
                }
            }
        }
        newly_marked
    }

    /// Apply a player tap under the marking policy of `mode`.
    ///
    /// In MANUAL mode the tap marks the cell iff a number has been drawn and
    /// the cell prints exactly that number. Earlier draws do not count.
    pub fn tap(
        &mut self,
        pos: CellPos,
        mode: GameMode,
        current: Option<Number>,
    ) -> Result<(), MarkRejection> {
        if mode == GameMode::Auto {
            return Err(MarkRejection::AutoMode);
        }
        let current = current.ok_or(MarkRejection::NoCurrentNumber)?;
        let cell = self
            .rows
            .get_mut(pos.row)
            .and_then(|row| row.get_mut(pos.col))
            .ok_or(MarkRejection::OutOfBounds)?;

        match cell {
            Cell::Empty => Err(MarkRejection::EmptyCell),
            Cell::Numbered { marked: true, .. } => Err(MarkRejection::AlreadyMarked),
            Cell::Numbered { value, .. } if *value != current => {
                Err(MarkRejection::NotCurrentNumber { value: *value, current })
            },
            Cell::Numbered { marked, .. } => {
                *marked = true;
                Ok(())
            },
        }
    }

    fn positions(&self) -> impl Iterator<Item = (CellPos, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().map(move |(c, cell)| (CellPos::new(r, c), *cell))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ticket {
        Ticket::from_grid(&[vec![7, 0, 21], vec![0, 15, 7], vec![5, 0, 0]])
    }

    #[test]
    fn zero_becomes_empty_cell() {
        let ticket = sample();
        assert_eq!(ticket.cell(CellPos::new(0, 1)), Some(Cell::Empty));
        assert_eq!(ticket.cell(CellPos::new(0, 0)).and_then(|c| c.value()), Some(7));
        assert_eq!(ticket.shape(), vec![3, 3, 3]);
    }

    #[test]
    fn mark_number_hits_every_copy_once() {
        let mut ticket = sample();
        let marked = ticket.mark_number(7);
        assert_eq!(marked, vec![CellPos::new(0, 0), CellPos::new(1, 2)]);

        // Second pass marks nothing new
        assert!(ticket.mark_number(7).is_empty());
        assert_eq!(ticket.marked_positions().len(), 2);
    }

    #[test]
    fn manual_tap_requires_current_number() {
        let mut ticket = sample();

        assert_eq!(
            ticket.tap(CellPos::new(0, 0), GameMode::Manual, None),
            Err(MarkRejection::NoCurrentNumber)
        );
        assert_eq!(
            ticket.tap(CellPos::new(0, 0), GameMode::Manual, Some(3)),
            Err(MarkRejection::NotCurrentNumber { value: 7, current: 3 })
        );
        assert_eq!(ticket.tap(CellPos::new(0, 0), GameMode::Manual, Some(7)), Ok(()));
        assert_eq!(
            ticket.tap(CellPos::new(0, 0), GameMode::Manual, Some(7)),
            Err(MarkRejection::AlreadyMarked)
        );

        // Only the tapped copy is marked
        assert_eq!(ticket.marked_positions(), vec![CellPos::new(0, 0)]);
    }

    #[test]
    fn auto_mode_ignores_taps() {
        let mut ticket = sample();
        assert_eq!(
            ticket.tap(CellPos::new(0, 0), GameMode::Auto, Some(7)),
            Err(MarkRejection::AutoMode)
        );
        assert!(ticket.marked_positions().is_empty());
    }

    #[test]
    fn taps_outside_numbers_are_rejected() {
        let mut ticket = sample();
        assert_eq!(
            ticket.tap(CellPos::new(0, 1), GameMode::Manual, Some(7)),
            Err(MarkRejection::EmptyCell)
        );
        assert_eq!(
            ticket.tap(CellPos::new(9, 9), GameMode::Manual, Some(7)),
            Err(MarkRejection::OutOfBounds)
        );
    }

    #[test]
    fn matches_grid_ignores_marks() {
        let grid = vec![vec![7, 0, 21], vec![0, 15, 7], vec![5, 0, 0]];
        let mut ticket = Ticket::from_grid(&grid);
        ticket.mark_number(21);
        assert!(ticket.matches_grid(&grid));
        assert!(!ticket.matches_grid(&[vec![7, 0, 21]]));
    }
}
