//! Game progress payloads: tickets, draws, scores and standings.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use super::claim::ClaimKind;

/// A called number. Tickets use `0` for empty cells, so draws start at 1.
///
/// Games call 1 to 90, so a byte is enough. A draw or ticket cell outside
/// `0..=255` fails the whole payload with [`ProtocolError::InvalidPayload`],
/// whose reason names the offending value; the client logs and skips it.
///
/// [`ProtocolError::InvalidPayload`]: crate::ProtocolError::InvalidPayload
pub type Number = u8;

/// Ticket as sent on the wire: rows of cells, `0` marking an empty cell.
pub type TicketGrid = Vec<Vec<Number>>;

/// How ticket cells get marked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    /// Cells are marked as soon as their number is drawn.
    #[default]
    Auto,
    /// The player marks the current number by tapping it.
    Manual,
}

impl GameMode {
    /// Wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Manual => "MANUAL",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The local player's ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketAssigned {
    /// Grid of rows.
    pub ticket: TicketGrid,
}

/// Game start confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStarted {
    /// Authoritative marking mode.
    pub mode: GameMode,
}

/// A number call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberDrawn {
    /// The number just drawn.
    pub number: Number,
}

/// Score table, replaced wholesale on every update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    /// Player name to number of claims won.
    pub scores: BTreeMap<String, u32>,
    /// Player name to the claim codes that player has won.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub claims_won: BTreeMap<String, Vec<ClaimKind>>,
}

/// One row of the final standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Player display name.
    pub name: String,
    /// Final score.
    pub score: u32,
}

/// End of game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEnded {
    /// Standings, best first.
    pub leaderboard: Vec<LeaderboardEntry>,
}
