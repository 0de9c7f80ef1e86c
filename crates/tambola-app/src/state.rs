//! Observable application state types.
//!
//! These serve as the "View Model" for the application: connection status
//! and which screen the game state calls for.

use tambola_client::{GamePhase, GameSnapshot};

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected to server.
    Disconnected,
    /// Connection in progress.
    Connecting,
    /// Connected.
    Connected,
}

/// Screen to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Create or join a room.
    Lobby,
    /// Room roster while waiting for the host to start.
    Waiting,
    /// Ticket, draws and claims.
    Game,
    /// Final standings.
    Leaderboard,
}

impl Screen {
    /// Screen for a game state.
    ///
    /// A guest who has sent a join waits on [`Screen::Waiting`] while the
    /// phase is still the lobby.
    pub fn for_game(game: &GameSnapshot) -> Self {
        match game.phase {
            GamePhase::Lobby if game.join_pending => Self::Waiting,
            GamePhase::Lobby => Self::Lobby,
            GamePhase::WaitingRoom => Self::Waiting,
            GamePhase::InProgress => Self::Game,
            GamePhase::Ended => Self::Leaderboard,
        }
    }
}
