//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use tambola_core::CellPos;
use tambola_proto::{ClaimKind, GameMode};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Connect to server.
    Connect {
        /// WebSocket URL.
        server_addr: String,
    },

    /// Open a new room as host.
    CreateRoom {
        /// Display name.
        player_name: String,
        /// Marking mode.
        mode: GameMode,
    },

    /// Join an existing room.
    JoinRoom {
        /// Display name.
        player_name: String,
        /// Room code.
        room_id: String,
    },

    /// Start the game (host).
    StartGame,

    /// Draw the next number (host).
    DrawNumber,

    /// Tap a ticket cell.
    MarkCell {
        /// Zero-based cell position.
        pos: CellPos,
    },

    /// Claim a pattern.
    SubmitClaim {
        /// Pattern claimed.
        claim: ClaimKind,
    },
}

impl AppAction {
    /// Whether the action goes through the protocol bridge.
    pub fn is_protocol(&self) -> bool {
        !matches!(self, Self::Render | Self::Quit | Self::Connect { .. })
    }
}
