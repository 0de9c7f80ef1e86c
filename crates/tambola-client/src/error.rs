//! Client error types.

use tambola_core::GamePhase;
use tambola_proto::ClaimKind;
use thiserror::Error;

/// A player intent the client refused to send.
///
/// These are hints for the caller to surface; the session is unchanged when
/// one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Player name is blank after trimming.
    #[error("player name is required")]
    EmptyPlayerName,

    /// Room id is blank after trimming.
    #[error("room id is required")]
    EmptyRoomId,

    /// A create or join was already issued, or the session left the lobby.
    #[error("already in a room (phase {phase})")]
    AlreadyInRoom {
        /// Phase at the time of the intent.
        phase: GamePhase,
    },

    /// A create is still waiting for `ROOM_CREATED`.
    #[error("still waiting for the room to be created")]
    CreatePending,

    /// Host-only intent from a non-host.
    #[error("only the host can {action}")]
    NotHost {
        /// What was attempted.
        action: &'static str,
    },

    /// Claim submitted outside a running game.
    #[error("game is not in progress (phase {phase})")]
    GameNotInProgress {
        /// Phase at the time of the intent.
        phase: GamePhase,
    },

    /// Claim for a pattern someone already won.
    #[error("{claim} was already won by {winner}")]
    ClaimAlreadyWon {
        /// Pattern claimed.
        claim: ClaimKind,
        /// Recorded winner.
        winner: String,
    },
}
