//! Room lifecycle payloads.

use serde::{Deserialize, Serialize};

use super::game::GameMode;

/// Request to open a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoom {
    /// Display name of the creating player.
    pub player_name: String,
    /// Marking mode chosen for the room.
    pub mode: GameMode,
}

/// Request to enter a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoom {
    /// Display name of the joining player.
    pub player_name: String,
    /// Short room code shared by the host.
    pub room_id: String,
}

/// Room creation acknowledgement, sent only to the creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCreated {
    /// Short room code.
    pub room_id: String,
}

/// Complete roster, in join order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayersUpdate {
    /// Player display names.
    pub players: Vec<String>,
}
