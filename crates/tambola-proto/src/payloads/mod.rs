//! Message payloads grouped by concern.
//!
//! [`ServerEvent`] and [`ClientMessage`] are adjacently tagged: the variant
//! name becomes the `type` tag and the payload struct becomes `data`.

pub mod claim;
pub mod game;
pub mod room;

use serde::{Deserialize, Serialize};

use self::{
    claim::{ClaimResult, MakeClaim},
    game::{GameEnded, GameStarted, NumberDrawn, ScoreUpdate, TicketAssigned},
    room::{CreateRoom, JoinRoom, PlayersUpdate, RoomCreated},
};

/// Events pushed by the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerEvent {
    /// The room requested by this client now exists.
    RoomCreated(RoomCreated),
    /// Full roster of the room.
    PlayersUpdate(PlayersUpdate),
    /// This client's ticket.
    TicketAssigned(TicketAssigned),
    /// The host started the game.
    GameStarted(GameStarted),
    /// A number was called.
    NumberDrawn(NumberDrawn),
    /// Outcome of a claim.
    ClaimResult(ClaimResult),
    /// Full score table.
    ScoreUpdate(ScoreUpdate),
    /// Final standings.
    GameEnded(GameEnded),
}

impl ServerEvent {
    /// Every tag this crate can decode.
    pub const TAGS: [&'static str; 8] = [
        "ROOM_CREATED",
        "PLAYERS_UPDATE",
        "TICKET_ASSIGNED",
        "GAME_STARTED",
        "NUMBER_DRAWN",
        "CLAIM_RESULT",
        "SCORE_UPDATE",
        "GAME_ENDED",
    ];

    /// Wire tag of this event.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::RoomCreated(_) => "ROOM_CREATED",
            Self::PlayersUpdate(_) => "PLAYERS_UPDATE",
            Self::TicketAssigned(_) => "TICKET_ASSIGNED",
            Self::GameStarted(_) => "GAME_STARTED",
            Self::NumberDrawn(_) => "NUMBER_DRAWN",
            Self::ClaimResult(_) => "CLAIM_RESULT",
            Self::ScoreUpdate(_) => "SCORE_UPDATE",
            Self::GameEnded(_) => "GAME_ENDED",
        }
    }
}

/// Intents sent by the player's client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Open a new room with this player as host.
    CreateRoom(CreateRoom),
    /// Enter an existing room as a guest.
    JoinRoom(JoinRoom),
    /// Host starts the game.
    StartGame,
    /// Host calls the next number.
    DrawNumber,
    /// Assert a winning pattern.
    MakeClaim(MakeClaim),
}

impl ClientMessage {
    /// Wire tag of this message.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::CreateRoom(_) => "CREATE_ROOM",
            Self::JoinRoom(_) => "JOIN_ROOM",
            Self::StartGame => "START_GAME",
            Self::DrawNumber => "DRAW_NUMBER",
            Self::MakeClaim(_) => "MAKE_CLAIM",
        }
    }
}
