//! Tambola wire protocol.
//!
//! Every message on the wire is a single JSON text frame shaped as
//! `{"type": <TAG>, "data": <payload>}`. Payload-less messages omit `data`.
//!
//! # Components
//!
//! - [`ServerEvent`]: events pushed by the game server
//! - [`ClientMessage`]: intents sent by the player's client
//! - [`ClaimKind`]: the fixed claim catalog (code and label)
//! - [`ProtocolError`]: envelope decode/encode failures
//!
//! Decoding is forward-compatible: [`ServerEvent::decode`] returns `Ok(None)`
//! for a well-formed envelope whose tag this crate does not know.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod envelope;
pub mod errors;
pub mod payloads;

pub use errors::ProtocolError;
pub use payloads::{
    ClientMessage, ServerEvent,
    claim::{ClaimKind, ClaimResult, ClaimStatus, MakeClaim, UnknownClaim},
    game::{
        GameEnded, GameMode, GameStarted, LeaderboardEntry, Number, NumberDrawn, ScoreUpdate,
        TicketAssigned, TicketGrid,
    },
    room::{CreateRoom, JoinRoom, PlayersUpdate, RoomCreated},
};
