//! Client
//!
//! Action-based client state machine for the Tambola protocol. Keeps the
//! local game snapshot consistent with the server's event stream and turns
//! player intents into outbound messages.
//!
//! # Architecture
//!
//! The client follows the same Sans-IO and Action-Based patterns as
//! [`tambola_core`]. It receives events ([`ClientEvent`]), processes them
//! through pure state machine logic, and returns actions ([`ClientAction`]) for
//! the caller to execute.
//!
//! # Components
//!
//! - [`Client`]: Protocol dispatcher and intent emitter over one session
//! - [`ClientEvent`]: Events fed into the client
//! - [`ClientAction`]: Actions produced by the client
//! - [`GameSnapshot`]: Owned copy of everything a renderer needs

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod error;
mod event;
mod snapshot;

pub use client::{Client, ClientConfig, DEFAULT_BANNER_LIFETIME};
pub use error::ClientError;
pub use event::{Capability, ClientAction, ClientEvent};
pub use snapshot::{BannerView, GameSnapshot};
pub use tambola_core::{
    BannerId, BannerOutcome, CellPos, ClaimEntry, Environment, GamePhase, Role, Ticket,
};
pub use tambola_proto::{ClaimKind, GameMode, LeaderboardEntry, Number};
