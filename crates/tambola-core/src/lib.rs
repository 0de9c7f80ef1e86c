//! Core game state for the Tambola client.
//!
//! Pure data structures, one per state concern, each owned by exactly one
//! component of the client state machine. Nothing here performs I/O or reads
//! the clock directly; time enters through [`env::Environment`].
//!
//! # Components
//!
//! - [`ticket`]: the ticket grid and the marking policy
//! - [`draws`]: called-number history and the current number
//! - [`claims`]: claim catalog locks and the result banner
//! - [`session`]: phase, role, room, roster, scores and standings

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod claims;
pub mod draws;
pub mod env;
pub mod session;
pub mod ticket;

pub use claims::{BannerId, BannerOutcome, ClaimBanner, ClaimCatalog, ClaimEntry, ClaimState};
pub use draws::DrawHistory;
pub use env::Environment;
pub use session::{Capabilities, GamePhase, Role, ScoreBoard, Session};
pub use ticket::{Cell, CellPos, MarkRejection, Ticket};
