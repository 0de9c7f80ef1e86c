//! Client events and actions.

use std::time::Duration;

use tambola_core::{BannerId, CellPos, GamePhase};
use tambola_proto::{ClaimKind, ClientMessage, GameMode, LeaderboardEntry, Number, ServerEvent};

/// Events the caller feeds into the client.
///
/// The caller is responsible for:
/// - Decoding messages from the network
/// - Driving time forward via ticks
/// - Forwarding player intents (create room, mark cell, claim, etc.)
///
/// Generic over `I` (Instant type) to support both production
/// (`std::time::Instant`) and simulation (virtual instant) environments.
#[derive(Debug, Clone)]
pub enum ClientEvent<I = std::time::Instant> {
    /// Decoded message from the server.
    MessageReceived(ServerEvent),

    /// Time tick for banner expiry.
    Tick {
        /// Current time from the environment.
        now: I,
    },

    /// Player wants to open a room.
    CreateRoom {
        /// Display name as typed.
        player_name: String,
        /// Marking mode for the room.
        mode: GameMode,
    },

    /// Player wants to join a room.
    JoinRoom {
        /// Display name as typed.
        player_name: String,
        /// Room code as typed.
        room_id: String,
    },

    /// Host wants to start the game.
    StartGame,

    /// Host wants the next number.
    DrawNumber,

    /// Player tapped a ticket cell.
    MarkCell {
        /// Tapped cell.
        pos: CellPos,
    },

    /// Player claims a pattern.
    SubmitClaim {
        /// Pattern claimed.
        claim: ClaimKind,
    },

    /// The banner timer for `banner_id` fired.
    ///
    /// Ignored unless `banner_id` is still the banner on display.
    DismissBanner {
        /// Banner the timer was armed for.
        banner_id: BannerId,
    },
}

/// Host-only control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// "Start game".
    StartGame,
    /// "Draw number".
    DrawNumber,
}

/// Actions the client produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Send a message to the server.
    Send(ClientMessage),

    /// Lifecycle phase moved forward.
    PhaseChanged {
        /// Previous phase.
        from: GamePhase,
        /// New phase.
        to: GamePhase,
    },

    /// This client is now host of a room.
    RoomCreated {
        /// Room code.
        room_id: String,
    },

    /// Roster replaced.
    RosterUpdated {
        /// Players in server order.
        players: Vec<String>,
    },

    /// A new ticket replaced the old one.
    TicketAssigned,

    /// The game started.
    GameStarted {
        /// Authoritative mode.
        mode: GameMode,
    },

    /// A host control became available.
    CapabilityRevealed(Capability),

    /// A number was called.
    NumberDrawn {
        /// The number.
        number: Number,
        /// `false` if the number had been called before.
        newly_drawn: bool,
    },

    /// Ticket cells were marked.
    CellsMarked {
        /// Newly marked cells.
        cells: Vec<CellPos>,
    },

    /// A claim pattern is now permanently won.
    ClaimLocked {
        /// Pattern.
        claim: ClaimKind,
        /// Winner.
        winner: String,
    },

    /// A claim-result banner is on display.
    ///
    /// The caller should arm one timer for `lifetime` and feed back
    /// [`ClientEvent::DismissBanner`], or keep sending ticks.
    BannerShown {
        /// Banner identity.
        banner_id: BannerId,
        /// Display text.
        text: String,
        /// How long it stays up.
        lifetime: Duration,
    },

    /// The banner was taken down.
    BannerDismissed {
        /// Banner that was cleared.
        banner_id: BannerId,
    },

    /// Scoreboard replaced.
    ScoresUpdated,

    /// Final standings published.
    GameEnded {
        /// Standings, best first.
        leaderboard: Vec<LeaderboardEntry>,
    },
}
