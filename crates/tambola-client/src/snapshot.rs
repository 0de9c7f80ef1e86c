//! Owned view of the client state for renderers and invariant checks.

use tambola_core::{BannerId, BannerOutcome, Capabilities, ClaimEntry, GamePhase, Role, Ticket};
use tambola_proto::{ClaimKind, GameMode, LeaderboardEntry, Number};

/// Banner as shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerView {
    /// Banner identity.
    pub id: BannerId,
    /// Pattern the banner is about.
    pub claim: Option<ClaimKind>,
    /// Result.
    pub outcome: BannerOutcome,
    /// Display text.
    pub text: String,
}

/// Everything needed to draw a frame, detached from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Lifecycle phase.
    pub phase: GamePhase,
    /// Local role, once fixed.
    pub role: Option<Role>,
    /// Local player name.
    pub player_name: Option<String>,
    /// Room code.
    pub room_id: Option<String>,
    /// Marking mode.
    pub mode: GameMode,
    /// Whether the server confirmed `mode`.
    pub mode_confirmed: bool,
    /// Whether a join was sent and the game has not started.
    pub join_pending: bool,
    /// Revealed host controls.
    pub capabilities: Capabilities,
    /// Players in the room.
    pub roster: Vec<String>,
    /// Ticket with marks.
    pub ticket: Ticket,
    /// Called numbers in call order.
    pub drawn: Vec<Number>,
    /// Most recent draw.
    pub current_number: Option<Number>,
    /// Claim catalog with locks.
    pub claims: Vec<ClaimEntry>,
    /// Banner on display.
    pub banner: Option<BannerView>,
    /// `"<name>: <score>"` lines.
    pub score_lines: Vec<String>,
    /// Final standings.
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl GameSnapshot {
    /// Whether the local player hosts the room.
    pub fn is_host(&self) -> bool {
        self.role == Some(Role::Host)
    }

    /// Winner of `claim`, if won.
    pub fn winner(&self, claim: ClaimKind) -> Option<&str> {
        self.claims.iter().find(|e| e.kind == claim).and_then(|e| e.winner.as_deref())
    }

    /// Leaderboard display lines, `"<name> - <score>"`.
    pub fn leaderboard_lines(&self) -> Vec<String> {
        self.leaderboard.iter().map(|e| format!("{} - {}", e.name, e.score)).collect()
    }
}
