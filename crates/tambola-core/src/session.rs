//! Room and session state: phase, role, room, roster, scores and standings.
//!
//! # Phase
//!
//! ```text
//! Lobby ──ROOM_CREATED──> WaitingRoom ──GAME_STARTED──> InProgress ──GAME_ENDED──> Ended
//!   └────────────────────GAME_STARTED───────────────────────┘
//! ```
//!
//! The phase only ever moves right. A guest never passes through
//! `WaitingRoom`: it goes straight from `Lobby` to `InProgress` and shows a
//! waiting screen in between through [`Session::join_pending`].

use std::{collections::BTreeMap, fmt};

use tambola_proto::{ClaimKind, GameMode, LeaderboardEntry, ScoreUpdate};

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum GamePhase {
    /// Not in a room yet.
    #[default]
    Lobby,
    /// Room created, waiting for the host to start.
    WaitingRoom,
    /// Numbers are being drawn.
    InProgress,
    /// Final standings published. Terminal.
    Ended,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lobby => "LOBBY",
            Self::WaitingRoom => "WAITING_ROOM",
            Self::InProgress => "IN_PROGRESS",
            Self::Ended => "ENDED",
        })
    }
}

/// Local player's role in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Created the room; may start the game and draw numbers.
    Host,
    /// Joined an existing room.
    Guest,
}

/// Host-only controls that have been revealed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// "Start game" is available.
    pub start_game: bool,
    /// "Draw number" is available.
    pub draw_number: bool,
}

/// Live scores and claims won, rebuilt wholesale on every update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    scores: BTreeMap<String, u32>,
    claims_won: BTreeMap<String, Vec<ClaimKind>>,
}

impl ScoreBoard {
    /// Board built from a `SCORE_UPDATE` payload.
    pub fn from_update(update: &ScoreUpdate) -> Self {
        Self { scores: update.scores.clone(), claims_won: update.claims_won.clone() }
    }

    /// Scores by player name.
    pub fn scores(&self) -> &BTreeMap<String, u32> {
        &self.scores
    }

    /// Claims `player` has won. Empty if unknown.
    pub fn claims_won(&self, player: &str) -> &[ClaimKind] {
        self.claims_won.get(player).map_or(&[], Vec::as_slice)
    }

    /// Display lines, `"<name>: <score>"`, ordered by name.
    pub fn lines(&self) -> Vec<String> {
        self.scores.iter().map(|(name, score)| format!("{name}: {score}")).collect()
    }

    /// Whether no scores are known.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Session state owned by the client state machine.
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: GamePhase,
    role: Option<Role>,
    player_name: Option<String>,
    room_id: Option<String>,
    mode: GameMode,
    mode_confirmed: bool,
    roster: Vec<String>,
    scores: ScoreBoard,
    leaderboard: Vec<LeaderboardEntry>,
    join_pending: bool,
    create_pending: bool,
    capabilities: Capabilities,
}

impl Session {
    /// Fresh session in the lobby.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Role, once fixed.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Whether the local player is the host.
    pub fn is_host(&self) -> bool {
        self.role == Some(Role::Host)
    }

    /// Name the player entered.
    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    /// Room identifier, once known.
    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    /// Game mode. A local guess until [`Self::mode_confirmed`].
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Whether the server has confirmed the mode.
    pub fn mode_confirmed(&self) -> bool {
        self.mode_confirmed
    }

    /// Players in the room, in server order.
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    /// Live scores.
    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    /// Final standings. Empty until the game ends.
    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    /// Leaderboard display lines, `"<name> - <score>"`, in server order.
    pub fn leaderboard_lines(&self) -> Vec<String> {
        self.leaderboard.iter().map(|e| format!("{} - {}", e.name, e.score)).collect()
    }

    /// Whether a join was sent and the game has not started yet.
    pub fn join_pending(&self) -> bool {
        self.join_pending
    }

    /// Whether a create was sent and `ROOM_CREATED` has not arrived yet.
    pub fn create_pending(&self) -> bool {
        self.create_pending
    }

    /// Revealed host controls.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Whether a create or join may still be issued.
    pub fn can_enter_room(&self) -> bool {
        self.phase == GamePhase::Lobby && self.role.is_none() && !self.create_pending
    }

    /// Move forward to `to`. Returns the transition, or `None` if `to` is not
    /// ahead of the current phase.
    pub fn advance_phase(&mut self, to: GamePhase) -> Option<(GamePhase, GamePhase)> {
        if to <= self.phase {
            return None;
        }
        let from = self.phase;
        self.phase = to;
        if to >= GamePhase::InProgress {
            self.join_pending = false;
        }
        Some((from, to))
    }

    /// Record a create intent: name and the creator's optimistic mode.
    pub fn begin_create(&mut self, player_name: &str, mode: GameMode) {
        self.player_name = Some(player_name.to_string());
        self.mode = mode;
        self.mode_confirmed = false;
        self.create_pending = true;
    }

    /// Record a join intent. The role is fixed as guest right away.
    pub fn begin_join(&mut self, player_name: &str, room_id: &str) {
        self.player_name = Some(player_name.to_string());
        self.room_id = Some(room_id.to_string());
        self.role = Some(Role::Guest);
        self.join_pending = true;
    }

    /// Accept `ROOM_CREATED`: become host and reveal "start game".
    ///
    /// Returns `false` and changes nothing if the role is already fixed or
    /// the session has left the lobby. A pending create is settled here.
    pub fn room_created(&mut self, room_id: &str) -> bool {
        if self.phase != GamePhase::Lobby || self.role.is_some() {
            return false;
        }
        self.create_pending = false;
        self.role = Some(Role::Host);
        self.room_id = Some(room_id.to_string());
        self.capabilities.start_game = true;
        true
    }

    /// Apply the server-confirmed mode.
    pub fn confirm_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.mode_confirmed = true;
    }

    /// Reveal "draw number" for the host. Returns `true` if newly revealed.
    pub fn reveal_draw_number(&mut self) -> bool {
        if !self.is_host() || self.capabilities.draw_number {
            return false;
        }
        self.capabilities.draw_number = true;
        true
    }

    /// Replace the roster wholesale.
    pub fn replace_roster(&mut self, players: Vec<String>) {
        self.roster = players;
    }

    /// Replace the scoreboard wholesale.
    pub fn replace_scores(&mut self, scores: ScoreBoard) {
        self.scores = scores;
    }

    /// Store the final standings.
    pub fn set_leaderboard(&mut self, leaderboard: Vec<LeaderboardEntry>) {
        self.leaderboard = leaderboard;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_never_moves_backwards() {
        let mut session = Session::new();
        assert_eq!(
            session.advance_phase(GamePhase::InProgress),
            Some((GamePhase::Lobby, GamePhase::InProgress))
        );
        assert_eq!(session.advance_phase(GamePhase::WaitingRoom), None);
        assert_eq!(session.advance_phase(GamePhase::InProgress), None);
        assert_eq!(session.phase(), GamePhase::InProgress);
    }

    #[test]
    fn room_created_fixes_host_once() {
        let mut session = Session::new();
        session.begin_create("Alice", GameMode::Manual);

        assert!(session.room_created("R1"));
        assert!(!session.room_created("R2"));

        assert_eq!(session.role(), Some(Role::Host));
        assert_eq!(session.room_id(), Some("R1"));
        assert!(session.capabilities().start_game);
        assert_eq!(session.mode(), GameMode::Manual);
        assert!(!session.mode_confirmed());
    }

    #[test]
    fn pending_create_blocks_another_room_request() {
        let mut session = Session::new();
        assert!(session.can_enter_room());

        session.begin_create("Alice", GameMode::Auto);
        assert!(session.create_pending());
        assert!(!session.can_enter_room());
        assert_eq!(session.role(), None);

        assert!(session.room_created("R1"));
        assert!(!session.create_pending());
        assert_eq!(session.role(), Some(Role::Host));
        assert_eq!(session.mode(), GameMode::Auto);
    }

    #[test]
    fn guest_ignores_room_created() {
        let mut session = Session::new();
        session.begin_join("Bob", "R1");

        assert!(!session.room_created("R9"));
        assert_eq!(session.role(), Some(Role::Guest));
        assert!(session.join_pending());
        assert!(!session.reveal_draw_number());

        session.advance_phase(GamePhase::InProgress);
        assert!(!session.join_pending());
    }

    #[test]
    fn score_and_leaderboard_lines() {
        let mut update = ScoreUpdate::default();
        update.scores.insert("Zed".into(), 10);
        update.scores.insert("Amy".into(), 25);

        let board = ScoreBoard::from_update(&update);
        assert_eq!(board.lines(), vec!["Amy: 25", "Zed: 10"]);
        assert!(board.claims_won("Amy").is_empty());

        let mut session = Session::new();
        session.set_leaderboard(vec![
            LeaderboardEntry { name: "Amy".into(), score: 25 },
            LeaderboardEntry { name: "Zed".into(), score: 10 },
        ]);
        assert_eq!(session.leaderboard_lines(), vec!["Amy - 25", "Zed - 10"]);
    }
}
