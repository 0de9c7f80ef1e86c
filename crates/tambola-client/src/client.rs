//! Client state machine.
//!
//! The `Client` owns one session's state and is the only writer of it. Server
//! events go through the dispatcher half (`handle_message`), which never
//! fails: anything that does not fit the current state is logged and dropped.
//! Player intents go through the emitter half, which checks guards and either
//! emits exactly one [`ClientAction::Send`] or returns a [`ClientError`].

use std::time::Duration;

use tambola_core::{
    BannerId, BannerOutcome, CellPos, ClaimState, DrawHistory, Environment, GamePhase, ScoreBoard,
    Session, Ticket,
};
use tambola_proto::{
    ClaimKind, ClaimResult, ClaimStatus, ClientMessage, CreateRoom, GameEnded, GameMode,
    GameStarted, JoinRoom, MakeClaim, Number, ServerEvent, TicketAssigned,
};
use tracing::{debug, info, warn};

use crate::{
    error::ClientError,
    event::{Capability, ClientAction, ClientEvent},
    snapshot::{BannerView, GameSnapshot},
};

/// How long a claim-result banner stays up by default.
pub const DEFAULT_BANNER_LIFETIME: Duration = Duration::from_millis(2500);

/// Client tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Claim-result banner lifetime.
    pub banner_lifetime: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { banner_lifetime: DEFAULT_BANNER_LIFETIME }
    }
}

/// Tambola client for one game session.
pub struct Client<E: Environment> {
    /// Environment for timing.
    env: E,

    /// Tuning.
    config: ClientConfig,

    /// Phase, role, room, roster and scores.
    session: Session,

    /// Local ticket.
    ticket: Ticket,

    /// Called numbers.
    draws: DrawHistory,

    /// Claim locks and banner.
    claims: ClaimState<E::Instant>,
}

impl<E: Environment> Client<E> {
    /// Create a client in the lobby.
    pub fn new(env: E, config: ClientConfig) -> Self {
        Self {
            env,
            config,
            session: Session::new(),
            ticket: Ticket::default(),
            draws: DrawHistory::new(),
            claims: ClaimState::new(config.banner_lifetime),
        }
    }

    /// Tuning in use.
    pub fn config(&self) -> ClientConfig {
        self.config
    }

    /// Session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    /// Local ticket. Empty until assigned.
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// Called numbers.
    pub fn draws(&self) -> &DrawHistory {
        &self.draws
    }

    /// Claim locks and banner.
    pub fn claims(&self) -> &ClaimState<E::Instant> {
        &self.claims
    }

    /// Owned copy of the state for rendering.
    pub fn snapshot(&self) -> GameSnapshot {
        let session = &self.session;
        GameSnapshot {
            phase: session.phase(),
            role: session.role(),
            player_name: session.player_name().map(str::to_string),
            room_id: session.room_id().map(str::to_string),
            mode: session.mode(),
            mode_confirmed: session.mode_confirmed(),
            join_pending: session.join_pending(),
            capabilities: session.capabilities(),
            roster: session.roster().to_vec(),
            ticket: self.ticket.clone(),
            drawn: self.draws.drawn().to_vec(),
            current_number: self.draws.current(),
            claims: self.claims.catalog().entries().to_vec(),
            banner: self.claims.banner().map(|b| BannerView {
                id: b.id,
                claim: b.claim,
                outcome: b.outcome.clone(),
                text: b.text(),
            }),
            score_lines: session.scores().lines(),
            leaderboard: session.leaderboard().to_vec(),
        }
    }

    /// Process an event and return resulting actions.
    pub fn handle(
        &mut self,
        event: ClientEvent<E::Instant>,
    ) -> Result<Vec<ClientAction>, ClientError> {
        match event {
            ClientEvent::MessageReceived(message) => Ok(self.handle_message(message)),
            ClientEvent::Tick { now } => Ok(self.handle_tick(now)),
            ClientEvent::CreateRoom { player_name, mode } => {
                self.handle_create_room(&player_name, mode)
            },
            ClientEvent::JoinRoom { player_name, room_id } => {
                self.handle_join_room(&player_name, &room_id)
            },
            ClientEvent::StartGame => self.handle_start_game(),
            ClientEvent::DrawNumber => self.handle_draw_number(),
            ClientEvent::MarkCell { pos } => Ok(self.handle_mark_cell(pos)),
            ClientEvent::SubmitClaim { claim } => self.handle_submit_claim(claim),
            ClientEvent::DismissBanner { banner_id } => Ok(self.handle_dismiss_banner(banner_id)),
        }
    }

    fn handle_message(&mut self, message: ServerEvent) -> Vec<ClientAction> {
        if self.session.phase() == GamePhase::Ended {
            debug!(tag = message.tag(), "game ended, ignoring server event");
            return vec![];
        }

        match message {
            ServerEvent::RoomCreated(created) => self.handle_room_created(&created.room_id),
            ServerEvent::PlayersUpdate(update) => {
                self.session.replace_roster(update.players.clone());
                vec![ClientAction::RosterUpdated { players: update.players }]
            },
            ServerEvent::TicketAssigned(assigned) => self.handle_ticket_assigned(&assigned),
            ServerEvent::GameStarted(started) => self.handle_game_started(started),
            ServerEvent::NumberDrawn(drawn) => self.handle_number_drawn(drawn.number),
            ServerEvent::ClaimResult(result) => self.handle_claim_result(result),
            ServerEvent::ScoreUpdate(update) => {
                self.session.replace_scores(ScoreBoard::from_update(&update));
                vec![ClientAction::ScoresUpdated]
            },
            ServerEvent::GameEnded(ended) => self.handle_game_ended(ended),
        }
    }

    fn handle_room_created(&mut self, room_id: &str) -> Vec<ClientAction> {
        if !self.session.room_created(room_id) {
            warn!(
                room_id,
                phase = %self.session.phase(),
                role = ?self.session.role(),
                "unexpected ROOM_CREATED, ignoring"
            );
            return vec![];
        }

        let mut actions = vec![
            ClientAction::RoomCreated { room_id: room_id.to_string() },
            ClientAction::CapabilityRevealed(Capability::StartGame),
        ];
        actions.extend(self.advance(GamePhase::WaitingRoom));
        actions
    }

    fn handle_ticket_assigned(&mut self, assigned: &TicketAssigned) -> Vec<ClientAction> {
        if self.ticket.is_assigned() && self.ticket.matches_grid(&assigned.ticket) {
            debug!("ticket unchanged, keeping marks");
            return vec![];
        }

        self.ticket = Ticket::from_grid(&assigned.ticket);
        debug!(shape = ?self.ticket.shape(), "ticket assigned");
        vec![ClientAction::TicketAssigned]
    }

    fn handle_game_started(&mut self, started: GameStarted) -> Vec<ClientAction> {
        let phase = self.session.phase();
        if phase > GamePhase::WaitingRoom {
            debug!(%phase, "GAME_STARTED after start, ignoring");
            return vec![];
        }

        if self.session.mode() != started.mode {
            debug!(guess = %self.session.mode(), confirmed = %started.mode, "server overrode mode");
        }
        self.session.confirm_mode(started.mode);

        let mut actions = vec![ClientAction::GameStarted { mode: started.mode }];
        actions.extend(self.advance(GamePhase::InProgress));
        if self.session.reveal_draw_number() {
            actions.push(ClientAction::CapabilityRevealed(Capability::DrawNumber));
        }
        actions
    }

    fn handle_number_drawn(&mut self, number: Number) -> Vec<ClientAction> {
        if number == 0 {
            debug!("NUMBER_DRAWN with 0, ignoring");
            return vec![];
        }

        let newly_drawn = self.draws.record(number);
        let mut actions = vec![ClientAction::NumberDrawn { number, newly_drawn }];

        if self.session.mode() == GameMode::Auto {
            let cells = self.ticket.mark_number(number);
            if !cells.is_empty() {
                actions.push(ClientAction::CellsMarked { cells });
            }
        }
        actions
    }

    fn handle_claim_result(&mut self, result: ClaimResult) -> Vec<ClientAction> {
        let now = self.env.now();

        let banner_id = match result.status {
            ClaimStatus::Success => {
                let (Some(claim), Some(winner)) = (result.claim, result.player) else {
                    debug!("SUCCESS claim result without claim or player, ignoring");
                    return vec![];
                };
                let Some(banner_id) = self.claims.record_win(claim, &winner, now) else {
                    warn!(
                        claim = claim.code(),
                        %winner,
                        first = ?self.claims.catalog().winner(claim),
                        "SUCCESS for an already won claim, ignoring"
                    );
                    return vec![];
                };
                info!(claim = claim.code(), %winner, "claim won");
                return vec![
                    ClientAction::ClaimLocked { claim, winner },
                    self.banner_shown(banner_id),
                ];
            },
            ClaimStatus::Invalid => {
                self.claims.record_rejection(result.claim, BannerOutcome::Invalid, now)
            },
            ClaimStatus::Already => {
                self.claims.record_rejection(result.claim, BannerOutcome::Already, now)
            },
        };

        vec![self.banner_shown(banner_id)]
    }

    fn handle_game_ended(&mut self, ended: GameEnded) -> Vec<ClientAction> {
        self.session.set_leaderboard(ended.leaderboard.clone());
        let mut actions = vec![ClientAction::GameEnded { leaderboard: ended.leaderboard }];
        actions.extend(self.advance(GamePhase::Ended));
        actions
    }

    fn handle_tick(&mut self, now: E::Instant) -> Vec<ClientAction> {
        self.claims
            .expire_banner(now)
            .map(|banner_id| ClientAction::BannerDismissed { banner_id })
            .into_iter()
            .collect()
    }

    fn handle_dismiss_banner(&mut self, banner_id: BannerId) -> Vec<ClientAction> {
        if self.claims.dismiss_banner(banner_id) {
            return vec![ClientAction::BannerDismissed { banner_id }];
        }
        debug!(%banner_id, "stale banner timer, ignoring");
        vec![]
    }

    fn handle_create_room(
        &mut self,
        player_name: &str,
        mode: GameMode,
    ) -> Result<Vec<ClientAction>, ClientError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(ClientError::EmptyPlayerName);
        }
        self.ensure_can_enter_room()?;

        self.session.begin_create(player_name, mode);
        debug!(player_name, %mode, "creating room");

        Ok(vec![ClientAction::Send(ClientMessage::CreateRoom(CreateRoom {
            player_name: player_name.to_string(),
            mode,
        }))])
    }

    fn handle_join_room(
        &mut self,
        player_name: &str,
        room_id: &str,
    ) -> Result<Vec<ClientAction>, ClientError> {
        let player_name = player_name.trim();
        let room_id = room_id.trim();
        if player_name.is_empty() {
            return Err(ClientError::EmptyPlayerName);
        }
        if room_id.is_empty() {
            return Err(ClientError::EmptyRoomId);
        }
        self.ensure_can_enter_room()?;

        self.session.begin_join(player_name, room_id);
        debug!(player_name, room_id, "joining room");

        Ok(vec![ClientAction::Send(ClientMessage::JoinRoom(JoinRoom {
            player_name: player_name.to_string(),
            room_id: room_id.to_string(),
        }))])
    }

    fn handle_start_game(&mut self) -> Result<Vec<ClientAction>, ClientError> {
        if !self.session.is_host() {
            return Err(ClientError::NotHost { action: "start the game" });
        }
        Ok(vec![ClientAction::Send(ClientMessage::StartGame)])
    }

    fn handle_draw_number(&mut self) -> Result<Vec<ClientAction>, ClientError> {
        // Phase is advisory here; the server drops draws outside a running game
        if !self.session.is_host() {
            return Err(ClientError::NotHost { action: "draw numbers" });
        }
        Ok(vec![ClientAction::Send(ClientMessage::DrawNumber)])
    }

    fn handle_mark_cell(&mut self, pos: CellPos) -> Vec<ClientAction> {
        let phase = self.session.phase();
        if phase != GamePhase::InProgress {
            debug!(%pos, %phase, "tap outside a running game, ignoring");
            return vec![];
        }

        match self.ticket.tap(pos, self.session.mode(), self.draws.current()) {
            Ok(()) => vec![ClientAction::CellsMarked { cells: vec![pos] }],
            Err(reason) => {
                debug!(%pos, %reason, "tap not marked");
                vec![]
            },
        }
    }

    fn handle_submit_claim(&mut self, claim: ClaimKind) -> Result<Vec<ClientAction>, ClientError> {
        let phase = self.session.phase();
        if phase != GamePhase::InProgress {
            return Err(ClientError::GameNotInProgress { phase });
        }
        if let Some(winner) = self.claims.catalog().winner(claim) {
            return Err(ClientError::ClaimAlreadyWon { claim, winner: winner.to_string() });
        }

        Ok(vec![ClientAction::Send(ClientMessage::MakeClaim(MakeClaim { claim }))])
    }

    fn ensure_can_enter_room(&self) -> Result<(), ClientError> {
        if self.session.can_enter_room() {
            return Ok(());
        }
        if self.session.create_pending() {
            return Err(ClientError::CreatePending);
        }
        Err(ClientError::AlreadyInRoom { phase: self.session.phase() })
    }

    fn advance(&mut self, to: GamePhase) -> Option<ClientAction> {
        let (from, to) = self.session.advance_phase(to)?;
        info!(%from, %to, "phase changed");
        Some(ClientAction::PhaseChanged { from, to })
    }

    fn banner_shown(&self, banner_id: BannerId) -> ClientAction {
        let text = self.claims.banner().map(|b| b.text()).unwrap_or_default();
        ClientAction::BannerShown { banner_id, text, lifetime: self.config.banner_lifetime }
    }
}
