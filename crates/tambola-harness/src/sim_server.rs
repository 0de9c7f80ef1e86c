//! Reference game authority for simulation.
//!
//! `SimServer` is a sans-IO implementation of the room server's rules: it
//! consumes client messages tagged with a connection id and returns the
//! server events to deliver, each addressed to one connection. Tests own the
//! routing, so any interleaving, drop or duplication can be reproduced
//! exactly from a seed.
//!
//! Rules:
//! - Room codes are 5 characters from `A-Z0-9`.
//! - Tickets are 3 rows by 9 columns, 5 numbers per row, column `c` holding
//!   numbers from its decade (`c*10+1 ..= c*10+10`, last column up to 90).
//! - Only the host may start; any player of a started room may draw.
//! - Draws are unique in `1..=90`.
//! - Claims are validated against the claimant's ticket and the draws so far.
//!   TAMBOLA ends the game with a score-sorted leaderboard.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use rand::{Rng, SeedableRng, seq::index};
use rand_chacha::ChaCha8Rng;
use tambola_proto::{
    ClaimKind, ClaimResult, ClaimStatus, ClientMessage, GameEnded, GameMode, GameStarted,
    LeaderboardEntry, Number, NumberDrawn, PlayersUpdate, ProtocolError, RoomCreated,
    ScoreUpdate, ServerEvent, TicketAssigned, TicketGrid,
};
use tracing::{debug, info};

/// Identifies one client connection.
pub type ConnectionId = u64;

/// Highest number that can be drawn.
pub const MAX_NUMBER: Number = 90;

const ROOM_ID_LEN: usize = 5;
const ROOM_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ROWS: usize = 3;
const COLUMNS: usize = 9;
const NUMBERS_PER_ROW: usize = 5;

/// A server event addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    /// Recipient.
    pub to: ConnectionId,
    /// Event to deliver.
    pub event: ServerEvent,
}

impl Outbound {
    /// Wire text of the event.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        self.event.encode()
    }
}

/// Server-side state of one room.
#[derive(Debug, Clone)]
pub struct SimRoom {
    host: ConnectionId,
    players: Vec<(ConnectionId, String)>,
    mode: GameMode,
    tickets: BTreeMap<ConnectionId, TicketGrid>,
    drawn: Vec<Number>,
    rigged: VecDeque<Number>,
    scores: BTreeMap<String, u32>,
    claims_won: BTreeMap<String, Vec<ClaimKind>>,
    claimed: BTreeSet<ClaimKind>,
    started: bool,
    ended: bool,
}

impl SimRoom {
    fn new(host: ConnectionId, player_name: String, mode: GameMode) -> Self {
        Self {
            host,
            players: vec![(host, player_name)],
            mode,
            tickets: BTreeMap::new(),
            drawn: Vec::new(),
            rigged: VecDeque::new(),
            scores: BTreeMap::new(),
            claims_won: BTreeMap::new(),
            claimed: BTreeSet::new(),
            started: false,
            ended: false,
        }
    }

    /// Connection that created the room.
    pub fn host(&self) -> ConnectionId {
        self.host
    }

    /// Player names in join order.
    pub fn players(&self) -> Vec<String> {
        self.players.iter().map(|(_, name)| name.clone()).collect()
    }

    /// Marking mode chosen by the host.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Ticket dealt to `conn`.
    pub fn ticket(&self, conn: ConnectionId) -> Option<&TicketGrid> {
        self.tickets.get(&conn)
    }

    /// Numbers drawn so far, in order.
    pub fn drawn(&self) -> &[Number] {
        &self.drawn
    }

    /// Score per player.
    pub fn scores(&self) -> &BTreeMap<String, u32> {
        &self.scores
    }

    /// Whether the host has started the game.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether TAMBOLA has been won.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.players.iter().map(|(conn, _)| *conn)
    }

    fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut seen = BTreeSet::new();
        let mut entries: Vec<_> = self
            .players
            .iter()
            .filter(|(_, name)| seen.insert(name.as_str()))
            .filter_map(|(_, name)| {
                let score = *self.scores.get(name)?;
                Some(LeaderboardEntry { name: name.clone(), score })
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries
    }
}

/// In-memory room server with seeded randomness.
pub struct SimServer {
    rng: ChaCha8Rng,
    rooms: BTreeMap<String, SimRoom>,
    members: HashMap<ConnectionId, (String, String)>,
}

impl SimServer {
    /// Server whose room codes, tickets and draws follow from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            rooms: BTreeMap::new(),
            members: HashMap::new(),
        }
    }

    /// Room by code.
    pub fn room(&self, room_id: &str) -> Option<&SimRoom> {
        self.rooms.get(room_id)
    }

    /// Make the next draws in `room_id` produce `numbers`, skipping any that
    /// were already drawn.
    pub fn rig_draws(&mut self, room_id: &str, numbers: impl IntoIterator<Item = Number>) {
        if let Some(room) = self.rooms.get_mut(room_id) {
            room.rigged.extend(numbers.into_iter().filter(|n| (1..=MAX_NUMBER).contains(n)));
        }
    }

    /// Forget a closed connection and drop its player from the roster.
    pub fn disconnect(&mut self, conn: ConnectionId) {
        if let Some((room_id, _)) = self.members.remove(&conn)
            && let Some(room) = self.rooms.get_mut(&room_id)
        {
            room.players.retain(|(c, _)| *c != conn);
        }
    }

    /// Handle one wire message from `conn`.
    ///
    /// Malformed messages are ignored like any other message the server
    /// cannot act on.
    pub fn handle_text(&mut self, conn: ConnectionId, text: &str) -> Vec<Outbound> {
        match ClientMessage::decode(text) {
            Ok(message) => self.handle(conn, message),
            Err(e) => {
                debug!(conn, error = %e, "malformed client message, ignoring");
                vec![]
            },
        }
    }

    /// Handle one message from `conn`.
    pub fn handle(&mut self, conn: ConnectionId, message: ClientMessage) -> Vec<Outbound> {
        match message {
            ClientMessage::CreateRoom(create) => {
                self.create_room(conn, create.player_name, create.mode)
            },
            ClientMessage::JoinRoom(join) => self.join_room(conn, join.player_name, &join.room_id),
            ClientMessage::StartGame => self.start_game(conn),
            ClientMessage::DrawNumber => self.draw_number(conn),
            ClientMessage::MakeClaim(claim) => self.make_claim(conn, claim.claim),
        }
    }

    fn create_room(
        &mut self,
        conn: ConnectionId,
        player_name: String,
        mode: GameMode,
    ) -> Vec<Outbound> {
        let room_id = self.fresh_room_id();
        info!(conn, %room_id, %player_name, %mode, "room created");

        let room = SimRoom::new(conn, player_name.clone(), mode);
        let mut out = vec![Outbound {
            to: conn,
            event: ServerEvent::RoomCreated(RoomCreated { room_id: room_id.clone() }),
        }];
        out.extend(broadcast(&room, &roster(&room)));

        self.members.insert(conn, (room_id.clone(), player_name));
        self.rooms.insert(room_id, room);
        out
    }

    fn join_room(
        &mut self,
        conn: ConnectionId,
        player_name: String,
        room_id: &str,
    ) -> Vec<Outbound> {
        let Some(room) = self.rooms.get_mut(room_id) else {
            debug!(conn, room_id, "join for unknown room, ignoring");
            return vec![];
        };
        room.players.push((conn, player_name.clone()));
        self.members.insert(conn, (room_id.to_string(), player_name));
        broadcast(room, &roster(room))
    }

    fn start_game(&mut self, conn: ConnectionId) -> Vec<Outbound> {
        let Some((room_id, _)) = self.members.get(&conn) else {
            return vec![];
        };
        let Some(room) = self.rooms.get_mut(room_id) else {
            return vec![];
        };
        if room.host != conn || room.started {
            debug!(conn, "START_GAME refused");
            return vec![];
        }
        room.started = true;

        let mut out = Vec::new();
        for (player, name) in room.players.clone() {
            let ticket = generate_ticket(&mut self.rng);
            room.tickets.insert(player, ticket.clone());
            room.scores.insert(name.clone(), 0);
            room.claims_won.insert(name, Vec::new());
            let event = ServerEvent::TicketAssigned(TicketAssigned { ticket });
            out.push(Outbound { to: player, event });
        }
        out.extend(broadcast(room, &ServerEvent::GameStarted(GameStarted { mode: room.mode })));
        out
    }

    fn draw_number(&mut self, conn: ConnectionId) -> Vec<Outbound> {
        let Some((room_id, _)) = self.members.get(&conn) else {
            return vec![];
        };
        let Some(room) = self.rooms.get_mut(room_id) else {
            return vec![];
        };
        if !room.started || room.ended || room.drawn.len() >= usize::from(MAX_NUMBER) {
            return vec![];
        }

        let number = loop {
            let candidate = match room.rigged.pop_front() {
                Some(n) => n,
                None => self.rng.gen_range(1..=MAX_NUMBER),
            };
            if !room.drawn.contains(&candidate) {
                break candidate;
            }
        };
        room.drawn.push(number);
        broadcast(room, &ServerEvent::NumberDrawn(NumberDrawn { number }))
    }

    fn make_claim(&mut self, conn: ConnectionId, claim: ClaimKind) -> Vec<Outbound> {
        let Some((room_id, player)) = self.members.get(&conn).cloned() else {
            return vec![];
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return vec![];
        };
        if !room.started {
            return vec![];
        }

        let reply = |status| Outbound {
            to: conn,
            event: ServerEvent::ClaimResult(ClaimResult {
                status,
                claim: Some(claim),
                player: None,
            }),
        };
        if room.claimed.contains(&claim) {
            return vec![reply(ClaimStatus::Already)];
        }
        let drawn = &room.drawn;
        let valid =
            room.tickets.get(&conn).is_some_and(|ticket| validate_claim(claim, ticket, drawn));
        if !valid {
            return vec![reply(ClaimStatus::Invalid)];
        }

        info!(conn, %player, claim = claim.code(), "claim won");
        room.claimed.insert(claim);
        *room.scores.entry(player.clone()).or_default() += 1;
        room.claims_won.entry(player.clone()).or_default().push(claim);

        let mut out = broadcast(
            room,
            &ServerEvent::ClaimResult(ClaimResult {
                status: ClaimStatus::Success,
                claim: Some(claim),
                player: Some(player),
            }),
        );
        out.extend(broadcast(
            room,
            &ServerEvent::ScoreUpdate(ScoreUpdate {
                scores: room.scores.clone(),
                claims_won: room.claims_won.clone(),
            }),
        ));

        if claim == ClaimKind::Tambola {
            room.ended = true;
            info!(%room_id, "game ended");
            let ended = ServerEvent::GameEnded(GameEnded { leaderboard: room.leaderboard() });
            out.extend(broadcast(room, &ended));
        }
        out
    }

    fn fresh_room_id(&mut self) -> String {
        loop {
            let id: String = (0..ROOM_ID_LEN)
                .map(|_| char::from(ROOM_ID_CHARSET[self.rng.gen_range(0..ROOM_ID_CHARSET.len())]))
                .collect();
            if !self.rooms.contains_key(&id) {
                return id;
            }
        }
    }
}

fn roster(room: &SimRoom) -> ServerEvent {
    ServerEvent::PlayersUpdate(PlayersUpdate { players: room.players() })
}

fn broadcast(room: &SimRoom, event: &ServerEvent) -> Vec<Outbound> {
    room.connections().map(|to| Outbound { to, event: event.clone() }).collect()
}

/// Deal a 3x9 ticket with 5 numbers per row, each column from its decade.
pub fn generate_ticket(rng: &mut impl Rng) -> TicketGrid {
    let mut filled = [[false; COLUMNS]; ROWS];
    for row in &mut filled {
        for col in index::sample(rng, COLUMNS, NUMBERS_PER_ROW) {
            row[col] = true;
        }
    }

    let mut ticket = vec![vec![0; COLUMNS]; ROWS];
    for col in 0..COLUMNS {
        let rows: Vec<usize> = (0..ROWS).filter(|r| filled[*r][col]).collect();
        if rows.is_empty() {
            continue;
        }
        let start = col * 10 + 1;
        let end = if col == COLUMNS - 1 { usize::from(MAX_NUMBER) } else { start + 9 };
        let mut numbers: Vec<Number> = index::sample(rng, end - start + 1, rows.len())
            .into_iter()
            .map(|offset| (start + offset) as Number)
            .collect();
        numbers.sort_unstable();
        for (row, number) in rows.into_iter().zip(numbers) {
            ticket[row][col] = number;
        }
    }
    ticket
}

/// Whether `claim` holds for `ticket` given the numbers drawn so far.
pub fn validate_claim(claim: ClaimKind, ticket: &TicketGrid, drawn: &[Number]) -> bool {
    let all_drawn = |numbers: Vec<Number>| numbers.iter().all(|n| drawn.contains(n));
    let row = |r: usize| -> Vec<Number> {
        ticket.get(r).into_iter().flatten().copied().filter(|n| *n != 0).collect()
    };

    match claim {
        ClaimKind::Quick5 => {
            ticket.iter().flatten().filter(|n| **n != 0 && drawn.contains(*n)).count() >= 5
        },
        ClaimKind::FirstLine => all_drawn(row(0)),
        ClaimKind::SecondLine => all_drawn(row(1)),
        ClaimKind::ThirdLine => all_drawn(row(2)),
        ClaimKind::FourCorners => {
            let cell = |r: usize, c: usize| ticket.get(r).and_then(|row| row.get(c)).copied();
            let last = COLUMNS - 1;
            let corners = [cell(0, 0), cell(0, last), cell(2, 0), cell(2, last)];
            all_drawn(corners.into_iter().flatten().filter(|n| *n != 0).collect())
        },
        ClaimKind::Tambola => {
            all_drawn(ticket.iter().flatten().copied().filter(|n| *n != 0).collect())
        },
    }
}

#[cfg(test)]
mod tests {
    use tambola_proto::{CreateRoom, JoinRoom, MakeClaim};

    use super::*;

    fn create(server: &mut SimServer, conn: ConnectionId) -> String {
        let out = server.handle(
            conn,
            ClientMessage::CreateRoom(CreateRoom {
                player_name: "Alice".into(),
                mode: GameMode::Auto,
            }),
        );
        match &out[0].event {
            ServerEvent::RoomCreated(created) => created.room_id.clone(),
            other => panic!("expected ROOM_CREATED, got {other:?}"),
        }
    }

    #[test]
    fn tickets_follow_the_column_layout() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let ticket = generate_ticket(&mut rng);
            assert_eq!(ticket.len(), ROWS);
            for row in &ticket {
                assert_eq!(row.len(), COLUMNS);
                assert_eq!(row.iter().filter(|n| **n != 0).count(), NUMBERS_PER_ROW);
            }
            for col in 0..COLUMNS {
                let column: Vec<Number> =
                    ticket.iter().map(|r| r[col]).filter(|n| *n != 0).collect();
                assert!(column.windows(2).all(|w| w[0] < w[1]), "column {col} not ascending");
                let low = (col * 10 + 1) as Number;
                let high = if col == 8 { 90 } else { low + 9 };
                assert!(column.iter().all(|n| (low..=high).contains(n)));
            }
        }
    }

    #[test]
    fn room_codes_are_five_alphanumerics() {
        let mut server = SimServer::with_seed(1);
        let room_id = create(&mut server, 1);
        assert_eq!(room_id.len(), 5);
        assert!(room_id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn only_host_starts() {
        let mut server = SimServer::with_seed(1);
        let room_id = create(&mut server, 1);
        let join = JoinRoom { player_name: "Bob".into(), room_id: room_id.clone() };
        server.handle(2, ClientMessage::JoinRoom(join));

        assert!(server.handle(2, ClientMessage::StartGame).is_empty());

        let out = server.handle(1, ClientMessage::StartGame);
        let tickets =
            out.iter().filter(|o| matches!(o.event, ServerEvent::TicketAssigned(_))).count();
        assert_eq!(tickets, 2);
        assert!(server.room(&room_id).is_some_and(SimRoom::is_started));
    }

    #[test]
    fn draws_are_unique_until_exhausted() {
        let mut server = SimServer::with_seed(3);
        let room_id = create(&mut server, 1);
        server.handle(1, ClientMessage::StartGame);

        for _ in 0..100 {
            server.handle(1, ClientMessage::DrawNumber);
        }
        let mut drawn = server.room(&room_id).map(|r| r.drawn().to_vec()).unwrap_or_default();
        assert_eq!(drawn.len(), 90);
        drawn.sort_unstable();
        drawn.dedup();
        assert_eq!(drawn.len(), 90);
    }

    #[test]
    fn claim_validation() {
        let ticket = vec![
            vec![4, 0, 21, 0, 45, 0, 63, 0, 88],
            vec![0, 12, 0, 33, 0, 51, 0, 77, 0],
            vec![9, 0, 0, 38, 47, 0, 66, 0, 90],
        ];
        assert!(validate_claim(ClaimKind::FirstLine, &ticket, &[4, 21, 45, 63, 88]));
        assert!(!validate_claim(ClaimKind::SecondLine, &ticket, &[4, 21, 45, 63, 88]));
        assert!(validate_claim(ClaimKind::Quick5, &ticket, &[4, 21, 45, 63, 88]));
        assert!(validate_claim(ClaimKind::FourCorners, &ticket, &[4, 88, 9, 90]));
        assert!(!validate_claim(ClaimKind::Tambola, &ticket, &[4, 88, 9, 90]));
    }

    #[test]
    fn second_claim_of_a_pattern_is_already() {
        let mut server = SimServer::with_seed(5);
        let room_id = create(&mut server, 1);
        server.handle(1, ClientMessage::StartGame);
        let numbers: Vec<Number> = (1..=90).collect();
        server.rig_draws(&room_id, numbers);
        for _ in 0..90 {
            server.handle(1, ClientMessage::DrawNumber);
        }

        let claim = ClientMessage::MakeClaim(MakeClaim { claim: ClaimKind::Quick5 });
        let first = server.handle(1, claim.clone());
        assert!(matches!(
            &first[0].event,
            ServerEvent::ClaimResult(ClaimResult { status: ClaimStatus::Success, .. })
        ));

        let second = server.handle(1, claim);
        assert!(matches!(
            second.as_slice(),
            [Outbound {
                event: ServerEvent::ClaimResult(ClaimResult { status: ClaimStatus::Already, .. }),
                ..
            }]
        ));
    }

    #[test]
    fn tambola_ends_the_game() {
        let mut server = SimServer::with_seed(9);
        let room_id = create(&mut server, 1);
        server.handle(1, ClientMessage::StartGame);
        server.rig_draws(&room_id, 1..=90);
        for _ in 0..90 {
            server.handle(1, ClientMessage::DrawNumber);
        }

        let out =
            server.handle(1, ClientMessage::MakeClaim(MakeClaim { claim: ClaimKind::Tambola }));
        let ended = out.iter().find_map(|o| match &o.event {
            ServerEvent::GameEnded(ended) => Some(ended.leaderboard.clone()),
            _ => None,
        });
        assert_eq!(ended, Some(vec![LeaderboardEntry { name: "Alice".into(), score: 1 }]));
        assert!(server.handle(1, ClientMessage::DrawNumber).is_empty());
    }
}
