//! Fuzz target for client event sequences
//!
//! Drives one client with arbitrary intents, server events and clock
//! movement, and checks the client invariants after every step.
//!
//! # Invariants
//!
//! - NEVER panic on any event order
//! - Phase only moves forward; ENDED freezes the game state
//! - Draws stay unique; marks only ever cover drawn numbers
//! - A won claim keeps its winner

#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tambola_client::{CellPos, Client, ClientConfig, ClientEvent};
use tambola_core::Environment;
use tambola_harness::{ClientHistory, InvariantRegistry, SimEnv, SystemSnapshot};
use tambola_proto::{
    ClaimKind, ClaimResult, ClaimStatus, GameEnded, GameMode, GameStarted, LeaderboardEntry,
    NumberDrawn, PlayersUpdate, RoomCreated, ScoreUpdate, ServerEvent, TicketAssigned,
};

#[derive(Debug, Arbitrary)]
enum Step {
    Create { name: String, manual: bool },
    Join { name: String, room: String },
    Start,
    Draw,
    Mark { row: u8, col: u8 },
    Claim { claim: u8 },
    RoomCreated { room: String },
    Players { players: Vec<String> },
    Ticket { rows: Vec<Vec<u8>> },
    GameStarted { manual: bool },
    Number { number: u8 },
    ClaimResult { status: u8, claim: Option<u8>, player: Option<String> },
    Scores { scores: Vec<(String, u32)> },
    Ended { names: Vec<String> },
    Advance { millis: u16 },
}

fn claim(index: u8) -> ClaimKind {
    ClaimKind::ALL[usize::from(index) % ClaimKind::ALL.len()]
}

fn mode(manual: bool) -> GameMode {
    if manual { GameMode::Manual } else { GameMode::Auto }
}

fn to_event(step: Step, env: &SimEnv) -> ClientEvent<<SimEnv as Environment>::Instant> {
    let message = match step {
        Step::Create { name, manual } => {
            return ClientEvent::CreateRoom { player_name: name, mode: mode(manual) };
        },
        Step::Join { name, room } => {
            return ClientEvent::JoinRoom { player_name: name, room_id: room };
        },
        Step::Start => return ClientEvent::StartGame,
        Step::Draw => return ClientEvent::DrawNumber,
        Step::Mark { row, col } => {
            return ClientEvent::MarkCell { pos: CellPos::new(usize::from(row), usize::from(col)) };
        },
        Step::Claim { claim: index } => return ClientEvent::SubmitClaim { claim: claim(index) },
        Step::Advance { millis } => {
            env.advance(Duration::from_millis(u64::from(millis)));
            return ClientEvent::Tick { now: env.now() };
        },
        Step::RoomCreated { room } => ServerEvent::RoomCreated(RoomCreated { room_id: room }),
        Step::Players { players } => ServerEvent::PlayersUpdate(PlayersUpdate { players }),
        Step::Ticket { rows } => {
            let ticket =
                rows.into_iter().take(5).map(|r| r.into_iter().take(12).collect()).collect();
            ServerEvent::TicketAssigned(TicketAssigned { ticket })
        },
        Step::GameStarted { manual } => {
            ServerEvent::GameStarted(GameStarted { mode: mode(manual) })
        },
        Step::Number { number } => ServerEvent::NumberDrawn(NumberDrawn { number }),
        Step::ClaimResult { status, claim: index, player } => {
            let status = match status % 3 {
                0 => ClaimStatus::Success,
                1 => ClaimStatus::Invalid,
                _ => ClaimStatus::Already,
            };
            ServerEvent::ClaimResult(ClaimResult { status, claim: index.map(claim), player })
        },
        Step::Scores { scores } => ServerEvent::ScoreUpdate(ScoreUpdate {
            scores: scores.into_iter().collect(),
            claims_won: Default::default(),
        }),
        Step::Ended { names } => ServerEvent::GameEnded(GameEnded {
            leaderboard: names
                .into_iter()
                .enumerate()
                .map(|(i, name)| LeaderboardEntry { name, score: i as u32 })
                .collect(),
        }),
    };
    ClientEvent::MessageReceived(message)
}

fuzz_target!(|steps: Vec<Step>| {
    let env = SimEnv::new();
    let mut client = Client::new(env.clone(), ClientConfig::default());
    let invariants = InvariantRegistry::standard();
    let mut history = ClientHistory::new(0);

    for step in steps.into_iter().take(256) {
        let _ = client.handle(to_event(step, &env));

        let snapshot = SystemSnapshot::single(history.observe(client.snapshot()));
        invariants.assert_all(&snapshot, "fuzz step");
    }
});
