//! Property-based tests for whole tables.
//!
//! Arbitrary player behavior against the reference server must never break
//! a client invariant on any seat, and the seats must agree on shared state
//! once the table settles.

use std::time::Duration;

use proptest::prelude::*;
use tambola_client::{CellPos, ClaimKind, ClientEvent, GameMode, GamePhase};
use tambola_harness::TestTable;

const SEATS: usize = 3;

#[derive(Debug, Clone)]
enum Move {
    Draw,
    Tap { seat: usize, row: usize, col: usize },
    Claim { seat: usize, claim: ClaimKind },
    Advance(u64),
    Settle,
}

fn move_strategy() -> impl Strategy<Value = Move> {
    prop_oneof![
        5 => Just(Move::Draw),
        3 => (0..SEATS, 0usize..3, 0usize..9)
            .prop_map(|(seat, row, col)| Move::Tap { seat, row, col }),
        2 => (0..SEATS, prop::sample::select(ClaimKind::ALL.to_vec()))
            .prop_map(|(seat, claim)| Move::Claim { seat, claim }),
        1 => (0u64..4000).prop_map(Move::Advance),
        2 => Just(Move::Settle),
    ]
}

fn start(seed: u64, mode: GameMode) -> TestTable {
    let mut table = TestTable::new(seed, SEATS);
    table.intent(0, ClientEvent::CreateRoom { player_name: "p0".into(), mode }).unwrap();
    table.settle().unwrap();
    let room_id = table.room_id().unwrap();
    for seat in 1..SEATS {
        let player_name = format!("p{seat}");
        let join = ClientEvent::JoinRoom { player_name, room_id: room_id.clone() };
        table.intent(seat, join).unwrap();
    }
    table.settle().unwrap();
    table.intent(0, ClientEvent::StartGame).unwrap();
    table.settle().unwrap();
    table
}

proptest! {
    #[test]
    fn prop_tables_keep_invariants(
        seed in any::<u64>(),
        manual in any::<bool>(),
        moves in prop::collection::vec(move_strategy(), 0..150),
    ) {
        let mode = if manual { GameMode::Manual } else { GameMode::Auto };
        let mut table = start(seed, mode);

        for step in moves {
            let result = match step {
                Move::Draw => table.intent(0, ClientEvent::DrawNumber).map(|_| ()),
                Move::Tap { seat, row, col } => {
                    let pos = CellPos::new(row, col);
                    table.intent(seat, ClientEvent::MarkCell { pos }).map(|_| ())
                },
                // Client refusals (already won, game over) are fine
                Move::Claim { seat, claim } => {
                    match table.intent(seat, ClientEvent::SubmitClaim { claim }) {
                        Err(e) if e.starts_with("seat") => Err(e),
                        _ => Ok(()),
                    }
                },
                Move::Advance(ms) => table.advance(Duration::from_millis(ms)),
                Move::Settle => table.settle(),
            };
            prop_assert!(result.is_ok(), "{:?}", result);
        }
        prop_assert!(table.settle().is_ok());

        let reference = table.snapshot(0);
        for seat in 1..SEATS {
            let game = table.snapshot(seat);
            prop_assert_eq!(&game.drawn, &reference.drawn);
            prop_assert_eq!(&game.claims, &reference.claims);
            prop_assert_eq!(game.phase, reference.phase);
            prop_assert_eq!(&game.score_lines, &reference.score_lines);
        }
        if reference.phase == GamePhase::Ended {
            prop_assert!(reference.winner(ClaimKind::Tambola).is_some());
        }
    }
}
