//! Property tests: arbitrary server event streams never break client state.

use std::time::Duration;

use proptest::prelude::*;
use tambola_client::{
    CellPos, ClaimKind, Client, ClientConfig, ClientEvent, Environment, GameMode, GamePhase,
    GameSnapshot,
};
use tambola_harness::SimEnv;
use tambola_proto::{
    ClaimResult, ClaimStatus, GameEnded, GameStarted, NumberDrawn, PlayersUpdate, RoomCreated,
    ServerEvent, TicketAssigned,
};

#[derive(Debug, Clone)]
enum Step {
    Server(ServerEvent),
    Tap(usize, usize),
    Claim(ClaimKind),
    Advance(u64),
}

fn arb_claim() -> impl Strategy<Value = ClaimKind> {
    prop::sample::select(ClaimKind::ALL.to_vec())
}

fn arb_mode() -> impl Strategy<Value = GameMode> {
    prop_oneof![Just(GameMode::Auto), Just(GameMode::Manual)]
}

fn arb_server_event() -> impl Strategy<Value = ServerEvent> {
    prop_oneof![
        1 => "[A-Z0-9]{5}".prop_map(|room_id| ServerEvent::RoomCreated(RoomCreated { room_id })),
        1 => prop::collection::vec("[a-z]{1,5}", 0..4)
            .prop_map(|players| ServerEvent::PlayersUpdate(PlayersUpdate { players })),
        1 => prop::collection::vec(prop::collection::vec(0u8..=90, 9), 3)
            .prop_map(|ticket| ServerEvent::TicketAssigned(TicketAssigned { ticket })),
        1 => arb_mode().prop_map(|mode| ServerEvent::GameStarted(GameStarted { mode })),
        4 => (0u8..=90).prop_map(|number| ServerEvent::NumberDrawn(NumberDrawn { number })),
        2 => (
            prop_oneof![
                Just(ClaimStatus::Success),
                Just(ClaimStatus::Invalid),
                Just(ClaimStatus::Already),
            ],
            prop::option::of(arb_claim()),
            prop::option::of("[a-z]{1,5}"),
        )
            .prop_map(|(status, claim, player)| {
                ServerEvent::ClaimResult(ClaimResult { status, claim, player })
            }),
        1 => Just(ServerEvent::GameEnded(GameEnded { leaderboard: vec![] })),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => arb_server_event().prop_map(Step::Server),
        2 => (0usize..3, 0usize..9).prop_map(|(r, c)| Step::Tap(r, c)),
        1 => arb_claim().prop_map(Step::Claim),
        1 => (0u64..3000).prop_map(Step::Advance),
    ]
}

fn check_step(before: &GameSnapshot, after: &GameSnapshot) -> Result<(), TestCaseError> {
    prop_assert!(after.phase >= before.phase, "phase went backwards");

    let mut seen = std::collections::HashSet::new();
    prop_assert!(after.drawn.iter().all(|n| seen.insert(*n)), "duplicate draw");
    prop_assert!(after.drawn.starts_with(&before.drawn), "draw history rewritten");

    if let Some(current) = after.current_number {
        prop_assert!(after.drawn.contains(&current));
    }

    for (old, new) in before.claims.iter().zip(&after.claims) {
        if old.winner.is_some() {
            prop_assert_eq!(&old.winner, &new.winner, "winner changed");
        }
    }

    for row in after.ticket.rows() {
        for cell in row {
            if cell.is_marked() {
                prop_assert!(cell.value().is_some_and(|v| after.drawn.contains(&v)));
            }
        }
    }

    if before.phase == GamePhase::Ended {
        prop_assert_eq!(&before.ticket, &after.ticket);
        prop_assert_eq!(&before.drawn, &after.drawn);
        prop_assert_eq!(&before.claims, &after.claims);
    }
    Ok(())
}

proptest! {
    #[test]
    fn arbitrary_streams_keep_state_consistent(
        join in any::<bool>(),
        steps in prop::collection::vec(arb_step(), 0..120),
    ) {
        let env = SimEnv::new();
        let mut client = Client::new(env.clone(), ClientConfig::default());

        let intent = if join {
            ClientEvent::JoinRoom { player_name: "Bob".into(), room_id: "ABCDE".into() }
        } else {
            ClientEvent::CreateRoom { player_name: "Alice".into(), mode: GameMode::Manual }
        };
        prop_assert!(client.handle(intent).is_ok());

        for step in steps {
            let before = client.snapshot();
            match step {
                Step::Server(message) => {
                    prop_assert!(client.handle(ClientEvent::MessageReceived(message)).is_ok());
                },
                Step::Tap(row, col) => {
                    let pos = CellPos::new(row, col);
                    let result = client.handle(ClientEvent::MarkCell { pos });
                    prop_assert!(result.is_ok());
                },
                Step::Claim(claim) => {
                    // Guards may refuse; either way nothing changes locally
                    let _ = client.handle(ClientEvent::SubmitClaim { claim });
                    prop_assert_eq!(&client.snapshot(), &before);
                },
                Step::Advance(ms) => {
                    env.advance(Duration::from_millis(ms));
                    let result = client.handle(ClientEvent::Tick { now: env.now() });
                    prop_assert!(result.is_ok());
                },
            }
            check_step(&before, &client.snapshot())?;
        }
    }
}
