//! Property tests for the ticket, draw and claim components.

use std::time::{Duration, Instant};

use proptest::prelude::*;
use tambola_core::{BannerOutcome, CellPos, ClaimState, DrawHistory, Ticket};
use tambola_proto::{ClaimKind, GameMode, Number};

fn arb_grid() -> impl Strategy<Value = Vec<Vec<Number>>> {
    prop::collection::vec(prop::collection::vec(0u8..=90, 9), 3)
}

fn arb_claim() -> impl Strategy<Value = ClaimKind> {
    prop::sample::select(ClaimKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn draws_are_unique_in_first_seen_order(numbers in prop::collection::vec(1u8..=90, 0..200)) {
        let mut draws = DrawHistory::new();
        for &n in &numbers {
            draws.record(n);
        }

        let mut expected = Vec::new();
        for &n in &numbers {
            if !expected.contains(&n) {
                expected.push(n);
            }
        }
        prop_assert_eq!(draws.drawn(), expected.as_slice());
        prop_assert_eq!(draws.current(), numbers.last().copied());
    }

    #[test]
    fn auto_marking_is_exact(
        grid in arb_grid(),
        numbers in prop::collection::vec(1u8..=90, 0..60),
    ) {
        let mut ticket = Ticket::from_grid(&grid);
        for &n in &numbers {
            ticket.mark_number(n);
        }

        for (r, row) in ticket.rows().iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let should_mark = grid[r][c] != 0 && numbers.contains(&grid[r][c]);
                prop_assert_eq!(cell.is_marked(), should_mark, "cell {}", CellPos::new(r, c));
            }
        }
        prop_assert_eq!(ticket.shape(), vec![9, 9, 9]);
    }

    #[test]
    fn manual_taps_only_mark_current_number(
        grid in arb_grid(),
        taps in prop::collection::vec((0usize..4, 0usize..10, prop::option::of(1u8..=90)), 0..80),
    ) {
        let mut ticket = Ticket::from_grid(&grid);
        for (row, col, current) in taps {
            let pos = CellPos::new(row, col);
            let before = ticket.cell(pos);
            if ticket.tap(pos, GameMode::Manual, current).is_ok() {
                prop_assert_eq!(before.and_then(|c| c.value()), current);
                prop_assert!(before.is_some_and(|c| !c.is_marked()));
            }
        }
        prop_assert!(ticket.matches_grid(&grid));
    }

    #[test]
    fn won_claims_never_change_winner(
        results in prop::collection::vec((arb_claim(), "[a-z]{1,6}", any::<bool>()), 0..40),
    ) {
        let start = Instant::now();
        let mut claims = ClaimState::new(Duration::from_millis(2500));
        let mut first = std::collections::HashMap::new();

        for (i, (kind, player, success)) in results.into_iter().enumerate() {
            let now = start + Duration::from_millis(100 * i as u64);
            if success {
                claims.record_win(kind, &player, now);
                first.entry(kind).or_insert(player);
            } else {
                claims.record_rejection(Some(kind), BannerOutcome::Invalid, now);
            }
        }

        for kind in ClaimKind::ALL {
            prop_assert_eq!(claims.catalog().winner(kind), first.get(&kind).map(String::as_str));
            prop_assert_eq!(claims.can_submit(kind), !first.contains_key(&kind));
        }
    }
}
