//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::collections::HashSet;

use tambola_core::Ticket;
use tambola_proto::Number;

use super::{ClientSnapshot, Invariant, InvariantResult, SystemSnapshot, Violation};

fn each_client(
    state: &SystemSnapshot,
    name: &'static str,
    check: impl Fn(&ClientSnapshot) -> Result<(), String>,
) -> InvariantResult {
    for client in &state.clients {
        if let Err(message) = check(client) {
            let message = format!("client {}: {message}", client.id);
            return Err(Violation { invariant: name, message });
        }
    }
    Ok(())
}

/// The phase never moves backwards.
pub struct PhaseMonotonic;

impl Invariant for PhaseMonotonic {
    fn name(&self) -> &'static str {
        "PhaseMonotonic"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        each_client(state, self.name(), |client| match &client.previous {
            Some(before) if client.game.phase < before.phase => {
                Err(format!("phase went from {} to {}", before.phase, client.game.phase))
            },
            _ => Ok(()),
        })
    }
}

/// Each called number appears once, and the history only grows at its end.
pub struct DrawnNumbersUnique;

impl Invariant for DrawnNumbersUnique {
    fn name(&self) -> &'static str {
        "DrawnNumbersUnique"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        each_client(state, self.name(), |client| {
            let mut seen = HashSet::new();
            if let Some(dup) = client.game.drawn.iter().find(|n| !seen.insert(**n)) {
                return Err(format!("{dup} drawn twice"));
            }
            if let Some(before) = &client.previous
                && !client.game.drawn.starts_with(&before.drawn)
            {
                return Err(format!(
                    "draw history rewritten: {:?} -> {:?}",
                    before.drawn, client.game.drawn
                ));
            }
            Ok(())
        })
    }
}

/// The current number is one of the called numbers.
pub struct CurrentNumberDrawn;

impl Invariant for CurrentNumberDrawn {
    fn name(&self) -> &'static str {
        "CurrentNumberDrawn"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        each_client(state, self.name(), |client| match client.game.current_number {
            Some(current) if !client.game.drawn.contains(&current) => {
                Err(format!("current number {current} missing from {:?}", client.game.drawn))
            },
            _ => Ok(()),
        })
    }
}

/// Every marked cell prints a called number.
pub struct MarkedCellsWereDrawn;

impl Invariant for MarkedCellsWereDrawn {
    fn name(&self) -> &'static str {
        "MarkedCellsWereDrawn"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        each_client(state, self.name(), |client| {
            let game = &client.game;
            for pos in game.ticket.marked_positions() {
                let value = game.ticket.cell(pos).and_then(|cell| cell.value());
                if !value.is_some_and(|v| game.drawn.contains(&v)) {
                    return Err(format!("cell {pos} marked but {value:?} was never drawn"));
                }
            }
            Ok(())
        })
    }
}

/// A won claim keeps its winner.
pub struct WonClaimsStable;

impl Invariant for WonClaimsStable {
    fn name(&self) -> &'static str {
        "WonClaimsStable"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        each_client(state, self.name(), |client| {
            let Some(before) = &client.previous else {
                return Ok(());
            };
            for old in before.claims.iter().filter(|e| e.is_won()) {
                let now = client.game.winner(old.kind);
                if now != old.winner.as_deref() {
                    let code = old.kind.code();
                    return Err(format!("{code} winner {:?} became {now:?}", old.winner));
                }
            }
            Ok(())
        })
    }
}

/// Marks are only ever added to the printed grid.
///
/// Between two observations the grid either prints the same numbers, in which
/// case every earlier mark survives, or it was replaced wholesale and carries
/// no marks yet.
pub struct TicketGridStable;

impl Invariant for TicketGridStable {
    fn name(&self) -> &'static str {
        "TicketGridStable"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        each_client(state, self.name(), |client| {
            let Some(before) = &client.previous else {
                return Ok(());
            };
            let ticket = &client.game.ticket;
            let marked = ticket.marked_positions();
            if ticket.matches_grid(&printed(&before.ticket)) {
                if let Some(lost) =
                    before.ticket.marked_positions().into_iter().find(|p| !marked.contains(p))
                {
                    return Err(format!("mark at {lost} was removed"));
                }
            } else if !marked.is_empty() {
                return Err(format!("replacement ticket arrived with marks at {marked:?}"));
            }
            Ok(())
        })
    }
}

fn printed(ticket: &Ticket) -> Vec<Vec<Number>> {
    ticket.rows().iter().map(|row| row.iter().map(|c| c.value().unwrap_or(0)).collect()).collect()
}

/// After GAME_ENDED nothing but the banner changes.
pub struct EndedIsTerminal;

impl Invariant for EndedIsTerminal {
    fn name(&self) -> &'static str {
        "EndedIsTerminal"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        each_client(state, self.name(), |client| {
            let Some(before) = &client.previous else {
                return Ok(());
            };
            if before.phase != tambola_client::GamePhase::Ended {
                return Ok(());
            }
            let game = &client.game;
            let frozen = game.phase == before.phase
                && game.ticket == before.ticket
                && game.drawn == before.drawn
                && game.current_number == before.current_number
                && game.claims == before.claims
                && game.score_lines == before.score_lines
                && game.leaderboard == before.leaderboard
                && game.roster == before.roster;
            if frozen { Ok(()) } else { Err("state changed after the game ended".into()) }
        })
    }
}

#[cfg(test)]
mod tests {
    use tambola_client::{ClaimKind, GamePhase, GameSnapshot};
    use tambola_core::ClaimCatalog;

    use super::*;

    fn pair(before: GameSnapshot, after: GameSnapshot) -> SystemSnapshot {
        SystemSnapshot::single(ClientSnapshot::new(1, after).with_previous(before))
    }

    #[test]
    fn phase_regression_is_caught() {
        let before = GameSnapshot { phase: GamePhase::InProgress, ..GameSnapshot::default() };
        let after = GameSnapshot { phase: GamePhase::WaitingRoom, ..GameSnapshot::default() };

        let violation = PhaseMonotonic.check(&pair(before, after));
        assert!(violation.is_err_and(|v| v.message.contains("IN_PROGRESS")));
    }

    #[test]
    fn duplicate_draw_is_caught() {
        let game = GameSnapshot { drawn: vec![4, 9, 4], ..GameSnapshot::default() };
        let state = SystemSnapshot::single(ClientSnapshot::new(1, game));
        assert!(DrawnNumbersUnique.check(&state).is_err());
    }

    #[test]
    fn undrawn_current_is_caught() {
        let game =
            GameSnapshot { drawn: vec![4], current_number: Some(9), ..GameSnapshot::default() };
        let state = SystemSnapshot::single(ClientSnapshot::new(1, game));
        assert!(CurrentNumberDrawn.check(&state).is_err());
    }

    #[test]
    fn changed_winner_is_caught() {
        let mut won = ClaimCatalog::new();
        won.lock(ClaimKind::Quick5, "Alice");
        let mut stolen = ClaimCatalog::new();
        stolen.lock(ClaimKind::Quick5, "Bob");

        let before = GameSnapshot { claims: won.entries().to_vec(), ..GameSnapshot::default() };
        let after = GameSnapshot { claims: stolen.entries().to_vec(), ..GameSnapshot::default() };
        assert!(WonClaimsStable.check(&pair(before, after)).is_err());
    }

    #[test]
    fn removed_mark_is_caught() {
        let mut marked = Ticket::from_grid(&[vec![1, 0, 21]]);
        marked.mark_number(21);
        let before = GameSnapshot { ticket: marked, ..GameSnapshot::default() };
        let after = GameSnapshot {
            ticket: Ticket::from_grid(&[vec![1, 0, 21]]),
            ..GameSnapshot::default()
        };
        assert!(TicketGridStable.check(&pair(before, after)).is_err());
    }

    #[test]
    fn replacement_ticket_starts_unmarked() {
        let before = GameSnapshot {
            ticket: Ticket::from_grid(&[vec![1, 0, 21]]),
            ..GameSnapshot::default()
        };
        let mut replaced = Ticket::from_grid(&[vec![2, 0, 22]]);
        let after = GameSnapshot { ticket: replaced.clone(), ..GameSnapshot::default() };
        assert!(TicketGridStable.check(&pair(before.clone(), after)).is_ok());

        replaced.mark_number(22);
        let after = GameSnapshot { ticket: replaced, ..GameSnapshot::default() };
        assert!(TicketGridStable.check(&pair(before, after)).is_err());
    }

    #[test]
    fn ended_game_may_only_lose_its_banner() {
        let ended = GameSnapshot {
            phase: GamePhase::Ended,
            drawn: vec![3],
            current_number: Some(3),
            ..GameSnapshot::default()
        };
        assert!(EndedIsTerminal.check(&pair(ended.clone(), ended.clone())).is_ok());

        let drawn_more = GameSnapshot { drawn: vec![3, 8], ..ended.clone() };
        assert!(EndedIsTerminal.check(&pair(ended, drawn_more)).is_err());
    }
}
