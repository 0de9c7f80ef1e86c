//! Client-state invariants for simulated games.
//!
//! Every check reads a [`SystemSnapshot`]: each client's current
//! [`GameSnapshot`](tambola_client::GameSnapshot), paired with the one seen
//! before the last delivered event. Checks that compare the two (phase order,
//! append-only draws, stable winners) need that previous view; the rest look
//! at the current state only.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let mut history = ClientHistory::new(0);
//! let snapshot = SystemSnapshot::single(history.observe(client.snapshot()));
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

pub use checks::{
    CurrentNumberDrawn, DrawnNumbersUnique, EndedIsTerminal, MarkedCellsWereDrawn,
    PhaseMonotonic, TicketGridStable, WonClaimsStable,
};
pub use snapshot::{ClientHistory, ClientSnapshot, SystemSnapshot};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property of client state that holds after every processed event.
pub trait Invariant: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against the current state.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Ordered set of invariants run together after each step.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with every client invariant.
    ///
    /// Includes:
    /// - [`PhaseMonotonic`]: phases never go backwards
    /// - [`DrawnNumbersUnique`]: called numbers are unique and append-only
    /// - [`CurrentNumberDrawn`]: the current number was called
    /// - [`MarkedCellsWereDrawn`]: marks only cover called numbers
    /// - [`WonClaimsStable`]: winners never change
    /// - [`TicketGridStable`]: marks are never lost on an unchanged grid
    /// - [`EndedIsTerminal`]: nothing changes after the game ends
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(PhaseMonotonic);
        registry.add(DrawnNumbersUnique);
        registry.add(CurrentNumberDrawn);
        registry.add(MarkedCellsWereDrawn);
        registry.add(WonClaimsStable);
        registry.add(TicketGridStable);
        registry.add(EndedIsTerminal);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given state.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking on first violation.
    ///
    /// Use this in tests where you want immediate failure with context.
    #[allow(clippy::panic, reason = "test assertion helper")]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Names of the registered invariants, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.invariants.iter().map(|inv| inv.name()).collect()
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tambola_client::GameSnapshot;

    use super::*;

    #[test]
    fn standard_registry_has_invariants() {
        let registry = InvariantRegistry::standard();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.names()[0], "PhaseMonotonic");
    }

    #[test]
    fn empty_snapshot_passes_invariants() {
        let registry = InvariantRegistry::standard();
        assert!(registry.check_all(&SystemSnapshot::empty()).is_ok());
    }

    #[test]
    fn fresh_client_passes_invariants() {
        let registry = InvariantRegistry::standard();
        let snapshot = SystemSnapshot::single(ClientSnapshot::new(0, GameSnapshot::default()));
        assert!(registry.check_all(&snapshot).is_ok());
    }
}
