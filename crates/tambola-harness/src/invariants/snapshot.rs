//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the system at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks. Each client snapshot also carries the state it
//! had before the last step so that history properties can be checked.

use tambola_client::GameSnapshot;

/// Snapshot of the entire system state.
///
/// Contains observable state from one or more clients for invariant checking.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Per-client state snapshots.
    pub clients: Vec<ClientSnapshot>,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no clients).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a snapshot with a single client.
    pub fn single(client: ClientSnapshot) -> Self {
        Self { clients: vec![client] }
    }

    /// Create a snapshot from multiple clients.
    pub fn from_clients(clients: Vec<ClientSnapshot>) -> Self {
        Self { clients }
    }

    /// Add a client snapshot.
    pub fn add_client(&mut self, client: ClientSnapshot) {
        self.clients.push(client);
    }
}

/// Snapshot of a single client's observable state.
#[derive(Debug, Clone, Default)]
pub struct ClientSnapshot {
    /// Client identifier.
    pub id: u64,
    /// State after the last step.
    pub game: GameSnapshot,
    /// State before the last step. `None` for the first observation.
    pub previous: Option<GameSnapshot>,
}

impl ClientSnapshot {
    /// Create a snapshot with no history.
    pub fn new(id: u64, game: GameSnapshot) -> Self {
        Self { id, game, previous: None }
    }

    /// Attach the state observed before the last step.
    #[must_use]
    pub fn with_previous(mut self, previous: GameSnapshot) -> Self {
        self.previous = Some(previous);
        self
    }
}

/// Rolling observer that pairs each new state with the one before it.
#[derive(Debug, Clone, Default)]
pub struct ClientHistory {
    id: u64,
    last: Option<GameSnapshot>,
}

impl ClientHistory {
    /// Start observing client `id`.
    pub fn new(id: u64) -> Self {
        Self { id, last: None }
    }

    /// Record a new observation and return it paired with the previous one.
    pub fn observe(&mut self, game: GameSnapshot) -> ClientSnapshot {
        let previous = self.last.replace(game.clone());
        ClientSnapshot { id: self.id, game, previous }
    }
}
