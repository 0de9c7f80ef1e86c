//! Multi-client table simulation.
//!
//! Several [`Client`]s sit at one [`SimServer`]. Every message crosses the
//! wire as JSON text in both directions, and every delivered server event is
//! followed by an invariant check on the receiving client. Delivery order is
//! FIFO per table, which matches a single server broadcasting over ordered
//! connections.

use std::{collections::VecDeque, time::Duration};

use tambola_client::{Client, ClientAction, ClientConfig, ClientEvent, GameSnapshot};
use tambola_core::Environment;
use tambola_proto::ServerEvent;
use tracing::trace;

use crate::{
    SimEnv,
    invariants::{ClientHistory, InvariantRegistry, SystemSnapshot},
    sim_env::SimInstant,
    sim_server::{ConnectionId, SimServer},
};

/// Upper bound on deliveries per [`TestTable::settle`] call.
const MAX_DELIVERIES: usize = 10_000;

/// Simulated table of clients sharing one server and one clock.
pub struct TestTable {
    /// Shared virtual clock.
    pub env: SimEnv,
    /// Reference server.
    pub server: SimServer,
    clients: Vec<Client<SimEnv>>,
    histories: Vec<ClientHistory>,
    invariants: InvariantRegistry,
    to_server: VecDeque<(ConnectionId, String)>,
    to_clients: VecDeque<(ConnectionId, String)>,
}

impl TestTable {
    /// Table of `players` clients with default tuning.
    pub fn new(seed: u64, players: usize) -> Self {
        Self::with_config(seed, players, ClientConfig::default())
    }

    /// Table of `players` clients with the given tuning.
    pub fn with_config(seed: u64, players: usize, config: ClientConfig) -> Self {
        let env = SimEnv::new();
        let clients = (0..players).map(|_| Client::new(env.clone(), config)).collect();
        let histories = (0..players).map(|i| ClientHistory::new(i as u64)).collect();
        Self {
            env,
            server: SimServer::with_seed(seed),
            clients,
            histories,
            invariants: InvariantRegistry::standard(),
            to_server: VecDeque::new(),
            to_clients: VecDeque::new(),
        }
    }

    /// Number of clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether the table has no clients.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Client at seat `idx`.
    pub fn client(&self, idx: usize) -> &Client<SimEnv> {
        &self.clients[idx]
    }

    /// Game state of seat `idx`.
    pub fn snapshot(&self, idx: usize) -> GameSnapshot {
        self.clients[idx].snapshot()
    }

    /// Connection id the server sees for seat `idx`.
    pub fn connection(idx: usize) -> ConnectionId {
        idx as ConnectionId + 1
    }

    /// Room code the first client learned, if any.
    pub fn room_id(&self) -> Option<String> {
        self.clients.iter().find_map(|c| c.session().room_id().map(str::to_string))
    }

    /// Apply a local intent at seat `idx` and queue what it sends.
    ///
    /// Client-side refusals are returned as `Err` with the error text.
    pub fn intent(
        &mut self,
        idx: usize,
        event: ClientEvent<SimInstant>,
    ) -> Result<Vec<ClientAction>, String> {
        let actions = self.clients[idx].handle(event).map_err(|e| e.to_string())?;
        self.queue_sends(idx, &actions)?;
        self.check(idx, "after intent")?;
        Ok(actions)
    }

    /// Deliver queued messages in both directions until the table is quiet.
    pub fn settle(&mut self) -> Result<(), String> {
        for _ in 0..MAX_DELIVERIES {
            if let Some((conn, text)) = self.to_server.pop_front() {
                for outbound in self.server.handle_text(conn, &text) {
                    let text = outbound.encode().map_err(|e| format!("server encode: {e}"))?;
                    self.to_clients.push_back((outbound.to, text));
                }
            } else if let Some((conn, text)) = self.to_clients.pop_front() {
                self.deliver(conn, &text)?;
            } else {
                return Ok(());
            }
        }
        Err(format!("table did not settle after {MAX_DELIVERIES} deliveries"))
    }

    /// Deliver an arbitrary server event straight to seat `idx`.
    pub fn inject(&mut self, idx: usize, event: &ServerEvent) -> Result<(), String> {
        let text = event.encode().map_err(|e| format!("encode: {e}"))?;
        self.deliver(Self::connection(idx), &text)
    }

    /// Advance the shared clock and tick every client.
    pub fn advance(&mut self, by: Duration) -> Result<(), String> {
        self.env.advance(by);
        let now = self.env.now();
        for idx in 0..self.clients.len() {
            self.intent(idx, ClientEvent::Tick { now })?;
        }
        Ok(())
    }

    fn deliver(&mut self, conn: ConnectionId, text: &str) -> Result<(), String> {
        let Some(idx) = (conn as usize).checked_sub(1).filter(|i| *i < self.clients.len()) else {
            return Ok(());
        };
        let Some(event) = ServerEvent::decode(text).map_err(|e| format!("decode: {e}"))? else {
            return Ok(());
        };
        trace!(seat = idx, tag = event.tag(), "deliver");
        let actions = self.clients[idx]
            .handle(ClientEvent::MessageReceived(event))
            .map_err(|e| format!("seat {idx}: {e}"))?;
        self.queue_sends(idx, &actions)?;
        self.check(idx, "after delivery")
    }

    fn queue_sends(&mut self, idx: usize, actions: &[ClientAction]) -> Result<(), String> {
        for action in actions {
            if let ClientAction::Send(message) = action {
                let text = message.encode().map_err(|e| format!("client encode: {e}"))?;
                self.to_server.push_back((Self::connection(idx), text));
            }
        }
        Ok(())
    }

    fn check(&mut self, idx: usize, context: &str) -> Result<(), String> {
        let client = self.histories[idx].observe(self.clients[idx].snapshot());
        self.invariants.check_all(&SystemSnapshot::single(client)).map_err(|violations| {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            format!("seat {idx} {context}: {}", messages.join("; "))
        })
    }
}
