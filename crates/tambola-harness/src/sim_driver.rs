//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`tambola_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Every clone shares one queue of injected input and captured output, so a
//! test keeps a handle while the runtime owns the driver.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tambola_app::{App, AppEvent, Driver, KeyInput};
use tambola_core::Environment;

use crate::{
    SimEnv,
    invariants::{ClientHistory, InvariantRegistry, SystemSnapshot},
    sim_env::SimInstant,
};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Shared state for event injection.
///
/// This allows injection from outside async contexts.
#[derive(Default)]
struct SharedState {
    pending_events: VecDeque<AppEvent>,
    incoming: VecDeque<String>,
    outgoing: Vec<String>,
    connected: bool,
    refuse_connect: bool,
    renders: usize,
    invariants: Option<Arc<InvariantRegistry>>,
    history: ClientHistory,
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`tambola_app::Runtime`]
/// orchestration code runs in both production TUI and simulation tests.
#[derive(Clone)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    env: SimEnv,
}

impl SimDriver {
    /// Create a new simulation driver reading time from `env`.
    pub fn new(env: SimEnv) -> Self {
        Self { state: Arc::new(Mutex::new(SharedState::default())), env }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(self, registry: InvariantRegistry) -> Self {
        self.lock().invariants = Some(Arc::new(registry));
        self
    }

    /// Make the next `connect` fail.
    pub fn refuse_connections(&self) {
        self.lock().refuse_connect = true;
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.lock().pending_events.push_back(event);
    }

    /// Inject typed characters followed by Enter.
    pub fn type_line(&self, line: &str) {
        let mut state = self.lock();
        state.pending_events.extend(line.chars().map(|c| AppEvent::Key(KeyInput::Char(c))));
        state.pending_events.push_back(AppEvent::Key(KeyInput::Enter));
    }

    /// Inject a text message from the server.
    pub fn inject_text(&self, text: impl Into<String>) {
        self.lock().incoming.push_back(text.into());
    }

    /// Inject a tick event.
    pub fn inject_tick(&self) {
        self.lock().pending_events.push_back(AppEvent::Tick);
    }

    /// Close the connection from the server side.
    pub fn drop_connection(&self) {
        self.lock().connected = false;
    }

    /// Take all captured outgoing messages.
    pub fn take_outgoing(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().outgoing)
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        let state = self.lock();
        !state.pending_events.is_empty() || (state.connected && !state.incoming.is_empty())
    }

    /// Number of frames rendered so far.
    pub fn render_count(&self) -> usize {
        self.lock().renders
    }

    /// Check invariants against App state.
    pub fn check_invariants(&self, app: &App, context: &str) {
        let mut state = self.lock();
        let Some(registry) = state.invariants.clone() else {
            return;
        };
        let client = state.history.observe(app.game().clone());
        drop(state);
        registry.assert_all(&SystemSnapshot::single(client), context);
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = SimInstant;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        Ok(self.lock().pending_events.pop_front())
    }

    async fn send_text(&mut self, text: String) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if !state.connected {
            return Err(SimDriverError("not connected".into()));
        }
        state.outgoing.push(text);
        Ok(())
    }

    async fn recv_text(&mut self) -> Option<String> {
        let mut state = self.lock();
        if !state.connected {
            return None;
        }
        state.incoming.pop_front()
    }

    async fn connect(&mut self, addr: &str) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if state.refuse_connect {
            state.refuse_connect = false;
            return Err(SimDriverError(format!("connection to {addr} refused")));
        }
        state.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.lock().connected
    }

    fn now(&self) -> Self::Instant {
        self.env.now()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.lock().renders += 1;
        self.check_invariants(app, "after render");
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().connected = false;
    }
}
