//! Protocol-to-Application translation layer.
//!
//! The [`Bridge`] wraps the low-level [`tambola_client::Client`] and adapts
//! it to the high-level application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts high-level [`crate::AppAction`] into client intents.
//! - Decodes inbound wire text into server events for the client.
//! - Accumulates outgoing wire text to be sent by the driver in the next I/O
//!   cycle.
//! - Interprets results from the client and converts them back into
//!   [`crate::AppEvent`]s to update the UI.
//! - Manages time ticks generically to support both real-time execution and
//!   deterministic simulation.

use tambola_client::{Client, ClientAction, ClientConfig, ClientError, ClientEvent, GameSnapshot};
use tambola_core::Environment;
use tambola_proto::ServerEvent;
use tracing::{debug, trace, warn};

use crate::{AppAction, AppEvent};

/// Bridge between App and Client protocol logic.
///
/// Generic over Environment to support both production and simulation.
/// The Instant type is determined by the Environment's associated type.
pub struct Bridge<E: Environment> {
    client: Client<E>,
    outgoing: Vec<String>,
}

impl<E: Environment> Bridge<E> {
    /// Create a new Bridge with the given environment and client tuning.
    pub fn new(env: E, config: ClientConfig) -> Self {
        Self { client: Client::new(env, config), outgoing: Vec::new() }
    }

    /// Underlying client.
    pub fn client(&self) -> &Client<E> {
        &self.client
    }

    /// Current game state.
    pub fn snapshot(&self) -> GameSnapshot {
        self.client.snapshot()
    }

    /// Process an App action and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        let event = match action {
            AppAction::CreateRoom { player_name, mode } => {
                ClientEvent::CreateRoom { player_name, mode }
            },
            AppAction::JoinRoom { player_name, room_id } => {
                ClientEvent::JoinRoom { player_name, room_id }
            },
            AppAction::StartGame => ClientEvent::StartGame,
            AppAction::DrawNumber => ClientEvent::DrawNumber,
            AppAction::MarkCell { pos } => ClientEvent::MarkCell { pos },
            AppAction::SubmitClaim { claim } => ClientEvent::SubmitClaim { claim },
            AppAction::Render | AppAction::Quit | AppAction::Connect { .. } => return vec![],
        };
        // Accepted intents update the session even when they only send
        let result = self.client.handle(event);
        self.handle_client_result(result, true)
    }

    /// Handle one text message from the server.
    ///
    /// Undecodable messages and unknown tags are dropped.
    pub fn handle_text(&mut self, text: &str) -> Vec<AppEvent> {
        match ServerEvent::decode(text) {
            Ok(Some(message)) => {
                trace!(tag = message.tag(), "server event");
                let result = self.client.handle(ClientEvent::MessageReceived(message));
                self.handle_client_result(result, false)
            },
            Ok(None) => {
                debug!(%text, "unknown server event, ignoring");
                vec![]
            },
            Err(e) => {
                debug!(error = %e, %text, "malformed server message, ignoring");
                vec![]
            },
        }
    }

    /// Process a time tick.
    pub fn handle_tick(&mut self, now: E::Instant) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::Tick { now });
        self.handle_client_result(result, false)
    }

    /// Take pending outgoing messages.
    pub fn take_outgoing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outgoing)
    }

    fn handle_client_result(
        &mut self,
        result: Result<Vec<ClientAction>, ClientError>,
        always_update: bool,
    ) -> Vec<AppEvent> {
        match result {
            Ok(actions) => self.process_client_actions(actions, always_update),
            Err(e) => {
                debug!(error = %e, "intent rejected");
                vec![AppEvent::Rejected { reason: e.to_string() }]
            },
        }
    }

    fn process_client_actions(
        &mut self,
        actions: Vec<ClientAction>,
        always_update: bool,
    ) -> Vec<AppEvent> {
        let mut events = Vec::new();
        let mut state_changed = always_update;

        for action in actions {
            match action {
                ClientAction::Send(message) => match message.encode() {
                    Ok(text) => self.outgoing.push(text),
                    Err(e) => {
                        warn!(error = %e, tag = message.tag(), "failed to encode message");
                        events.push(AppEvent::Error { message: e.to_string() });
                    },
                },
                ClientAction::BannerShown { banner_id, text, .. } => {
                    debug!(%banner_id, %text, "banner shown");
                    state_changed = true;
                },
                other => {
                    trace!(action = ?other, "client action");
                    state_changed = true;
                },
            }
        }

        if state_changed {
            events.push(AppEvent::GameUpdated(Box::new(self.client.snapshot())));
        }
        events
    }
}
