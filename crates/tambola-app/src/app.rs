//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the interactive
//! state of the application completely decoupled from I/O and protocol
//! mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Edits the command line and turns submitted commands into actions.
//! - Holds the latest [`GameSnapshot`] and the screen it calls for.
//! - Stores terminal dimensions to handle resize events.
//! - Tracks high-level connection state for UI feedback.

use tambola_client::GameSnapshot;
use tambola_core::CellPos;
use tambola_proto::{ClaimKind, GameMode};

use crate::{
    AppAction, AppEvent, ConnectionState, InputState, KeyInput, Screen,
    commands::{self, Command},
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Connection state.
    state: ConnectionState,
    /// Server address for connection.
    server_addr: String,
    /// Latest game state from the bridge.
    game: GameSnapshot,
    /// Screen derived from `game`.
    screen: Screen,
    /// Command line.
    input: InputState,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
    /// Name used when a command leaves it out.
    default_name: Option<String>,
}

impl App {
    /// Create a new App with the given server address.
    pub fn new(server_addr: String) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            server_addr,
            game: GameSnapshot::default(),
            screen: Screen::Lobby,
            input: InputState::new(),
            terminal_size: (80, 24),
            status_message: None,
            default_name: None,
        }
    }

    /// Use `name` for `/create` and `/join` when the command omits it.
    ///
    /// A blank name clears the default.
    pub fn set_default_name(&mut self, name: impl Into<String>) {
        self.default_name = Some(name.into()).filter(|n| !n.trim().is_empty());
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Connecting => {
                self.state = ConnectionState::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::Connected => {
                self.state = ConnectionState::Connected;
                vec![AppAction::Render]
            },
            AppEvent::Disconnected => {
                self.state = ConnectionState::Disconnected;
                self.status_message = Some("Disconnected from server".into());
                vec![AppAction::Render]
            },
            AppEvent::GameUpdated(game) => {
                let screen = Screen::for_game(&game);
                if screen != self.screen {
                    self.status_message = None;
                }
                self.screen = screen;
                self.game = *game;
                vec![AppAction::Render]
            },
            AppEvent::Rejected { reason } => {
                self.status_message = Some(reason);
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Enter => self.handle_enter(),
            KeyInput::Esc => self.quit(),
            _ => {
                self.input.edit(key);
                vec![AppAction::Render]
            },
        }
    }

    /// Handle Enter key - parse command and call App API.
    fn handle_enter(&mut self) -> Vec<AppAction> {
        let text = self.input.take();
        if text.trim().is_empty() {
            return vec![AppAction::Render];
        }

        match commands::parse(&text) {
            Command::Create { name, mode } => {
                let name = self.name_or_default(name);
                self.create_room(name, mode)
            },
            Command::Join { name, room_id } => {
                let name = self.name_or_default(name);
                self.join_room(name, room_id)
            },
            Command::Start => self.start_game(),
            Command::Draw => self.draw_number(),
            Command::Mark { pos } => self.mark_cell(pos),
            Command::Claim { claim } => self.submit_claim(claim),
            Command::Quit => self.quit(),
            Command::Unknown { input } => {
                self.status_message = Some(format!("Unknown command: {input}"));
                vec![AppAction::Render]
            },
            Command::InvalidArgs { command, error } => {
                self.status_message = Some(format!("/{command}: {error}"));
                vec![AppAction::Render]
            },
        }
    }

    fn name_or_default(&self, name: String) -> String {
        match &self.default_name {
            Some(default) if name.is_empty() => default.clone(),
            _ => name,
        }
    }

    /// Initiate connection to the server.
    pub fn connect(&mut self) -> Vec<AppAction> {
        self.state = ConnectionState::Connecting;
        vec![AppAction::Connect { server_addr: self.server_addr.clone() }, AppAction::Render]
    }

    /// Open a room as host.
    pub fn create_room(&mut self, player_name: String, mode: GameMode) -> Vec<AppAction> {
        self.status_message = Some(format!("Creating {mode} room..."));
        vec![AppAction::CreateRoom { player_name, mode }, AppAction::Render]
    }

    /// Join an existing room.
    pub fn join_room(&mut self, player_name: String, room_id: String) -> Vec<AppAction> {
        self.status_message = Some(format!("Joining room {room_id}..."));
        vec![AppAction::JoinRoom { player_name, room_id }, AppAction::Render]
    }

    /// Start the game.
    pub fn start_game(&self) -> Vec<AppAction> {
        vec![AppAction::StartGame, AppAction::Render]
    }

    /// Draw the next number.
    pub fn draw_number(&self) -> Vec<AppAction> {
        vec![AppAction::DrawNumber, AppAction::Render]
    }

    /// Tap a ticket cell.
    pub fn mark_cell(&self, pos: CellPos) -> Vec<AppAction> {
        vec![AppAction::MarkCell { pos }, AppAction::Render]
    }

    /// Claim a pattern.
    pub fn submit_claim(&mut self, claim: ClaimKind) -> Vec<AppAction> {
        self.status_message = Some(format!("Claiming {claim}..."));
        vec![AppAction::SubmitClaim { claim }, AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Name used when a command leaves it out.
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// Server address.
    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    /// Latest game state.
    pub fn game(&self) -> &GameSnapshot {
        &self.game
    }

    /// Screen to draw.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Command line.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
