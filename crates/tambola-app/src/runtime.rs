//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: Protocol bridge to Client
//! - [`Driver`]: Platform-specific I/O

use std::{ops::Sub, time::Duration};

use tambola_client::ClientConfig;
use tambola_core::Environment;
use tracing::{debug, info, warn};

use crate::{App, AppAction, AppEvent, Bridge, Driver};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing the client's clock
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    app: App,
    bridge: Bridge<E>,
    server_addr: String,
    connected: bool,
}

impl<D, E> Runtime<D, E>
where
    D: Driver<Instant = E::Instant>,
    E: Environment,
    D::Instant: Sub<Output = Duration>,
{
    /// Create a new runtime with the given driver and environment.
    pub fn new(driver: D, env: E, config: ClientConfig, server_addr: String) -> Self {
        let app = App::new(server_addr.clone());
        let bridge = Bridge::new(env, config);
        Self { driver, app, bridge, server_addr, connected: false }
    }

    /// Run the main event loop.
    ///
    /// This is the core orchestration loop that:
    /// 1. Polls for input events from the driver
    /// 2. Receives text messages from the server
    /// 3. Processes actions and events between App and Bridge
    /// 4. Sends outgoing messages through the driver
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;
        self.connect().await?;

        loop {
            let should_quit = self.process_cycle().await?;
            if should_quit {
                break;
            }
        }

        info!("shutting down");
        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    pub async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        if let Some(event) = self.driver.poll_event().await? {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }

        if self.driver.is_connected() {
            while let Some(text) = self.driver.recv_text().await {
                let events = self.bridge.handle_text(&text);
                self.send_outgoing().await?;
                if self.process_bridge_events(events).await? {
                    return Ok(true);
                }
            }
        }

        if self.connected && !self.driver.is_connected() {
            warn!(server = %self.server_addr, "connection lost");
            self.connected = false;
            if self.process_bridge_events(vec![AppEvent::Disconnected]).await? {
                return Ok(true);
            }
        }

        let now = self.driver.now();
        let events = self.bridge.handle_tick(now);
        if self.process_bridge_events(events).await? {
            return Ok(true);
        }

        Ok(false)
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    pub async fn process_actions(
        &mut self,
        initial_actions: Vec<AppAction>,
    ) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Connect { server_addr } => {
                        self.server_addr = server_addr;
                        self.connect().await?;
                    },

                    // Protocol operations go through the bridge
                    AppAction::CreateRoom { .. }
                    | AppAction::JoinRoom { .. }
                    | AppAction::StartGame
                    | AppAction::DrawNumber
                    | AppAction::MarkCell { .. }
                    | AppAction::SubmitClaim { .. } => {
                        let events = self.bridge.process_app_action(action);
                        for event in events {
                            let new_actions = self.app.handle(event);
                            pending_actions.extend(new_actions);
                        }
                        self.send_outgoing().await?;
                    },
                }
            }
        }
        Ok(false)
    }

    /// Process events from Bridge back to App.
    async fn process_bridge_events(&mut self, events: Vec<AppEvent>) -> Result<bool, D::Error> {
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Connect to the server.
    async fn connect(&mut self) -> Result<(), D::Error> {
        let actions = self.app.handle(AppEvent::Connecting);
        self.render_sync(actions);

        self.driver.connect(&self.server_addr).await?;
        info!(server = %self.server_addr, "connected");
        self.connected = true;

        let actions = self.app.handle(AppEvent::Connected);
        self.render_sync(actions);
        Ok(())
    }

    /// Apply render-only actions during connection setup.
    fn render_sync(&mut self, actions: Vec<AppAction>) {
        for action in actions {
            match action {
                AppAction::Render => {
                    if let Err(e) = self.driver.render(&self.app) {
                        warn!(error = %e, "failed to render");
                    }
                },
                other => debug!(action = ?other, "ignoring action during connect"),
            }
        }
    }

    /// Send all pending outgoing messages to the server.
    pub async fn send_outgoing(&mut self) -> Result<(), D::Error> {
        let messages = self.bridge.take_outgoing();
        for text in messages {
            self.driver.send_text(text).await?;
        }
        Ok(())
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Bridge
    pub fn bridge(&self) -> &Bridge<E> {
        &self.bridge
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the Driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
