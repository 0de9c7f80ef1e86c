//! Terminal UI for Tambola
//!
//! A thin shell over [`tambola_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`tambola_app::Runtime`].
//!
//! This crate only handles terminal rendering and the WebSocket transport.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod system_env;
pub mod terminal;
pub mod transport;
pub mod ui;

pub use system_env::SystemEnv;
pub use tambola_app::{App, AppAction, AppEvent, Bridge, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
pub use transport::{Connection, TransportError};
