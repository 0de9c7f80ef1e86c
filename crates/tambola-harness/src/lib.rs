//! Deterministic simulation harness for Tambola client testing.
//!
//! A manually advanced clock, an in-memory reference server and a simulated
//! I/O driver, so the production client and runtime can be exercised without
//! sockets, terminals or wall-clock time.
//!
//! # Table Simulation
//!
//! [`TestTable`] seats several clients at one [`SimServer`] and routes JSON
//! text between them, checking invariants after every delivery.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the client
//! invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_env;
pub mod sim_server;
pub mod table;

pub use invariants::{
    ClientHistory, ClientSnapshot, CurrentNumberDrawn, DrawnNumbersUnique, EndedIsTerminal,
    Invariant, InvariantRegistry, InvariantResult, MarkedCellsWereDrawn, PhaseMonotonic,
    SystemSnapshot, TicketGridStable, Violation, WonClaimsStable,
};
pub use sim_driver::{SimDriver, SimDriverError};
pub use sim_env::{SimEnv, SimInstant};
pub use sim_server::{ConnectionId, Outbound, SimRoom, SimServer};
pub use table::TestTable;
