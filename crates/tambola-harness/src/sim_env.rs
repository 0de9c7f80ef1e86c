//! Simulated environment with a manually advanced clock.
//!
//! Every clone of a [`SimEnv`] shares one clock, so a test can hold a handle,
//! hand clones to clients and drivers, and move time forward for all of them
//! at once. Nothing advances the clock on its own.

use std::{
    future::Future,
    ops::{Add, Sub},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tambola_core::Environment;

/// Virtual instant: nanoseconds since the simulation started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimInstant(u64);

impl SimInstant {
    /// Time since the simulation started.
    pub fn since_start(self) -> Duration {
        Duration::from_nanos(self.0)
    }
}

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(rhs.0))
    }
}

impl Add<Duration> for SimInstant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0.saturating_add(duration_nanos(rhs)))
    }
}

/// Deterministic environment for tests.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    clock: Arc<AtomicU64>,
}

impl SimEnv {
    /// Environment at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the shared clock forward.
    pub fn advance(&self, by: Duration) {
        self.clock.fetch_add(duration_nanos(by), Ordering::SeqCst);
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> SimInstant {
        SimInstant(self.clock.load(Ordering::SeqCst))
    }

    /// Advances the clock by `duration` and completes immediately.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.advance(duration);
        std::future::ready(())
    }
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
