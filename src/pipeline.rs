//! Per-generation shared state.
//!
//! A [`Pipeline`] is built once at startup and handed by reference to every
//! task. A watchdog restart discards it and builds a fresh one, so nothing
//! survives from one generation to the next.

use embassy_time::Duration;

use crate::comm::{EventQueue, LogQueue};
use crate::registry::{Allowlist, SecureRegistry};
use crate::stats::Stats;
use crate::watchdog::Watchdog;

pub struct Pipeline {
    pub registry: SecureRegistry,
    pub events: EventQueue,
    pub records: LogQueue,
    pub watchdog: Watchdog,
    pub stats: Stats,
}

impl Pipeline {
    pub fn new(authorized: Allowlist, watchdog_timeout: Duration) -> Self {
        Self {
            registry: SecureRegistry::new(authorized),
            events: EventQueue::new(),
            records: LogQueue::new(),
            watchdog: Watchdog::new(watchdog_timeout),
            stats: Stats::new(),
        }
    }
}
