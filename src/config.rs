//! Compile-time limits and startup tunables.
//!
//! Capacities are fixed at build time because the queues and registry are
//! statically sized. Everything else lives in [`MonitorConfig`], fixed once
//! the monitor is constructed; there is no runtime reconfiguration.

use core::fmt;

use embassy_time::Duration;

use crate::defaults::AUTHORIZED_SSIDS;

/// Slots in the Scanner → Checker queue
pub const EVENT_QUEUE_CAPACITY: usize = 10;

/// Slots in the Checker → Logger queue
pub const LOG_QUEUE_CAPACITY: usize = 10;

/// Maximum number of authorized networks
pub const REGISTRY_CAPACITY: usize = 8;

/// Longest accepted network identifier, in bytes (802.11 SSID limit)
pub const MAX_SSID_LEN: usize = 32;

/// Largest serialized record, trailing newline included
pub const MAX_RECORD_LEN: usize = 128;

/// Tasks that can hold a watchdog registration at once
pub const WATCHDOG_SLOTS: usize = 4;

/// Startup configuration for the monitor.
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    /// Networks considered authorized
    pub authorized: &'static [&'static str],
    /// Delay between two Scanner observations
    pub scan_interval: Duration,
    /// How long an enqueue may wait on a full queue before the item is dropped
    pub enqueue_timeout: Duration,
    /// Pause the Checker takes after each cycle
    pub checker_yield: Duration,
    /// Supervisor wake period
    pub supervisor_period: Duration,
    /// Emit a status record every N supervisor wakes (0 disables)
    pub status_every: u32,
    /// Liveness deadline for registered tasks
    pub watchdog_timeout: Duration,
    /// How often the watchdog inspects its registrations
    pub watchdog_poll: Duration,
}

impl MonitorConfig {
    pub const fn new() -> Self {
        Self {
            authorized: AUTHORIZED_SSIDS,
            scan_interval: Duration::from_millis(500),
            enqueue_timeout: Duration::from_millis(50),
            checker_yield: Duration::from_millis(5),
            supervisor_period: Duration::from_secs(1),
            status_every: 30,
            watchdog_timeout: Duration::from_secs(5),
            watchdog_poll: Duration::from_millis(500),
        }
    }

    /// Worst-case time between two Checker refreshes while events keep arriving.
    pub fn checker_cycle(&self) -> Duration {
        self.scan_interval + self.enqueue_timeout + self.enqueue_timeout + self.checker_yield
    }

    /// Reject combinations that would trip the watchdog during normal operation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_interval.as_ticks() == 0 {
            return Err(ConfigError::ZeroPeriod("scan_interval"));
        }
        if self.supervisor_period.as_ticks() == 0 {
            return Err(ConfigError::ZeroPeriod("supervisor_period"));
        }
        if self.watchdog_poll.as_ticks() == 0 {
            return Err(ConfigError::ZeroPeriod("watchdog_poll"));
        }
        if self.watchdog_timeout <= self.checker_cycle() {
            return Err(ConfigError::WatchdogTooShort);
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Invalid startup configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A period that drives a task loop is zero
    ZeroPeriod(&'static str),
    /// The watchdog deadline does not cover one Checker cycle
    WatchdogTooShort,
    /// The authorized set cannot be loaded into the registry
    Registry(crate::registry::RegistryError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPeriod(name) => write!(f, "{name} must be non-zero"),
            ConfigError::WatchdogTooShort => {
                f.write_str("watchdog timeout must exceed one checker cycle")
            }
            ConfigError::Registry(e) => write!(f, "authorized set: {e}"),
        }
    }
}

impl From<crate::registry::RegistryError> for ConfigError {
    fn from(e: crate::registry::RegistryError) -> Self {
        ConfigError::Registry(e)
    }
}
