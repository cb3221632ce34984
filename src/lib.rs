//! Airwarden library: rogue WiFi network monitor.
//!
//! Observed network identifiers flow through a fixed pipeline of cooperative
//! tasks: the Scanner publishes them, the Checker classifies each one against
//! a secure registry of authorized networks, and the Logger emits one NDJSON
//! record per verdict. A Supervisor reviews the shared counters on a fixed
//! period, and a watchdog cold-restarts the whole pipeline when a registered
//! task stops making progress.
//!
//! Everything here is `no_std` and allocation-free, testable on any host with
//! `cargo test`. The ESP32 firmware binary supplies the sensor, the serial
//! sink and the hardware watchdog.

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod checker;
pub mod comm;
pub mod config;
pub mod defaults;
pub mod logger;
pub mod monitor;
pub mod pipeline;
pub mod protocol;
pub mod registry;
pub mod scanner;
pub mod stats;
pub mod supervisor;
pub mod watchdog;
