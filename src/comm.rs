//! Inter-task queues.
//!
//! The event queue and the log queue are the only channels between tasks.
//! Producers never block on them indefinitely: an enqueue waits at most a
//! short timeout, then the item is dropped and the producer moves on.

use core::fmt;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{with_timeout, Duration, Instant};

use crate::config::{EVENT_QUEUE_CAPACITY, LOG_QUEUE_CAPACITY};
use crate::protocol::{LogRecord, NetworkEvent};

/// Scanner → Checker
pub type EventQueue = Channel<CriticalSectionRawMutex, NetworkEvent, EVENT_QUEUE_CAPACITY>;

/// Checker (and Supervisor) → Logger
pub type LogQueue = Channel<CriticalSectionRawMutex, LogRecord, LOG_QUEUE_CAPACITY>;

/// The queue stayed full for the whole enqueue wait. The item was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull;

impl fmt::Display for QueueFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("queue full, item dropped")
    }
}

/// Enqueue `item`, waiting at most `wait` for a free slot.
pub async fn send_bounded<T, const N: usize>(
    queue: &Channel<CriticalSectionRawMutex, T, N>,
    item: T,
    wait: Duration,
) -> Result<(), QueueFull> {
    with_timeout(wait, queue.send(item))
        .await
        .map_err(|_| QueueFull)
}

/// Uptime in milliseconds, wrapped to 32 bits for record timestamps.
pub fn uptime_millis() -> u32 {
    (Instant::now().as_millis() & 0xFFFF_FFFF) as u32
}

pub fn uptime_secs() -> u32 {
    (Instant::now().as_secs() & 0xFFFF_FFFF) as u32
}
