//! Pipeline counters shared between tasks.
//!
//! Each counter has a single writer; readers (the Supervisor) go through
//! [`Stats::snapshot`]. Relaxed ordering is enough because no counter guards
//! other memory.

use core::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Default)]
pub struct Stats {
    observed: AtomicU32,
    published: AtomicU32,
    dropped_events: AtomicU32,
    malformed: AtomicU32,
    alerts: AtomicU32,
    emitted: AtomicU32,
    dropped_records: AtomicU32,
}

/// Point-in-time copy of [`Stats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Identifiers the sensor produced
    pub observed: u32,
    /// Events accepted by the event queue
    pub published: u32,
    /// Events lost to a full event queue
    pub dropped_events: u32,
    /// Identifiers rejected before enqueue (too long)
    pub malformed: u32,
    /// Checker alert count
    pub alerts: u32,
    /// Records handed to the output collaborator
    pub emitted: u32,
    /// Records lost to a full log queue
    pub dropped_records: u32,
}

impl StatsSnapshot {
    /// Everything lost to backpressure
    pub fn dropped(&self) -> u32 {
        self.dropped_events.saturating_add(self.dropped_records)
    }
}

impl Stats {
    pub const fn new() -> Self {
        Self {
            observed: AtomicU32::new(0),
            published: AtomicU32::new(0),
            dropped_events: AtomicU32::new(0),
            malformed: AtomicU32::new(0),
            alerts: AtomicU32::new(0),
            emitted: AtomicU32::new(0),
            dropped_records: AtomicU32::new(0),
        }
    }

    pub fn observed(&self) {
        self.observed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn event_dropped(&self) {
        self.dropped_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    /// Mirror the Checker's private alert counter.
    pub fn set_alerts(&self, count: u32) {
        self.alerts.store(count, Ordering::Relaxed);
    }

    pub fn emitted(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped_records.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            observed: self.observed.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
            dropped_events: self.dropped_events.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            alerts: self.alerts.load(Ordering::Relaxed),
            emitted: self.emitted.load(Ordering::Relaxed),
            dropped_records: self.dropped_records.load(Ordering::Relaxed),
        }
    }
}
