//! Validation state machine and the Checker task.
//!
//! Each cycle: wait for an event, classify it against the secure registry,
//! publish one record, refresh the watchdog. The alert counter is private to
//! the Checker; the shared stats only get a mirrored copy.

use core::convert::Infallible;

use embassy_time::{Instant, Timer};

use crate::comm::{send_bounded, uptime_millis};
use crate::config::{MonitorConfig, MAX_RECORD_LEN};
use crate::pipeline::Pipeline;
use crate::protocol::{self, LogRecord, MonitorMessage, NetworkEvent};
use crate::registry::SecureRegistry;
use crate::watchdog::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerState {
    WaitingForEvent,
    Classifying,
    Publishing,
}

/// Outcome of classifying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Authorized,
    /// Carries the alert count including this event
    Unauthorized { count: u32 },
}

pub struct Checker {
    alerts: u32,
    state: CheckerState,
}

impl Checker {
    pub const fn new() -> Self {
        Self {
            alerts: 0,
            state: CheckerState::WaitingForEvent,
        }
    }

    pub fn state(&self) -> CheckerState {
        self.state
    }

    /// Alerts raised since this checker was created
    pub fn alerts(&self) -> u32 {
        self.alerts
    }

    /// WaitingForEvent → Classifying. Counts the alert for unauthorized networks.
    pub fn classify(&mut self, event: &NetworkEvent, registry: &SecureRegistry) -> Verdict {
        self.state = CheckerState::Classifying;
        if registry.is_authorized(event.ssid()) {
            Verdict::Authorized
        } else {
            self.alerts = self.alerts.saturating_add(1);
            Verdict::Unauthorized { count: self.alerts }
        }
    }

    /// Classifying → Publishing. Builds the record for `verdict`; `None` if it
    /// does not fit in a record.
    pub fn format(&mut self, event: &NetworkEvent, verdict: Verdict, ts: u32) -> Option<LogRecord> {
        self.state = CheckerState::Publishing;
        let msg = match verdict {
            Verdict::Authorized => MonitorMessage::Authorized {
                ssid: event.ssid(),
                ts,
            },
            Verdict::Unauthorized { count } => MonitorMessage::Alert {
                ssid: event.ssid(),
                count,
                ts,
            },
        };
        protocol::encode(&msg)
    }

    /// Publishing → WaitingForEvent
    pub fn finish(&mut self) {
        self.state = CheckerState::WaitingForEvent;
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

/// Checker task. Registers with the watchdog and refreshes it once per
/// completed cycle. Runs forever.
pub async fn checker_task(pipeline: &Pipeline, config: &MonitorConfig) -> Infallible {
    log::info!("Checker task started");

    let mut checker = Checker::new();
    if let Err(e) = pipeline.watchdog.register(Task::Checker, Instant::now()) {
        log::error!("Checker: {}", e);
    }

    let events = pipeline.events.receiver();

    loop {
        let event = events.receive().await;

        let verdict = checker.classify(&event, &pipeline.registry);
        if let Verdict::Unauthorized { count } = verdict {
            pipeline.stats.set_alerts(count);
        }

        match checker.format(&event, verdict, uptime_millis()) {
            Some(record) => {
                if send_bounded(&pipeline.records, record, config.enqueue_timeout)
                    .await
                    .is_err()
                {
                    pipeline.stats.record_dropped();
                    log::warn!("Checker: log queue full, record for {} dropped", event.ssid());
                }
                if let Err(e) = pipeline.watchdog.refresh(Task::Checker, Instant::now()) {
                    log::error!("Checker: {}", e);
                }
            }
            None => {
                // Skipped cycle: no refresh, so a persistent failure ends in a restart
                log::error!(
                    "Checker: record for {} exceeds {} bytes, cycle skipped",
                    event.ssid(),
                    MAX_RECORD_LEN
                );
            }
        }

        checker.finish();
        Timer::after(config.checker_yield).await;
    }
}
