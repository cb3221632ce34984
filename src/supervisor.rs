//! Supervisor task and the mitigation extension point.
//!
//! The Supervisor wakes on a fixed period, reads the shared counters and
//! hands them to a [`MitigationPolicy`]. The baseline policy only observes;
//! corrective behavior plugs in here without changing the task layout.

use core::convert::Infallible;

use embassy_time::Ticker;

use crate::comm::uptime_secs;
use crate::config::MonitorConfig;
use crate::pipeline::Pipeline;
use crate::protocol::{self, MonitorMessage};
use crate::stats::StatsSnapshot;

/// Decides what to do about the current pipeline state.
pub trait MitigationPolicy {
    fn review(&mut self, stats: &StatsSnapshot);

    /// Drop everything learned so far. Called at the start of every
    /// generation, when the counters it reviews start over from zero.
    fn reset(&mut self);
}

/// Baseline policy: reports new alerts, takes no action.
#[derive(Debug, Default)]
pub struct Observe {
    last_alerts: u32,
}

impl Observe {
    pub const fn new() -> Self {
        Self { last_alerts: 0 }
    }

    /// Alert count seen at the last review
    pub fn last_alerts(&self) -> u32 {
        self.last_alerts
    }
}

impl MitigationPolicy for Observe {
    fn review(&mut self, stats: &StatsSnapshot) {
        let new = stats.alerts.saturating_sub(self.last_alerts);
        if new > 0 {
            log::debug!("Supervisor: {} new alert(s), {} total", new, stats.alerts);
        }
        self.last_alerts = stats.alerts;
    }

    fn reset(&mut self) {
        self.last_alerts = 0;
    }
}

/// Supervisor task. Runs forever.
pub async fn supervisor_task(
    pipeline: &Pipeline,
    config: &MonitorConfig,
    policy: &mut impl MitigationPolicy,
) -> Infallible {
    log::info!("Supervisor task started");

    let mut ticker = Ticker::every(config.supervisor_period);
    let mut wakes: u32 = 0;

    loop {
        ticker.next().await;
        wakes = wakes.wrapping_add(1);

        let stats = pipeline.stats.snapshot();
        policy.review(&stats);

        if config.status_every != 0 && wakes % config.status_every == 0 {
            let msg = MonitorMessage::Status {
                uptime: uptime_secs(),
                seen: stats.published,
                alerts: stats.alerts,
                dropped: stats.dropped(),
            };
            let sent = protocol::encode(&msg)
                .map(|record| pipeline.records.try_send(record).is_ok())
                .unwrap_or(false);
            if !sent {
                pipeline.stats.record_dropped();
            }
        }
    }
}
