//! Network observation and the Scanner task.
//!
//! The Scanner asks a [`Sensor`] for one identifier per cycle and publishes
//! it to the event queue. It never stalls the pipeline: a full queue costs
//! at most `enqueue_timeout`, after which the event is dropped.

use core::convert::Infallible;

use embassy_time::Timer;

use crate::comm::send_bounded;
use crate::config::{MonitorConfig, MAX_SSID_LEN};
use crate::pipeline::Pipeline;
use crate::protocol::NetworkEvent;

/// Source of observed network identifiers.
///
/// Returns `None` when nothing was seen this cycle.
pub trait Sensor {
    fn observe(&mut self) -> Option<&str>;

    /// Return to the startup state. Called at the start of every generation.
    fn reset(&mut self) {}
}

/// Replays a fixed list of identifiers, wrapping around at the end.
pub struct DemoSensor {
    names: &'static [&'static str],
    next: usize,
}

impl DemoSensor {
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names, next: 0 }
    }
}

impl Sensor for DemoSensor {
    fn observe(&mut self) -> Option<&str> {
        let name = *self.names.get(self.next)?;
        self.next = (self.next + 1) % self.names.len();
        Some(name)
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}

/// Scanner task: observe, publish, sleep. Runs forever.
pub async fn scanner_task(
    pipeline: &Pipeline,
    config: &MonitorConfig,
    sensor: &mut impl Sensor,
) -> Infallible {
    log::info!("Scanner task started");

    loop {
        if let Some(ssid) = sensor.observe() {
            pipeline.stats.observed();
            match NetworkEvent::new(ssid) {
                Some(event) => {
                    match send_bounded(&pipeline.events, event, config.enqueue_timeout).await {
                        Ok(()) => pipeline.stats.published(),
                        Err(e) => {
                            pipeline.stats.event_dropped();
                            log::warn!("Scanner: {}", e);
                        }
                    }
                }
                None => {
                    pipeline.stats.malformed();
                    log::warn!("Scanner: identifier over {} bytes ignored", MAX_SSID_LEN);
                }
            }
        }

        Timer::after(config.scan_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EVENT_QUEUE_CAPACITY;
    use crate::registry::allowlist;
    use embassy_futures::block_on;
    use embassy_futures::select::select;
    use embassy_time::Duration;

    fn fast_config() -> MonitorConfig {
        MonitorConfig {
            scan_interval: Duration::from_millis(1),
            enqueue_timeout: Duration::from_millis(1),
            ..MonitorConfig::new()
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(allowlist(&["A"]).unwrap(), Duration::from_secs(5))
    }

    /// Run the scanner for `ms` milliseconds, then cancel it.
    fn run_for(pipeline: &Pipeline, sensor: &mut impl Sensor, ms: u64) {
        let config = fast_config();
        block_on(select(
            scanner_task(pipeline, &config, sensor),
            Timer::after(Duration::from_millis(ms)),
        ));
    }

    // ── DemoSensor ──────────────────────────────────────────────────

    #[test]
    fn demo_sensor_wraps_around() {
        let mut sensor = DemoSensor::new(&["one", "two", "three"]);
        let seen: Vec<String> = (0..7)
            .map(|_| sensor.observe().unwrap().to_owned())
            .collect();
        assert_eq!(seen, ["one", "two", "three", "one", "two", "three", "one"]);
    }

    #[test]
    fn demo_sensor_reset_restarts_sequence() {
        let mut sensor = DemoSensor::new(&["one", "two", "three"]);
        sensor.observe();
        sensor.observe();
        sensor.reset();
        assert_eq!(sensor.observe(), Some("one"));
    }

    #[test]
    fn empty_demo_sensor_observes_nothing() {
        let mut sensor = DemoSensor::new(&[]);
        assert_eq!(sensor.observe(), None);
        assert_eq!(sensor.observe(), None);
    }

    // ── Scanner task ────────────────────────────────────────────────

    #[test]
    fn publishes_observations_in_order() {
        let pipeline = pipeline();
        let mut sensor = DemoSensor::new(&["A", "X", "B"]);
        run_for(&pipeline, &mut sensor, 30);

        let first: Vec<String> = (0..3)
            .map(|_| pipeline.events.try_receive().unwrap().ssid().to_owned())
            .collect();
        assert_eq!(first, ["A", "X", "B"]);
    }

    #[test]
    fn saturated_queue_drops_but_keeps_producing() {
        let pipeline = pipeline();
        let mut sensor = DemoSensor::new(&["EvilTwin", "RandomAP"]);
        run_for(&pipeline, &mut sensor, 200);

        let stats = pipeline.stats.snapshot();
        assert!(pipeline.events.is_full());
        assert_eq!(stats.published as usize, EVENT_QUEUE_CAPACITY);
        assert!(stats.dropped_events > 0, "expected drops, got {stats:?}");
        assert!(stats.observed > stats.published);

        // Producer is still alive: draining one slot lets the next cycle in
        pipeline.events.try_receive().unwrap();
        run_for(&pipeline, &mut sensor, 20);
        assert!(pipeline.events.is_full());
        assert_eq!(
            pipeline.stats.snapshot().published as usize,
            EVENT_QUEUE_CAPACITY + 1
        );
    }

    #[test]
    fn over_long_identifiers_are_never_enqueued() {
        static NAMES: &[&str] = &["this-network-name-is-way-past-the-32-byte-limit", "ok"];
        let pipeline = pipeline();
        let mut sensor = DemoSensor::new(NAMES);
        run_for(&pipeline, &mut sensor, 20);

        let stats = pipeline.stats.snapshot();
        assert!(stats.malformed >= 1);
        while let Ok(event) = pipeline.events.try_receive() {
            assert_eq!(event.ssid(), "ok");
        }
    }

    struct Silent;

    impl Sensor for Silent {
        fn observe(&mut self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn silent_sensor_publishes_nothing() {
        let pipeline = pipeline();
        run_for(&pipeline, &mut Silent, 20);
        assert!(pipeline.events.is_empty());
        assert_eq!(pipeline.stats.snapshot().observed, 0);
    }
}
