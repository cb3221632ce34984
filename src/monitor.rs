//! Task composition and the restart loop.
//!
//! One generation builds a fresh [`Pipeline`], runs the four pipeline tasks
//! plus the watchdog on a single cooperative executor, and ends when the
//! watchdog reports an unresponsive task. The next generation starts from
//! scratch: empty queues, zeroed counters, a reloaded registry.
//!
//! There is no preemption between pipeline tasks. They share one future and
//! are polled in priority order (Logger, Checker, Supervisor, Scanner), so
//! whenever several are ready the higher one runs first, and each keeps the
//! CPU until its next await.

use core::convert::Infallible;

use embassy_futures::select::{select, select4, Either, Either4};

use crate::board;
use crate::checker::checker_task;
use crate::config::{ConfigError, MonitorConfig};
use crate::logger::{logger_task, Sink};
use crate::pipeline::Pipeline;
use crate::protocol::{self, MonitorMessage, VERSION};
use crate::registry::{allowlist, Allowlist};
use crate::scanner::{scanner_task, Sensor};
use crate::stats::StatsSnapshot;
use crate::supervisor::{supervisor_task, MitigationPolicy, Observe};
use crate::watchdog::{watchdog_task, Expired, NoTimer, WatchdogTimer};

/// How a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restart {
    pub cause: Expired,
    /// 1 for the first generation after power-on
    pub generation: u32,
    /// Counters at the moment the generation was torn down
    pub stats: StatsSnapshot,
}

/// Owns the collaborators that outlive a generation.
pub struct Monitor<S, O, P = Observe, T = NoTimer>
where
    S: Sensor,
    O: Sink,
    P: MitigationPolicy,
    T: WatchdogTimer,
{
    config: MonitorConfig,
    allowlist: Allowlist,
    sensor: S,
    sink: O,
    policy: P,
    timer: T,
    generation: u32,
}

impl<S: Sensor, O: Sink> Monitor<S, O> {
    /// Validate `config` and load its authorized set.
    pub fn new(config: MonitorConfig, sensor: S, sink: O) -> Result<Self, ConfigError> {
        config.validate()?;
        let allowlist = allowlist(config.authorized)?;
        Ok(Self {
            config,
            allowlist,
            sensor,
            sink,
            policy: Observe::new(),
            timer: NoTimer,
            generation: 0,
        })
    }
}

impl<S, O, P, T> Monitor<S, O, P, T>
where
    S: Sensor,
    O: Sink,
    P: MitigationPolicy,
    T: WatchdogTimer,
{
    pub fn with_policy<Q: MitigationPolicy>(self, policy: Q) -> Monitor<S, O, Q, T> {
        Monitor {
            config: self.config,
            allowlist: self.allowlist,
            sensor: self.sensor,
            sink: self.sink,
            policy,
            timer: self.timer,
            generation: self.generation,
        }
    }

    /// Feed `timer` while the pipeline is healthy.
    pub fn with_timer<U: WatchdogTimer>(self, timer: U) -> Monitor<S, O, P, U> {
        Monitor {
            config: self.config,
            allowlist: self.allowlist,
            sensor: self.sensor,
            sink: self.sink,
            policy: self.policy,
            timer,
            generation: self.generation,
        }
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn sink(&self) -> &O {
        &self.sink
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Generations started so far
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Run one generation until the watchdog fires.
    ///
    /// The sensor and policy are reset first, so nothing carries over from
    /// the previous generation.
    pub async fn run_generation(&mut self) -> Restart {
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let config = self.config;

        self.sensor.reset();
        self.policy.reset();

        let pipeline = Pipeline::new(self.allowlist.clone(), config.watchdog_timeout);
        log::info!(
            "Generation {}: {} authorized networks, watchdog {} ms",
            generation,
            pipeline.registry.len(),
            config.watchdog_timeout.as_millis()
        );

        let boot = MonitorMessage::Boot {
            board: board::BOARD_NAME,
            version: VERSION,
            generation,
        };
        let queued = protocol::encode(&boot)
            .map(|record| pipeline.records.try_send(record).is_ok())
            .unwrap_or(false);
        if !queued {
            pipeline.stats.record_dropped();
        }

        let tasks = select4(
            logger_task(&pipeline, &mut self.sink),
            checker_task(&pipeline, &config),
            supervisor_task(&pipeline, &config, &mut self.policy),
            scanner_task(&pipeline, &config, &mut self.sensor),
        );
        let watchdog = watchdog_task(&pipeline.watchdog, config.watchdog_poll, &mut self.timer);

        let cause = match select(tasks, watchdog).await {
            Either::First(
                Either4::First(never)
                | Either4::Second(never)
                | Either4::Third(never)
                | Either4::Fourth(never),
            ) => match never {},
            Either::Second(expired) => expired,
        };

        Restart {
            cause,
            generation,
            stats: pipeline.stats.snapshot(),
        }
    }

    /// Run generations back to back, forever.
    pub async fn run(&mut self) -> Infallible {
        loop {
            let restart = self.run_generation().await;
            log::error!(
                "Generation {} ended: {} unresponsive, cold restart",
                restart.generation,
                restart.cause.task.as_str()
            );
        }
    }
}
