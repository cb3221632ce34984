//! Task liveness watchdog.
//!
//! Registered tasks must refresh their slot within the deadline. The first
//! task found idle past it ends the current generation; the monitor then
//! cold-restarts everything rather than trying to revive a single task.
//!
//! While all tasks are healthy the watchdog task feeds a [`WatchdogTimer`],
//! the hardware backstop that resets the chip if the executor itself stops
//! running.

use core::cell::RefCell;
use core::fmt;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Instant, Ticker};
use heapless::Vec;

use crate::config::WATCHDOG_SLOTS;

/// Pipeline task identities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Scanner,
    Checker,
    Logger,
    Supervisor,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Scanner => "scanner",
            Task::Checker => "checker",
            Task::Logger => "logger",
            Task::Supervisor => "supervisor",
        }
    }
}

/// A registered task missed its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired {
    pub task: Task,
    /// Time since the task last refreshed (or registered)
    pub idle: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogError {
    /// All `WATCHDOG_SLOTS` are taken
    Full,
    /// The task never registered
    NotRegistered(Task),
}

impl fmt::Display for WatchdogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchdogError::Full => write!(f, "all {WATCHDOG_SLOTS} watchdog slots in use"),
            WatchdogError::NotRegistered(task) => {
                write!(f, "{} is not registered with the watchdog", task.as_str())
            }
        }
    }
}

/// Backing timer fed while every registered task is healthy.
pub trait WatchdogTimer {
    fn feed(&mut self);
}

/// No backing timer (host builds, tests).
pub struct NoTimer;

impl WatchdogTimer for NoTimer {
    fn feed(&mut self) {}
}

#[derive(Clone, Copy)]
struct Slot {
    task: Task,
    fed_at: Instant,
}

pub struct Watchdog {
    timeout: Duration,
    slots: Mutex<CriticalSectionRawMutex, RefCell<Vec<Slot, WATCHDOG_SLOTS>>>,
}

impl Watchdog {
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            slots: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start supervising `task`. Registering again re-arms its deadline.
    pub fn register(&self, task: Task, now: Instant) -> Result<(), WatchdogError> {
        self.slots.lock(|slots| {
            let mut slots = slots.borrow_mut();
            if let Some(slot) = slots.iter_mut().find(|s| s.task == task) {
                slot.fed_at = now;
                return Ok(());
            }
            slots
                .push(Slot { task, fed_at: now })
                .map_err(|_| WatchdogError::Full)
        })
    }

    /// Signal that `task` is alive.
    pub fn refresh(&self, task: Task, now: Instant) -> Result<(), WatchdogError> {
        self.slots.lock(|slots| {
            let mut slots = slots.borrow_mut();
            match slots.iter_mut().find(|s| s.task == task) {
                Some(slot) => {
                    slot.fed_at = now;
                    Ok(())
                }
                None => Err(WatchdogError::NotRegistered(task)),
            }
        })
    }

    pub fn is_registered(&self, task: Task) -> bool {
        self.slots
            .lock(|slots| slots.borrow().iter().any(|s| s.task == task))
    }

    /// First registered task idle for longer than the deadline, if any.
    pub fn check(&self, now: Instant) -> Option<Expired> {
        self.slots.lock(|slots| {
            slots.borrow().iter().find_map(|slot| {
                let idle = now.saturating_duration_since(slot.fed_at);
                (idle > self.timeout).then_some(Expired {
                    task: slot.task,
                    idle,
                })
            })
        })
    }
}

/// Poll the registrations every `poll` until one expires.
///
/// Returns the expiry; the caller owns the restart.
pub async fn watchdog_task(
    watchdog: &Watchdog,
    poll: Duration,
    timer: &mut impl WatchdogTimer,
) -> Expired {
    let mut ticker = Ticker::every(poll);
    loop {
        ticker.next().await;
        if let Some(expired) = watchdog.check(Instant::now()) {
            log::error!(
                "Watchdog: {} task idle for {} ms (deadline {} ms)",
                expired.task.as_str(),
                expired.idle.as_millis(),
                watchdog.timeout.as_millis()
            );
            return expired;
        }
        timer.feed();
    }
}
