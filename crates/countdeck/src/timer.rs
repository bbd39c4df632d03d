//! Clocks and the two recurring timers (countdown cadence, slide auto-advance).
//!
//! Timers here are plain values polled with the current time rather than
//! callbacks, so tests drive them with a manual clock and the window only
//! has to repaint when [`Ticker::remaining`] or [`AutoAdvance::remaining`]
//! say something is due.

#[cfg(test)]
use std::cell::Cell;
use std::time::Duration;

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

pub const COUNTDOWN_PERIOD_MS: Millis = 1_000;
pub const DEFAULT_ADVANCE_MS: Millis = 5_000;

pub trait Clock {
    fn now_ms(&self) -> Millis;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

#[cfg(test)]
impl ManualClock {
    pub fn at(now: Millis) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

/// Fixed-cadence ticker. The next tick is due one period after the tick that
/// actually ran, so a late frame delays the schedule instead of bursting.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: Millis,
    next_due: Millis,
}

impl Ticker {
    /// A ticker whose first tick is due at `now`.
    pub fn starting_at(now: Millis, period: Millis) -> Self {
        Self {
            period,
            next_due: now,
        }
    }

    /// Returns true (and reschedules) when a tick is due.
    pub fn poll(&mut self, now: Millis) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.period;
        true
    }

    /// Restart the cadence from `now` after an out-of-band tick.
    pub fn reset(&mut self, now: Millis) {
        self.next_due = now + self.period;
    }

    pub fn remaining(&self, now: Millis) -> Duration {
        until(self.next_due, now)
    }
}

/// The auto-advance timer. At most one exists because it is a single value,
/// and every transition goes through [`start`](Self::start) or
/// [`stop`](Self::stop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoAdvance {
    Stopped,
    Running { next_due: Millis },
}

impl AutoAdvance {
    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Stopped -> Running. A running timer keeps its schedule.
    pub fn start(&mut self, now: Millis, interval: Millis) {
        if let Self::Stopped = self {
            *self = Self::Running {
                next_due: now + interval,
            };
        }
    }

    pub fn stop(&mut self) {
        *self = Self::Stopped;
    }

    /// Returns true when the timer fired, rescheduling it one interval on.
    pub fn fire(&mut self, now: Millis, interval: Millis) -> bool {
        match *self {
            Self::Running { next_due } if now >= next_due => {
                *self = Self::Running {
                    next_due: now + interval,
                };
                true
            }
            _ => false,
        }
    }

    pub fn remaining(&self, now: Millis) -> Option<Duration> {
        match *self {
            Self::Running { next_due } => Some(until(next_due, now)),
            Self::Stopped => None,
        }
    }
}

fn until(due: Millis, now: Millis) -> Duration {
    Duration::from_millis(due.saturating_sub(now).max(0) as u64)
}
