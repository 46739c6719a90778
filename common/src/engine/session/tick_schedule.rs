use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// The recurring tick timer of a round. At most one interval exists at a time.
pub struct TickSchedule {
    interval: Option<Interval>,
    period: Duration,
    started: u64,
    cancelled: u64,
}

impl TickSchedule {
    pub fn new(period: Duration) -> Self {
        Self {
            interval: None,
            period,
            started: 0,
            cancelled: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Only allowed while no schedule is running.
    pub fn set_period(&mut self, period: Duration) -> bool {
        if self.is_active() {
            return false;
        }
        self.period = period;
        true
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// First tick fires one period from now. Must be called inside a tokio runtime.
    pub fn start(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
        self.started += 1;
        true
    }

    pub fn cancel(&mut self) -> bool {
        if self.interval.take().is_some() {
            self.cancelled += 1;
            true
        } else {
            false
        }
    }

    pub fn started_count(&self) -> u64 {
        self.started
    }

    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }

    /// Resolves on the next tick, never resolves while inactive.
    pub async fn tick(&mut self) -> Instant {
        match self.interval.as_mut() {
            Some(interval) => interval.tick().await,
            None => std::future::pending().await,
        }
    }
}
