//! Time source for the effect generators

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

pub trait Clock {
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall clock, sleeping the current thread
#[derive(Default, Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug)]
struct ManualClockData {
    start: Instant,
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

/// Simulated clock: sleeping returns immediately and advances the current time
#[derive(Debug)]
pub struct ManualClock(Mutex<ManualClockData>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Mutex::new(ManualClockData {
            start: Instant::now(),
            elapsed: Duration::ZERO,
            sleeps: Vec::new(),
        }))
    }

    /// Total simulated time
    pub fn elapsed(&self) -> Duration {
        self.0.lock().expect("clock lock poisoned").elapsed
    }

    /// Every sleep requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.0.lock().expect("clock lock poisoned").sleeps.clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let data = self.0.lock().expect("clock lock poisoned");
        data.start + data.elapsed
    }

    fn sleep(&self, duration: Duration) {
        let mut data = self.0.lock().expect("clock lock poisoned");
        data.elapsed += duration;
        data.sleeps.push(duration);
    }
}
