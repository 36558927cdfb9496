//! Timed lighting effects played through the bridge

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    bridge::{Bridge, BridgeError},
    clock::{Clock, SystemClock},
    methods::Method,
    models::{Config, DiscoConfig, LightId, MorseConfig},
};

mod disco;
mod morse;
pub use morse::pattern as morse_pattern;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOutcome {
    /// The effect played until its end
    Completed,
    /// The effect was stopped through its [AbortSignal]
    Aborted,
}

#[derive(Default, Debug)]
struct AbortData {
    running: AtomicBool,
    triggered: AtomicBool,
}

/// Cancellation signal shared between the effect generators and their controller
///
/// Effects poll the signal between ticks. The signal is cleared whenever an effect starts or
/// ends, so a trigger only ever affects the effect currently playing.
#[derive(Default, Debug, Clone)]
pub struct AbortSignal(Arc<AbortData>);

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the running effect to stop
    ///
    /// Returns `false` if no effect is running.
    pub fn trigger(&self) -> bool {
        if self.is_running() {
            self.0.triggered.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.0.triggered.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.0.running.load(Ordering::SeqCst)
    }

    fn start(&self) -> RunningEffect<'_> {
        self.0.triggered.store(false, Ordering::SeqCst);
        self.0.running.store(true, Ordering::SeqCst);
        RunningEffect(self)
    }
}

/// Marks an effect as running until dropped
struct RunningEffect<'s>(&'s AbortSignal);

impl Drop for RunningEffect<'_> {
    fn drop(&mut self) {
        (self.0).0.running.store(false, Ordering::SeqCst);
        (self.0).0.triggered.store(false, Ordering::SeqCst);
    }
}

/// Effect generators, sharing a clock and an abort signal
pub struct Effects<C = SystemClock> {
    clock: C,
    abort: AbortSignal,
    morse: MorseConfig,
    disco: DiscoConfig,
}

impl<C: Clock> Effects<C> {
    pub fn new(clock: C, config: &Config) -> Self {
        Self {
            clock,
            abort: AbortSignal::new(),
            morse: config.morse.clone(),
            disco: config.disco.clone(),
        }
    }

    pub fn abort_signal(&self) -> AbortSignal {
        self.abort.clone()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn aborted(&self) -> bool {
        if self.abort.is_triggered() {
            info!("effect aborted");
            true
        } else {
            false
        }
    }
}

/// Effects only start on a connected bridge and a known light
fn check_target<M: Method>(bridge: &Bridge<M>, id: LightId) -> Result<(), BridgeError> {
    if !bridge.is_connected() {
        return Err(BridgeError::NotConnected);
    }

    bridge.light(id).map(|_| ())
}
