//! Injectable wall clock
//!
//! The controller never reads `Instant::now()` directly. Production uses
//! [`SystemClock`]; tests and simulations drive a [`ManualClock`].

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Source of "now" for schedule arithmetic
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Monotonic system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }

    /// Move the clock forward by fractional seconds
    pub fn advance_secs(&self, seconds: f64) {
        self.advance(Duration::from_secs_f64(seconds.max(0.0)));
    }

    /// Seconds since this clock was created
    pub fn elapsed_secs(&self) -> f64 {
        self.offset
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_secs_f64()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap_or_else(|e| e.into_inner())
    }
}
