//! Schedule origin: start instant plus accumulated manual offset
//!
//! `elapsed(now) = (now - started_at) + manual_offset_seconds`
//!
//! `shift_by` is the only way schedule time is adjusted. The initial start
//! offset, skip and jump are all expressed as "desired elapsed → delta →
//! shift_by(delta)", which keeps them consistent with the resolver.

use std::time::Instant;

/// Reference instant plus signed operator adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleOrigin {
    started_at: Instant,
    manual_offset_seconds: f64,
}

impl ScheduleOrigin {
    /// Origin starting at `started_at` with an initial offset
    pub fn new(started_at: Instant, manual_offset_seconds: f64) -> Self {
        Self {
            started_at,
            manual_offset_seconds,
        }
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn manual_offset_seconds(&self) -> f64 {
        self.manual_offset_seconds
    }

    /// Schedule time in seconds at wall-clock instant `now`
    ///
    /// An instant before `started_at` counts as zero wall-clock time.
    pub fn elapsed_at(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.started_at).as_secs_f64() + self.manual_offset_seconds
    }

    /// Add `delta_seconds` to the manual offset
    pub fn shift_by(&mut self, delta_seconds: f64) {
        self.manual_offset_seconds += delta_seconds;
    }

    /// Shift so that `elapsed_at(now)` lands on `desired_elapsed`; returns
    /// the total delta applied.
    ///
    /// `a + (d - a)` can round to just below `d`, which would resolve to the
    /// entry *before* a boundary. The result is nudged up by ulp-scale steps
    /// until it is at or past the target.
    pub fn shift_to(&mut self, desired_elapsed: f64, now: Instant) -> f64 {
        let before = self.manual_offset_seconds;
        self.shift_by(desired_elapsed - self.elapsed_at(now));

        let scale = desired_elapsed
            .abs()
            .max(self.manual_offset_seconds.abs())
            .max(self.elapsed_at(now).abs())
            .max(1.0);
        let mut nudge = scale * f64::EPSILON;
        while self.elapsed_at(now) < desired_elapsed {
            self.shift_by(nudge);
            nudge *= 2.0;
        }

        self.manual_offset_seconds - before
    }
}
