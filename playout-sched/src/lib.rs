//! # Playout Scheduler Library (playout-sched)
//!
//! Unattended playback of an ordered playlist of timed media items.
//!
//! **Purpose:** Keep a presentation backend showing the entry that the
//! schedule says should be on air, using a drifting wall clock polled at a
//! fixed interval, while an operator skips, jumps, rewinds or forces an
//! emergency scene.
//!
//! **Architecture:** Timeline (cumulative offsets) → ScheduleOrigin
//! (elapsed time with manual offset) → resolver (binary search) →
//! BroadcastController (single-mutex state + poll task) → SceneSwitcher.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod schedule;
pub mod switcher;

pub use broadcast::{BroadcastController, BroadcastStatus, TickOutcome};
pub use error::{Error, PresentationError, Result};
pub use schedule::{Clock, Entry, ManualClock, ScheduleOrigin, SystemClock, Timeline};
pub use switcher::{SceneNaming, SceneSwitcher, EMERGENCY_SCENE};
