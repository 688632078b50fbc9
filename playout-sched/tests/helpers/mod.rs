//! Test helper modules for playout-sched integration tests
//!
//! Provides reusable test infrastructure components:
//! - RecordingSwitcher: scene switcher that records calls and fails on demand
//! - fixtures: standard timelines and a controller wired to a ManualClock

#![allow(dead_code)]

pub mod fixtures;
pub mod recording_switcher;

// Re-export commonly used types
pub use fixtures::{abc_timeline, build_controller, drain_events, fast_settings, scene, TestRig};
pub use recording_switcher::{RecordingSwitcher, SwitcherCall};
