//! # Playout Common Library
//!
//! Shared code for the playout scheduler crates including:
//! - Error types
//! - Status event types (ScheduleEvent enum)
//! - `HH:MM:SS` time formatting and parsing
//! - Configuration file resolution and the logging section

pub mod config;
pub mod error;
pub mod events;
pub mod human_time;

pub use error::{Error, Result};
pub use events::ScheduleEvent;
pub use human_time::{format_hms, parse_hms};
