//! Broadcast lifecycle
//!
//! [`BroadcastController`] owns the timeline and the running broadcast's
//! state behind one async mutex. A background poll task calls the same
//! `tick` that tests call directly, so the loop adds timing and nothing
//! else.

mod controller;
mod poll;
mod status;

pub use controller::{BroadcastController, ControllerSettings};
pub use status::{BroadcastStatus, TickOutcome};
