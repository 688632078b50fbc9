//! Schedule model
//!
//! - `entry`: validated media items
//! - `timeline`: ordered entries with cumulative offsets and editing ops
//! - `origin`: start instant + manual offset (the single time-adjust primitive)
//! - `clock`: injectable wall clock
//! - `resolver`: elapsed seconds → entry index

pub mod clock;
pub mod entry;
pub mod origin;
pub mod resolver;
pub mod timeline;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{Entry, SourceRef};
pub use origin::ScheduleOrigin;
pub use resolver::resolve;
pub use timeline::Timeline;
