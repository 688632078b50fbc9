//! Event types for the playout status channel
//!
//! The broadcast controller publishes every transition, failed activation,
//! operator adjustment and lifecycle change as a [`ScheduleEvent`] on an
//! [`EventBus`]. Background poll-loop failures reach the operator only
//! through this channel; they never propagate out of the loop.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Kind of operator schedule adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ShiftKind {
    /// Advance to the entry after the active one
    Skip,
    /// Operator-chosen entry (forward or rewind)
    Jump,
}

impl std::fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftKind::Skip => write!(f, "Skip"),
            ShiftKind::Jump => write!(f, "Jump"),
        }
    }
}

/// Why a broadcast ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum StopReason {
    /// Operator called stop
    Operator,
    /// Playlist ran out and auto-stop is enabled
    Exhausted,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Operator => write!(f, "Operator"),
            StopReason::Exhausted => write!(f, "Exhausted"),
        }
    }
}

/// Playout status events
///
/// Serializable so a UI bridge can forward them verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScheduleEvent {
    /// Broadcast entered Running
    BroadcastStarted {
        /// Initial manual offset applied at start
        start_offset_seconds: f64,
        /// Number of entries in the timeline
        entry_count: usize,
        /// Total timeline duration in seconds
        total_seconds: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Broadcast returned to Idle
    BroadcastStopped {
        reason: StopReason,
        /// Index that was active when the broadcast ended
        last_index: Option<usize>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The poll loop presented a new entry
    EntryActivated {
        index: usize,
        /// Index presented before this transition
        previous_index: Option<usize>,
        scene_name: String,
        /// Elapsed schedule time at which the transition was issued
        elapsed_seconds: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A transition could not be presented; a later tick retries it
    ActivationFailed {
        index: usize,
        scene_name: String,
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Operator skip or jump moved the schedule origin
    ScheduleShifted {
        kind: ShiftKind,
        target_index: usize,
        /// Adjustment added to the manual offset
        delta_seconds: f64,
        /// Manual offset after the adjustment
        manual_offset_seconds: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Emergency scene presented outside the schedule
    EmergencyActivated {
        scene_name: String,
        /// Scheduled index left untouched by the override
        active_index: Option<usize>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Elapsed time passed the end of the last entry
    ///
    /// Published once each time the playlist runs out; a skip or jump back
    /// into the playlist re-arms it.
    PlaylistExhausted {
        elapsed_seconds: f64,
        total_seconds: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Prepare phase finished
    ScenesPrepared {
        prepared: usize,
        failed: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl ScheduleEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            ScheduleEvent::BroadcastStarted { .. } => "BroadcastStarted",
            ScheduleEvent::BroadcastStopped { .. } => "BroadcastStopped",
            ScheduleEvent::EntryActivated { .. } => "EntryActivated",
            ScheduleEvent::ActivationFailed { .. } => "ActivationFailed",
            ScheduleEvent::ScheduleShifted { .. } => "ScheduleShifted",
            ScheduleEvent::EmergencyActivated { .. } => "EmergencyActivated",
            ScheduleEvent::PlaylistExhausted { .. } => "PlaylistExhausted",
            ScheduleEvent::ScenesPrepared { .. } => "ScenesPrepared",
        }
    }
}

/// Status event distribution bus
///
/// Wraps a `tokio::sync::broadcast` channel: publishing never blocks, slow
/// subscribers observe `Lagged`, and publishing with no subscribers is not
/// an error.
///
/// # Examples
///
/// ```
/// use playout_common::events::{EventBus, ScheduleEvent};
///
/// let bus = EventBus::new(16);
/// let mut rx = bus.subscribe();
///
/// bus.emit_lossy(ScheduleEvent::ScenesPrepared {
///     prepared: 3,
///     failed: 0,
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert_eq!(rx.try_recv().unwrap().event_type(), "ScenesPrepared");
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ScheduleEvent>,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ScheduleEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring the case where nobody is listening
    pub fn emit_lossy(&self, event: ScheduleEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_is_fine() {
        let bus = EventBus::new(4);
        bus.emit_lossy(ScheduleEvent::PlaylistExhausted {
            elapsed_seconds: 91.0,
            total_seconds: 90.0,
            timestamp: chrono::Utc::now(),
        });
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let bus = EventBus::new(0);
        let mut rx = bus.subscribe();
        bus.emit_lossy(ScheduleEvent::PlaylistExhausted {
            elapsed_seconds: 91.0,
            total_seconds: 90.0,
            timestamp: chrono::Utc::now(),
        });
        assert_eq!(rx.try_recv().unwrap().event_type(), "PlaylistExhausted");
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = ScheduleEvent::ScheduleShifted {
            kind: ShiftKind::Skip,
            target_index: 2,
            delta_seconds: 35.0,
            manual_offset_seconds: 35.0,
            timestamp: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ScheduleShifted");
        assert_eq!(json["kind"], "Skip");
        assert_eq!(json["target_index"], 2);
    }

    #[test]
    fn test_event_type_names() {
        let event = ScheduleEvent::BroadcastStopped {
            reason: StopReason::Operator,
            last_index: None,
            timestamp: chrono::Utc::now(),
        };
        assert_eq!(event.event_type(), "BroadcastStopped");
        assert_eq!(StopReason::Exhausted.to_string(), "Exhausted");
        assert_eq!(ShiftKind::Jump.to_string(), "Jump");
    }
}
