//! Broadcast status snapshot and tick results

use serde::Serialize;

/// Result of a single resolve-and-activate pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Resolved index already on air, or elapsed time precedes the first entry
    Unchanged(Option<usize>),
    /// A new entry was presented
    Activated(usize),
    /// Presenting the entry failed; the next tick retries
    ActivationFailed(usize),
    /// Elapsed time is at or past the end of the last entry
    Exhausted,
}

/// Point-in-time view of the controller for UI display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BroadcastStatus {
    pub running: bool,
    pub active_index: Option<usize>,
    /// `None` while idle
    pub elapsed_seconds: Option<f64>,
    pub total_seconds: f64,
    pub entry_count: usize,
    /// `None` while idle
    pub manual_offset_seconds: Option<f64>,
}

impl BroadcastStatus {
    /// Index of the active entry as shown to operators (1-based)
    pub fn display_position(&self) -> Option<usize> {
        self.active_index.map(|i| i + 1)
    }

    /// Seconds left until the playlist runs out, clamped at zero
    pub fn remaining_seconds(&self) -> Option<f64> {
        self.elapsed_seconds
            .map(|elapsed| (self.total_seconds - elapsed).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_is_clamped() {
        let status = BroadcastStatus {
            running: true,
            active_index: None,
            elapsed_seconds: Some(120.0),
            total_seconds: 90.0,
            entry_count: 3,
            manual_offset_seconds: Some(0.0),
        };
        assert_eq!(status.remaining_seconds(), Some(0.0));
        assert_eq!(status.display_position(), None);
    }

    #[test]
    fn test_idle_has_no_elapsed() {
        let status = BroadcastStatus {
            running: false,
            active_index: None,
            elapsed_seconds: None,
            total_seconds: 90.0,
            entry_count: 3,
            manual_offset_seconds: None,
        };
        assert_eq!(status.remaining_seconds(), None);
    }
}
