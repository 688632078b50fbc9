//! Broadcast controller
//!
//! Idle → Running → Idle. All state (timeline plus the running broadcast)
//! sits behind a single `tokio::sync::Mutex` that is held for the whole of
//! each operation, including the switcher call made by `tick`. Switcher
//! calls are bounded by `switcher_timeout`, so the lock is never held
//! indefinitely.
//!
//! Each broadcast gets a fresh epoch and cancellation token. A poll task
//! whose epoch is no longer current does nothing and exits.

use super::poll::spawn_poll_loop;
use super::status::{BroadcastStatus, TickOutcome};
use crate::config::TomlConfig;
use crate::error::{Error, PresentationError, Result};
use crate::schedule::{resolve, Clock, ScheduleOrigin, Timeline};
use crate::switcher::{bounded, prepare_scenes, PrepareReport, SceneNaming, SceneSwitcher};
use chrono::Utc;
use playout_common::events::{EventBus, ScheduleEvent, ShiftKind, StopReason};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Tunables for a [`BroadcastController`]
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub poll_interval: Duration,
    pub switcher_timeout: Duration,
    pub stop_join_timeout: Duration,
    pub auto_stop_when_exhausted: bool,
    pub naming: SceneNaming,
    pub event_channel_capacity: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            switcher_timeout: Duration::from_secs(3),
            stop_join_timeout: Duration::from_secs(2),
            auto_stop_when_exhausted: false,
            naming: SceneNaming::default(),
            event_channel_capacity: 100,
        }
    }
}

impl ControllerSettings {
    pub fn from_config(config: &TomlConfig) -> Self {
        Self {
            poll_interval: config.scheduler.poll_interval(),
            switcher_timeout: config.scheduler.switcher_timeout(),
            stop_join_timeout: config.scheduler.stop_join_timeout(),
            auto_stop_when_exhausted: config.scheduler.auto_stop_when_exhausted,
            naming: config.naming.scene_naming(),
            event_channel_capacity: config.scheduler.event_channel_capacity,
        }
    }
}

/// State that exists only while Running
struct BroadcastState {
    origin: ScheduleOrigin,
    active_index: Option<usize>,
    epoch: u64,
    exhausted_reported: bool,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

struct ControllerInner {
    timeline: Timeline,
    broadcast: Option<BroadcastState>,
    next_epoch: u64,
}

/// Drives a [`SceneSwitcher`] from a [`Timeline`] and an injected [`Clock`]
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct BroadcastController {
    inner: Arc<Mutex<ControllerInner>>,
    switcher: Arc<dyn SceneSwitcher>,
    clock: Arc<dyn Clock>,
    events: EventBus,
    settings: ControllerSettings,
}

impl BroadcastController {
    pub fn new(
        timeline: Timeline,
        switcher: Arc<dyn SceneSwitcher>,
        clock: Arc<dyn Clock>,
        settings: ControllerSettings,
    ) -> Self {
        let events = EventBus::new(settings.event_channel_capacity);
        Self {
            inner: Arc::new(Mutex::new(ControllerInner {
                timeline,
                broadcast: None,
                next_epoch: 1,
            })),
            switcher,
            clock,
            events,
            settings,
        }
    }

    /// Subscribe to status events
    pub fn subscribe(&self) -> broadcast::Receiver<ScheduleEvent> {
        self.events.subscribe()
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Begin a broadcast with the given initial manual offset
    ///
    /// The first tick runs before this returns, so the entry due at
    /// `start_offset_seconds` is already on air (or its failure published)
    /// when the call completes.
    ///
    /// # Errors
    /// - `InvalidState` if a broadcast is already running
    /// - `Validation` if the timeline is empty or the offset is not finite
    /// - `Presentation` if the switcher reports itself unavailable
    pub async fn start(&self, start_offset_seconds: f64) -> Result<()> {
        let mut inner = self.inner.lock().await;

        if inner.broadcast.is_some() {
            return Err(Error::InvalidState("Broadcast already running".to_string()));
        }
        if inner.timeline.is_empty() {
            return Err(Error::Validation(
                "Cannot start a broadcast with an empty timeline".to_string(),
            ));
        }
        if !start_offset_seconds.is_finite() {
            return Err(Error::Validation(format!(
                "Start offset must be finite, got {}",
                start_offset_seconds
            )));
        }
        if !self.switcher_available().await {
            return Err(PresentationError::Unavailable(
                "Scene switcher reported itself unavailable".to_string(),
            )
            .into());
        }

        let epoch = inner.next_epoch;
        inner.next_epoch += 1;
        let cancel = CancellationToken::new();

        inner.broadcast = Some(BroadcastState {
            origin: ScheduleOrigin::new(self.clock.now(), start_offset_seconds),
            active_index: None,
            epoch,
            exhausted_reported: false,
            cancel: cancel.clone(),
            task: None,
        });

        let entry_count = inner.timeline.len();
        let total_seconds = inner.timeline.total_duration();
        info!(
            "Broadcast started: {} entries, {:.3}s total, start offset {:.3}s (epoch {})",
            entry_count, total_seconds, start_offset_seconds, epoch
        );
        self.events.emit_lossy(ScheduleEvent::BroadcastStarted {
            start_offset_seconds,
            entry_count,
            total_seconds,
            timestamp: Utc::now(),
        });

        self.tick_locked(&mut inner).await;

        // Auto-stop may already have ended the broadcast
        if let Some(state) = inner.broadcast.as_mut() {
            state.task = Some(spawn_poll_loop(
                self.clone(),
                epoch,
                cancel,
                self.settings.poll_interval,
            ));
        }

        Ok(())
    }

    /// End the broadcast; a no-op when already idle
    ///
    /// Cancels the poll task and waits at most `stop_join_timeout` for it
    /// to exit before aborting it.
    pub async fn stop(&self) -> Result<()> {
        let state = {
            let mut inner = self.inner.lock().await;
            inner.broadcast.take()
        };

        let Some(mut state) = state else {
            debug!("Stop requested while idle");
            return Ok(());
        };

        state.cancel.cancel();
        info!(
            "Broadcast stopped by operator (last index {:?}, epoch {})",
            state.active_index, state.epoch
        );
        self.events.emit_lossy(ScheduleEvent::BroadcastStopped {
            reason: StopReason::Operator,
            last_index: state.active_index,
            timestamp: Utc::now(),
        });

        // Lock released above so a tick waiting on it can observe the cancel
        if let Some(mut task) = state.task.take() {
            match tokio::time::timeout(self.settings.stop_join_timeout, &mut task).await {
                Ok(Ok(())) => debug!("Poll task joined (epoch {})", state.epoch),
                Ok(Err(e)) => warn!("Poll task ended abnormally: {}", e),
                Err(_) => {
                    warn!(
                        "Poll task did not exit within {:?}, aborting",
                        self.settings.stop_join_timeout
                    );
                    task.abort();
                }
            }
        }

        Ok(())
    }

    /// Resolve the current entry and present it if it changed
    ///
    /// The poll loop calls this on every interval; it is public so callers
    /// driving a [`ManualClock`](crate::schedule::ManualClock) can step the
    /// schedule deterministically.
    ///
    /// # Errors
    /// `InvalidState` when no broadcast is running. Presentation failures
    /// are reported through the outcome and the event channel instead.
    pub async fn tick(&self) -> Result<TickOutcome> {
        let mut inner = self.inner.lock().await;
        if inner.broadcast.is_none() {
            return Err(Error::InvalidState("No broadcast running".to_string()));
        }
        Ok(self.tick_locked(&mut inner).await)
    }

    /// Tick on behalf of the poll task of `epoch`
    ///
    /// Returns `None` once that broadcast is over, telling the task to exit.
    pub(super) async fn tick_for_epoch(&self, epoch: u64) -> Option<TickOutcome> {
        let mut inner = self.inner.lock().await;
        match &inner.broadcast {
            Some(state) if state.epoch == epoch && !state.cancel.is_cancelled() => {}
            _ => return None,
        }
        Some(self.tick_locked(&mut inner).await)
    }

    async fn tick_locked(&self, inner: &mut ControllerInner) -> TickOutcome {
        let now = self.clock.now();
        let ControllerInner {
            timeline,
            broadcast,
            ..
        } = inner;

        let Some(state) = broadcast.as_mut() else {
            return TickOutcome::Unchanged(None);
        };

        let elapsed = state.origin.elapsed_at(now);

        match resolve(elapsed, timeline) {
            Some(target) if state.active_index == Some(target) => {
                TickOutcome::Unchanged(Some(target))
            }
            Some(target) => {
                let display_name = timeline
                    .get(target)
                    .map(|entry| entry.display_name())
                    .unwrap_or_default();
                let scene = self.settings.naming.scene_name(target, display_name);

                match bounded(self.settings.switcher_timeout, self.switcher.activate(&scene)).await
                {
                    Ok(()) => {
                        let previous_index = state.active_index.replace(target);
                        info!(
                            "Activated {} at {:.3}s (previous {:?})",
                            scene, elapsed, previous_index
                        );
                        self.events.emit_lossy(ScheduleEvent::EntryActivated {
                            index: target,
                            previous_index,
                            scene_name: scene,
                            elapsed_seconds: elapsed,
                            timestamp: Utc::now(),
                        });
                        TickOutcome::Activated(target)
                    }
                    Err(e) => {
                        warn!("Failed to activate {}: {} (will retry)", scene, e);
                        self.events.emit_lossy(ScheduleEvent::ActivationFailed {
                            index: target,
                            scene_name: scene,
                            error: e.to_string(),
                            timestamp: Utc::now(),
                        });
                        TickOutcome::ActivationFailed(target)
                    }
                }
            }
            None => {
                let total_seconds = timeline.total_duration();

                // Before the first entry: keep waiting
                if elapsed.is_nan() || elapsed < total_seconds {
                    return TickOutcome::Unchanged(state.active_index);
                }

                if !state.exhausted_reported {
                    state.exhausted_reported = true;
                    info!(
                        "Playlist exhausted at {:.3}s (total {:.3}s)",
                        elapsed, total_seconds
                    );
                    self.events.emit_lossy(ScheduleEvent::PlaylistExhausted {
                        elapsed_seconds: elapsed,
                        total_seconds,
                        timestamp: Utc::now(),
                    });
                }

                if self.settings.auto_stop_when_exhausted {
                    if let Some(ended) = broadcast.take() {
                        ended.cancel.cancel();
                        info!("Broadcast stopped: playlist exhausted (epoch {})", ended.epoch);
                        self.events.emit_lossy(ScheduleEvent::BroadcastStopped {
                            reason: StopReason::Exhausted,
                            last_index: ended.active_index,
                            timestamp: Utc::now(),
                        });
                    }
                }

                TickOutcome::Exhausted
            }
        }
    }

    /// Shift the schedule so the entry after the active one is due now
    ///
    /// Returns the index that the next tick will present, or `None` when
    /// the active entry is already the last one (nothing changes).
    /// `active_index` itself is left for the next tick to update.
    pub async fn skip_to_next(&self) -> Result<Option<usize>> {
        let mut inner = self.inner.lock().await;
        let active = inner
            .broadcast
            .as_ref()
            .ok_or_else(|| Error::InvalidState("Skip requires a running broadcast".to_string()))?
            .active_index;

        let next = active.map_or(0, |i| i + 1);
        if next >= inner.timeline.len() {
            info!("Skip ignored: entry {:?} is the last one", active);
            return Ok(None);
        }

        self.shift_to_entry(&mut inner, ShiftKind::Skip, next)?;
        Ok(Some(next))
    }

    /// Shift the schedule so entry `index` is due now (forward or rewind)
    pub async fn jump_to(&self, index: usize) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.broadcast.is_none() {
            return Err(Error::InvalidState("Jump requires a running broadcast".to_string()));
        }
        if index >= inner.timeline.len() {
            return Err(Error::Validation(format!(
                "Jump target {} out of range (timeline has {} entries)",
                index,
                inner.timeline.len()
            )));
        }

        self.shift_to_entry(&mut inner, ShiftKind::Jump, index)
    }

    fn shift_to_entry(
        &self,
        inner: &mut ControllerInner,
        kind: ShiftKind,
        target_index: usize,
    ) -> Result<()> {
        let target_start = inner.timeline.start_of(target_index).ok_or_else(|| {
            Error::Validation(format!("Entry {} does not exist", target_index))
        })?;
        let state = inner
            .broadcast
            .as_mut()
            .ok_or_else(|| Error::InvalidState("No broadcast running".to_string()))?;

        let delta_seconds = state.origin.shift_to(target_start, self.clock.now());
        let manual_offset_seconds = state.origin.manual_offset_seconds();
        // Back inside the playlist: the next end gets reported again
        state.exhausted_reported = false;

        info!(
            "{} to entry {}: offset {:+.3}s (manual offset now {:.3}s)",
            kind, target_index, delta_seconds, manual_offset_seconds
        );
        self.events.emit_lossy(ScheduleEvent::ScheduleShifted {
            kind,
            target_index,
            delta_seconds,
            manual_offset_seconds,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Put `scene` on air immediately, outside the schedule
    ///
    /// `active_index` is untouched, so the scene stays up until the
    /// schedule resolves a different entry. Allowed while idle.
    pub async fn emergency_override(&self, scene: &str) -> Result<()> {
        if scene.trim().is_empty() {
            return Err(Error::Validation("Emergency scene name is empty".to_string()));
        }

        let inner = self.inner.lock().await;
        let active_index = inner.broadcast.as_ref().and_then(|s| s.active_index);

        bounded(self.settings.switcher_timeout, self.switcher.activate(scene)).await?;

        warn!("Emergency override: {} on air (schedule index {:?})", scene, active_index);
        self.events.emit_lossy(ScheduleEvent::EmergencyActivated {
            scene_name: scene.to_string(),
            active_index,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Create scenes and media sources for every entry (Idle only)
    pub async fn prepare(&self) -> Result<PrepareReport> {
        let inner = self.inner.lock().await;
        if inner.broadcast.is_some() {
            return Err(Error::InvalidState(
                "Scenes cannot be prepared while a broadcast is running".to_string(),
            ));
        }

        let report = prepare_scenes(
            &inner.timeline,
            &self.settings.naming,
            self.switcher.as_ref(),
            self.settings.switcher_timeout,
        )
        .await;

        self.events.emit_lossy(ScheduleEvent::ScenesPrepared {
            prepared: report.prepared,
            failed: report.failures.len(),
            timestamp: Utc::now(),
        });

        Ok(report)
    }

    /// Apply a structural edit to the timeline (Idle only)
    pub async fn edit_timeline<F, R>(&self, edit: F) -> Result<R>
    where
        F: FnOnce(&mut Timeline) -> Result<R>,
    {
        let mut inner = self.inner.lock().await;
        if inner.broadcast.is_some() {
            return Err(Error::InvalidState(
                "Timeline cannot be edited while a broadcast is running".to_string(),
            ));
        }
        edit(&mut inner.timeline)
    }

    pub async fn timeline_snapshot(&self) -> Timeline {
        self.inner.lock().await.timeline.clone()
    }

    pub async fn is_running(&self) -> bool {
        self.inner.lock().await.broadcast.is_some()
    }

    pub async fn active_index(&self) -> Option<usize> {
        self.inner
            .lock()
            .await
            .broadcast
            .as_ref()
            .and_then(|s| s.active_index)
    }

    pub async fn status(&self) -> BroadcastStatus {
        let inner = self.inner.lock().await;
        let now = self.clock.now();
        let state = inner.broadcast.as_ref();

        BroadcastStatus {
            running: state.is_some(),
            active_index: state.and_then(|s| s.active_index),
            elapsed_seconds: state.map(|s| s.origin.elapsed_at(now)),
            total_seconds: inner.timeline.total_duration(),
            entry_count: inner.timeline.len(),
            manual_offset_seconds: state.map(|s| s.origin.manual_offset_seconds()),
        }
    }

    async fn switcher_available(&self) -> bool {
        tokio::time::timeout(self.settings.switcher_timeout, self.switcher.is_available())
            .await
            .unwrap_or(false)
    }
}
