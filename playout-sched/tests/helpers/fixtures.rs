//! Standard timelines and controller wiring

use super::RecordingSwitcher;
use playout_common::ScheduleEvent;
use playout_sched::broadcast::ControllerSettings;
use playout_sched::{BroadcastController, Entry, ManualClock, SceneNaming, Timeline};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::Receiver;

/// `[A:30, B:45, C:15]`, total 90 s
pub fn abc_timeline() -> Timeline {
    Timeline::from_entries(vec![
        Entry::new("/media/A.mp4", "A.mp4", 30.0).unwrap(),
        Entry::new("/media/B.mp4", "B.mp4", 45.0).unwrap(),
        Entry::new("/media/C.mp4", "C.mp4", 15.0).unwrap(),
    ])
}

/// Scene name the controller uses for `index` of [`abc_timeline`]
pub fn scene(index: usize) -> String {
    let names = ["A.mp4", "B.mp4", "C.mp4"];
    SceneNaming::default().scene_name(index, names[index])
}

/// Settings where the background loop never fires on its own
pub fn fast_settings() -> ControllerSettings {
    ControllerSettings {
        poll_interval: Duration::from_secs(3600),
        switcher_timeout: Duration::from_millis(200),
        stop_join_timeout: Duration::from_millis(500),
        ..ControllerSettings::default()
    }
}

pub struct TestRig {
    pub controller: BroadcastController,
    pub switcher: Arc<RecordingSwitcher>,
    pub clock: Arc<ManualClock>,
}

pub fn build_controller(timeline: Timeline, settings: ControllerSettings) -> TestRig {
    let switcher = Arc::new(RecordingSwitcher::new());
    let clock = Arc::new(ManualClock::new());
    let controller = BroadcastController::new(timeline, switcher.clone(), clock.clone(), settings);
    TestRig {
        controller,
        switcher,
        clock,
    }
}

/// Everything published so far, without waiting
pub fn drain_events(rx: &mut Receiver<ScheduleEvent>) -> Vec<ScheduleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
