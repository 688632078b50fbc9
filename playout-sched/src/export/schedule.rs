//! JSON schedule document
//!
//! One row per entry with absolute offsets in seconds and `HH:MM:SS`, plus
//! the scene name the controller will activate, so external automation can
//! follow the broadcast without talking to the controller.

use crate::error::Result;
use crate::schedule::Timeline;
use crate::switcher::SceneNaming;
use playout_common::format_hms;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    pub total_duration: f64,
    pub total_duration_formatted: String,
    pub entries: Vec<ScheduleRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 0-based position in the timeline
    pub index: usize,
    pub filename: String,
    pub filepath: String,
    pub duration: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub start_time_formatted: String,
    pub end_time_formatted: String,
    pub scene_name: String,
}

impl ScheduleDocument {
    pub fn from_timeline(timeline: &Timeline, naming: &SceneNaming) -> Self {
        let starts = timeline.cumulative_starts();
        let ends = timeline.cumulative_ends();

        let entries = timeline
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| ScheduleRow {
                index,
                filename: entry.display_name().to_string(),
                filepath: entry.path().to_string_lossy().into_owned(),
                duration: entry.duration_seconds(),
                start_time: starts[index],
                end_time: ends[index],
                start_time_formatted: format_hms(starts[index]),
                end_time_formatted: format_hms(ends[index]),
                scene_name: naming.scene_name(index, entry.display_name()),
            })
            .collect();

        let total_duration = timeline.total_duration();
        Self {
            total_duration,
            total_duration_formatted: format_hms(total_duration),
            entries,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Recompute (starts, ends) from the exported durations alone
    ///
    /// Accumulates in row order exactly like [`Timeline`], so the result
    /// matches the timeline's cumulative arrays bit for bit.
    pub fn rederive_offsets(&self) -> (Vec<f64>, Vec<f64>) {
        let mut starts = Vec::with_capacity(self.entries.len());
        let mut ends = Vec::with_capacity(self.entries.len());
        let mut offset = 0.0_f64;
        for row in &self.entries {
            starts.push(offset);
            offset += row.duration;
            ends.push(offset);
        }
        (starts, ends)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Entry;

    fn timeline() -> Timeline {
        Timeline::from_entries(vec![
            Entry::new("/media/a.mp4", "a.mp4", 30.0).unwrap(),
            Entry::new("/media/b.mp4", "b.mp4", 45.0).unwrap(),
            Entry::new("/media/c.mp4", "c.mp4", 15.0).unwrap(),
        ])
    }

    #[test]
    fn test_rows() {
        let doc = ScheduleDocument::from_timeline(&timeline(), &SceneNaming::default());
        assert_eq!(doc.total_duration, 90.0);
        assert_eq!(doc.total_duration_formatted, "00:01:30");

        let b = &doc.entries[1];
        assert_eq!(b.index, 1);
        assert_eq!(b.filename, "b.mp4");
        assert_eq!(b.filepath, "/media/b.mp4");
        assert_eq!((b.start_time, b.end_time), (30.0, 75.0));
        assert_eq!(b.start_time_formatted, "00:00:30");
        assert_eq!(b.end_time_formatted, "00:01:15");
        assert_eq!(b.scene_name, "Video_002_b.mp4");
    }

    #[test]
    fn test_json_field_names() {
        let doc = ScheduleDocument::from_timeline(&timeline(), &SceneNaming::default());
        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(value["entries"][2]["start_time_formatted"], "00:01:15");
        assert_eq!(value["entries"][0]["scene_name"], "Video_001_a.mp4");
        assert_eq!(value["total_duration"], 90.0);
    }

    #[test]
    fn test_empty_timeline_document() {
        let doc = ScheduleDocument::from_timeline(&Timeline::new(), &SceneNaming::default());
        assert!(doc.entries.is_empty());
        assert_eq!(doc.rederive_offsets(), (vec![], vec![]));
    }
}
