//! Persisted schedule exports (M3U playlist + JSON schedule)

mod m3u;
mod schedule;

pub use m3u::{file_uri, render_m3u};
pub use schedule::{ScheduleDocument, ScheduleRow};

use crate::error::{Error, Result};
use crate::schedule::Timeline;
use crate::switcher::SceneNaming;
use std::path::{Path, PathBuf};
use tracing::info;

/// Paths written by [`write_exports`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub m3u: PathBuf,
    pub schedule_json: PathBuf,
}

/// `<dir>/<stem>_schedule.json` next to the playlist
pub fn schedule_json_path(m3u_path: &Path) -> PathBuf {
    let stem = m3u_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "playlist".to_string());
    m3u_path.with_file_name(format!("{}_schedule.json", stem))
}

/// Write the M3U playlist and its sibling JSON schedule
pub fn write_exports(
    timeline: &Timeline,
    naming: &SceneNaming,
    m3u_path: &Path,
) -> Result<ExportPaths> {
    if timeline.is_empty() {
        return Err(Error::Validation("Nothing to export: timeline is empty".to_string()));
    }

    let schedule_json = schedule_json_path(m3u_path);
    let document = ScheduleDocument::from_timeline(timeline, naming);

    std::fs::write(m3u_path, render_m3u(timeline))?;
    std::fs::write(&schedule_json, document.to_json()?)?;

    info!(
        "Exported {} entries to {} and {}",
        timeline.len(),
        m3u_path.display(),
        schedule_json.display()
    );

    Ok(ExportPaths {
        m3u: m3u_path.to_path_buf(),
        schedule_json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_json_path() {
        assert_eq!(
            schedule_json_path(Path::new("/out/evening.m3u")),
            PathBuf::from("/out/evening_schedule.json")
        );
        assert_eq!(
            schedule_json_path(Path::new("list")),
            PathBuf::from("list_schedule.json")
        );
    }

    #[test]
    fn test_refuses_empty_timeline() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_exports(
            &Timeline::new(),
            &SceneNaming::default(),
            &dir.path().join("x.m3u"),
        );
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(!dir.path().join("x.m3u").exists());
    }
}
