//! Prepare phase: create one scene + media source per entry, plus the
//! reserved emergency scene.
//!
//! Failures are collected per entry instead of aborting the batch. Partial
//! success is a normal outcome and is reported as counts.

use super::{bounded, SceneNaming, SceneSwitcher, EMERGENCY_SCENE};
use crate::error::PresentationError;
use crate::schedule::Timeline;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One scene that could not be prepared
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareFailure {
    /// Entry index, or `None` for the emergency scene
    pub index: Option<usize>,
    pub scene_name: String,
    pub error: PresentationError,
}

/// Outcome of a prepare pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrepareReport {
    /// Entries whose scene and source were both created
    pub prepared: usize,
    /// Whether the emergency scene exists
    pub emergency_ready: bool,
    pub failures: Vec<PrepareFailure>,
}

impl PrepareReport {
    /// Number of entries that failed (emergency scene excluded)
    pub fn failed_entries(&self) -> usize {
        self.failures.iter().filter(|f| f.index.is_some()).count()
    }

    /// Every entry and the emergency scene are ready
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Create scenes and media sources for every timeline entry
pub async fn prepare_scenes(
    timeline: &Timeline,
    naming: &SceneNaming,
    switcher: &dyn SceneSwitcher,
    call_timeout: Duration,
) -> PrepareReport {
    let mut report = PrepareReport::default();

    for (index, entry) in timeline.entries().iter().enumerate() {
        let scene = naming.scene_name(index, entry.display_name());
        let source = naming.source_name(index);

        let result = async {
            bounded(call_timeout, switcher.ensure_scene(&scene)).await?;
            bounded(
                call_timeout,
                switcher.ensure_media_source(&scene, &source, entry.path()),
            )
            .await
        }
        .await;

        match result {
            Ok(()) => {
                debug!("Prepared {} ({}) for {}", scene, source, entry.path().display());
                report.prepared += 1;
            }
            Err(error) => {
                warn!("Failed to prepare {}: {}", scene, error);
                report.failures.push(PrepareFailure {
                    index: Some(index),
                    scene_name: scene,
                    error,
                });
            }
        }
    }

    match bounded(call_timeout, switcher.ensure_scene(EMERGENCY_SCENE)).await {
        Ok(()) => report.emergency_ready = true,
        Err(error) => {
            warn!("Failed to prepare {}: {}", EMERGENCY_SCENE, error);
            report.failures.push(PrepareFailure {
                index: None,
                scene_name: EMERGENCY_SCENE.to_string(),
                error,
            });
        }
    }

    info!(
        "Prepared {}/{} scenes (emergency scene {})",
        report.prepared,
        timeline.len(),
        if report.emergency_ready { "ready" } else { "missing" }
    );

    report
}
