//! Scene switcher that only logs
//!
//! Used by the CLI to rehearse a broadcast without a presentation backend.

use super::SceneSwitcher;
use crate::error::PresentationError;
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Always-available switcher that logs every call
#[derive(Debug, Default)]
pub struct DryRunSwitcher {
    activations: AtomicU64,
}

impl DryRunSwitcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SceneSwitcher for DryRunSwitcher {
    async fn is_available(&self) -> bool {
        true
    }

    async fn ensure_scene(&self, name: &str) -> Result<(), PresentationError> {
        info!("[dry-run] ensure scene {}", name);
        Ok(())
    }

    async fn ensure_media_source(
        &self,
        scene: &str,
        source: &str,
        file_path: &Path,
    ) -> Result<(), PresentationError> {
        info!(
            "[dry-run] ensure media source {} in {} -> {}",
            source,
            scene,
            file_path.display()
        );
        Ok(())
    }

    async fn activate(&self, scene: &str) -> Result<(), PresentationError> {
        let n = self.activations.fetch_add(1, Ordering::Relaxed) + 1;
        info!("[dry-run] activate {} (#{})", scene, n);
        Ok(())
    }
}
