//! Presentation backend interface
//!
//! The scheduler only needs three capabilities from whatever actually puts
//! pictures on air: create a scene, attach a media file to it, and switch
//! to it. Concrete remote protocols live outside this crate; the
//! [`DryRunSwitcher`] logs the calls it would make.

mod dry_run;
mod naming;
mod prepare;

pub use dry_run::DryRunSwitcher;
pub use naming::{SceneNaming, DEFAULT_SCENE_NAME_CHARS, EMERGENCY_SCENE};
pub use prepare::{prepare_scenes, PrepareFailure, PrepareReport};

use crate::error::PresentationError;
use async_trait::async_trait;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Scene switcher capability consumed by the broadcast controller
#[async_trait]
pub trait SceneSwitcher: Send + Sync {
    /// Whether the backend is connected and able to take commands
    async fn is_available(&self) -> bool;

    /// Create the scene if it does not exist yet
    async fn ensure_scene(&self, name: &str) -> Result<(), PresentationError>;

    /// Create (or update) a media source in `scene` playing `file_path`
    async fn ensure_media_source(
        &self,
        scene: &str,
        source: &str,
        file_path: &Path,
    ) -> Result<(), PresentationError>;

    /// Put `scene` on air
    async fn activate(&self, scene: &str) -> Result<(), PresentationError>;
}

/// Bound a switcher call so a hung backend cannot wedge the controller
pub(crate) async fn bounded<F>(limit: Duration, call: F) -> Result<(), PresentationError>
where
    F: Future<Output = Result<(), PresentationError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(PresentationError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let ok = bounded(Duration::from_secs(1), async { Ok(()) }).await;
        assert_eq!(ok, Ok(()));

        let rejected = bounded(Duration::from_secs(1), async {
            Err(PresentationError::Unavailable("offline".to_string()))
        })
        .await;
        assert_eq!(rejected, Err(PresentationError::Unavailable("offline".to_string())));
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let limit = Duration::from_millis(10);
        let result = bounded(limit, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(PresentationError::Timeout(limit)));
    }
}
