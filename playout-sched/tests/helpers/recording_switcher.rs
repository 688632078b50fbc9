//! Scene switcher double with injectable failures

use async_trait::async_trait;
use playout_sched::{PresentationError, SceneSwitcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitcherCall {
    EnsureScene(String),
    EnsureMediaSource {
        scene: String,
        source: String,
        path: PathBuf,
    },
    Activate(String),
}

/// Records every call; scenes marked failing are rejected by every method
#[derive(Debug)]
pub struct RecordingSwitcher {
    calls: Mutex<Vec<SwitcherCall>>,
    activations: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    available: AtomicBool,
    hang: AtomicBool,
}

impl RecordingSwitcher {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            activations: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            available: AtomicBool::new(true),
            hang: AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make every `activate` call block until the caller's timeout fires
    pub fn set_hang(&self, hang: bool) {
        self.hang.store(hang, Ordering::SeqCst);
    }

    pub fn fail_scene(&self, scene: &str) {
        self.failing.lock().unwrap().insert(scene.to_string());
    }

    pub fn heal_scene(&self, scene: &str) {
        self.failing.lock().unwrap().remove(scene);
    }

    /// Every call attempted, in order (including failed ones)
    pub fn calls(&self) -> Vec<SwitcherCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Scenes successfully put on air, in order
    pub fn activations(&self) -> Vec<String> {
        self.activations.lock().unwrap().clone()
    }

    pub fn activation_attempts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, SwitcherCall::Activate(_)))
            .count()
    }

    fn record(&self, call: SwitcherCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, operation: &'static str, scene: &str) -> Result<(), PresentationError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(PresentationError::Unavailable("test switcher offline".to_string()));
        }
        if self.failing.lock().unwrap().contains(scene) {
            return Err(PresentationError::Rejected {
                operation,
                target: scene.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for RecordingSwitcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SceneSwitcher for RecordingSwitcher {
    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn ensure_scene(&self, name: &str) -> Result<(), PresentationError> {
        self.record(SwitcherCall::EnsureScene(name.to_string()));
        self.check("ensure_scene", name)
    }

    async fn ensure_media_source(
        &self,
        scene: &str,
        source: &str,
        file_path: &Path,
    ) -> Result<(), PresentationError> {
        self.record(SwitcherCall::EnsureMediaSource {
            scene: scene.to_string(),
            source: source.to_string(),
            path: file_path.to_path_buf(),
        });
        self.check("ensure_media_source", scene)
    }

    async fn activate(&self, scene: &str) -> Result<(), PresentationError> {
        self.record(SwitcherCall::Activate(scene.to_string()));
        if self.hang.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.check("activate", scene)?;
        self.activations.lock().unwrap().push(scene.to_string());
        Ok(())
    }
}
