//! Media duration probing
//!
//! The probe never fails: a file that cannot be measured still gets a
//! positive duration so it can be scheduled and corrected by hand later.

use crate::config::ProbeConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Bytes per second assumed by the size-based estimate (2 MiB/s)
const ESTIMATE_BYTES_PER_SECOND: f64 = 2.0 * 1024.0 * 1024.0;

/// Measures how long a media file plays
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Duration in seconds; always finite and > 0
    async fn probe(&self, path: &Path) -> f64;
}

/// Probe backed by the `ffprobe` executable
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    ffprobe_path: PathBuf,
    timeout: Duration,
    fallback_seconds: f64,
    minimum_estimate_seconds: f64,
}

impl FfprobeProbe {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            ffprobe_path: config.ffprobe_path.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            fallback_seconds: config.fallback_seconds,
            minimum_estimate_seconds: config.minimum_estimate_seconds,
        }
    }

    /// Rough duration from file size, floored at the configured minimum
    pub fn estimate_from_size(&self, size_bytes: u64) -> f64 {
        (size_bytes as f64 / ESTIMATE_BYTES_PER_SECOND).max(self.minimum_estimate_seconds)
    }

    async fn estimate(&self, path: &Path) -> f64 {
        match tokio::fs::metadata(path).await {
            Ok(meta) => self.estimate_from_size(meta.len()),
            Err(e) => {
                warn!("Cannot stat {}: {}", path.display(), e);
                self.fallback_seconds
            }
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new(&ProbeConfig::default())
    }
}

#[async_trait]
impl DurationProbe for FfprobeProbe {
    async fn probe(&self, path: &Path) -> f64 {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, output).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(
                    "Could not run {} for {}: {} (using {}s)",
                    self.ffprobe_path.display(),
                    path.display(),
                    e,
                    self.fallback_seconds
                );
                return self.fallback_seconds;
            }
            Err(_) => {
                warn!(
                    "ffprobe timed out after {:?} for {} (using {}s)",
                    self.timeout,
                    path.display(),
                    self.fallback_seconds
                );
                return self.fallback_seconds;
            }
        };

        if output.status.success() {
            if let Some(seconds) = parse_ffprobe_output(&String::from_utf8_lossy(&output.stdout)) {
                debug!("Probed {}: {:.3}s", path.display(), seconds);
                return seconds;
            }
        }

        let estimate = self.estimate(path).await;
        warn!(
            "ffprobe gave no duration for {} (status {}), estimating {:.1}s from file size",
            path.display(),
            output.status,
            estimate
        );
        estimate
    }
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Extract `format.duration` from ffprobe JSON output
///
/// Returns `None` unless the duration parses to a finite positive number.
pub fn parse_ffprobe_output(json: &str) -> Option<f64> {
    let parsed: FfprobeOutput = serde_json::from_str(json).ok()?;
    let seconds: f64 = parsed.format.duration?.trim().parse().ok()?;
    (seconds.is_finite() && seconds > 0.0).then_some(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ffprobe_output() {
        let json = r#"{"format": {"filename": "a.mp4", "duration": "93.480000", "size": "1024"}}"#;
        assert_eq!(parse_ffprobe_output(json), Some(93.48));
    }

    #[test]
    fn test_parse_rejects_unusable_output() {
        assert_eq!(parse_ffprobe_output(""), None);
        assert_eq!(parse_ffprobe_output(r#"{"format": {}}"#), None);
        assert_eq!(parse_ffprobe_output(r#"{"format": {"duration": "N/A"}}"#), None);
        assert_eq!(parse_ffprobe_output(r#"{"format": {"duration": "0.000000"}}"#), None);
    }

    #[test]
    fn test_size_estimate_floor() {
        let probe = FfprobeProbe::default();
        assert_eq!(probe.estimate_from_size(0), 30.0);
        assert_eq!(probe.estimate_from_size(200 * 1024 * 1024), 100.0);
    }

    #[tokio::test]
    async fn test_missing_executable_uses_fallback() {
        let config = ProbeConfig {
            ffprobe_path: PathBuf::from("/nonexistent/ffprobe-for-tests"),
            ..ProbeConfig::default()
        };
        let probe = FfprobeProbe::new(&config);
        assert_eq!(probe.probe(Path::new("/tmp/whatever.mp4")).await, 60.0);
    }
}
