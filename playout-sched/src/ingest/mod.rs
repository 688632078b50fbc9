//! Building timeline entries from files and folders

mod probe;

pub use probe::{parse_ffprobe_output, DurationProbe, FfprobeProbe};

use crate::error::{Error, Result};
use crate::schedule::Entry;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extensions treated as video (compared case-insensitively)
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm"];

pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Video files directly inside `dir`, sorted by path (not recursive)
pub fn scan_folder(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_video_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    debug!("Found {} video files in {}", files.len(), dir.display());
    Ok(files)
}

/// Probe every input and build entries in input order
///
/// Folders expand to their video files; plain files are taken as given,
/// whatever their extension. Paths are made absolute.
pub async fn ingest(inputs: &[PathBuf], probe: &dyn DurationProbe) -> Result<Vec<Entry>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(scan_folder(input)?);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(Error::Validation(format!(
                "Input not found: {}",
                input.display()
            )));
        }
    }

    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        let path = absolute(&file)?;
        let duration = probe.probe(&path).await;
        entries.push(Entry::from_path(path, duration)?);
    }

    info!("Ingested {} entries", entries.len());
    Ok(entries)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    struct FixedProbe(f64);

    #[async_trait]
    impl DurationProbe for FixedProbe {
        async fn probe(&self, _path: &Path) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("a.mp4")));
        assert!(is_video_file(Path::new("B.MKV")));
        assert!(is_video_file(Path::new("/x/y/clip.WebM")));
        assert!(!is_video_file(Path::new("notes.txt")));
        assert!(!is_video_file(Path::new("mp4")));
    }

    #[test]
    fn test_scan_folder_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.mov", "a.MP4", "readme.txt", "c.webm"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.mp4")).unwrap();

        let names: Vec<String> = scan_folder(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.MP4", "b.mov", "c.webm"]);
    }

    #[tokio::test]
    async fn test_ingest_mixes_files_and_folders() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("show");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("2.mp4"), b"x").unwrap();
        fs::write(folder.join("1.mp4"), b"x").unwrap();
        let single = dir.path().join("promo.avi");
        fs::write(&single, b"x").unwrap();

        let entries = ingest(&[single.clone(), folder], &FixedProbe(12.5))
            .await
            .unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.display_name()).collect();
        assert_eq!(names, vec!["promo.avi", "1.mp4", "2.mp4"]);
        assert!(entries.iter().all(|e| e.path().is_absolute()));
        assert!(entries.iter().all(|e| e.duration_seconds() == 12.5));
    }

    #[tokio::test]
    async fn test_ingest_missing_input() {
        let result = ingest(&[PathBuf::from("/no/such/file.mp4")], &FixedProbe(1.0)).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
