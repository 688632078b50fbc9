//! Timeline entries
//!
//! An entry is one scheduled media item with a fixed, strictly positive
//! duration. Entries are immutable once created.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Opaque handle to a media item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    /// Media file path (absolute once ingested)
    pub path: PathBuf,

    /// Name shown to the operator and used in generated scene names
    pub display_name: String,
}

/// One scheduled media item
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    id: Uuid,
    source: SourceRef,
    duration_seconds: f64,
}

impl Entry {
    /// Create a validated entry
    ///
    /// # Errors
    /// `Validation` if the duration is zero, negative, NaN or infinite.
    pub fn new(
        path: impl Into<PathBuf>,
        display_name: impl Into<String>,
        duration_seconds: f64,
    ) -> Result<Self> {
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(Error::Validation(format!(
                "Entry duration must be a positive number of seconds, got {}",
                duration_seconds
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            source: SourceRef {
                path: path.into(),
                display_name: display_name.into(),
            },
            duration_seconds,
        })
    }

    /// Create an entry whose display name is the file name of `path`
    pub fn from_path(path: impl Into<PathBuf>, duration_seconds: f64) -> Result<Self> {
        let path = path.into();
        let display_name = display_name_for(&path);
        Self::new(path, display_name, duration_seconds)
    }

    /// Same media and duration under a fresh id (block paste)
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: self.source.clone(),
            duration_seconds: self.duration_seconds,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    pub fn path(&self) -> &Path {
        &self.source.path
    }

    pub fn display_name(&self) -> &str {
        &self.source.display_name
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }
}

/// File name of a path, falling back to the whole path when it has none
pub(crate) fn display_name_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
