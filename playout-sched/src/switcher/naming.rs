//! Generated scene and source identifiers
//!
//! Names are derived from the entry's position, so they are stable for a
//! given timeline and never collide across entries:
//! - scene: `Video_{index+1:03}_{first N chars of display name}`
//! - source: `Media_{index+1:03}`

/// Reserved scene used by emergency override
pub const EMERGENCY_SCENE: &str = "Emergency_Scene";

/// Default number of display-name characters kept in scene names
pub const DEFAULT_SCENE_NAME_CHARS: usize = 20;

/// Scene/source naming policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneNaming {
    name_chars: usize,
}

impl SceneNaming {
    pub fn new(name_chars: usize) -> Self {
        Self { name_chars }
    }

    /// Scene name for the entry at `index` (0-based)
    ///
    /// Truncation counts characters, not bytes, so multi-byte names are
    /// never split mid-character.
    pub fn scene_name(&self, index: usize, display_name: &str) -> String {
        let prefix: String = display_name.chars().take(self.name_chars).collect();
        format!("Video_{:03}_{}", index + 1, prefix)
    }

    /// Media source name for the entry at `index` (0-based)
    pub fn source_name(&self, index: usize) -> String {
        format!("Media_{:03}", index + 1)
    }
}

impl Default for SceneNaming {
    fn default() -> Self {
        Self::new(DEFAULT_SCENE_NAME_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_name_padding_and_truncation() {
        let naming = SceneNaming::default();
        assert_eq!(naming.scene_name(0, "intro.mp4"), "Video_001_intro.mp4");
        assert_eq!(
            naming.scene_name(41, "A very long programme title.mkv"),
            "Video_042_A very long programm"
        );
        assert_eq!(naming.scene_name(999, "x"), "Video_1000_x");
    }

    #[test]
    fn test_truncation_is_char_based() {
        let naming = SceneNaming::new(3);
        assert_eq!(naming.scene_name(0, "éèêë.mp4"), "Video_001_éèê");
    }

    #[test]
    fn test_source_names() {
        let naming = SceneNaming::default();
        assert_eq!(naming.source_name(0), "Media_001");
        assert_eq!(naming.source_name(9), "Media_010");
    }

    #[test]
    fn test_same_display_name_still_unique() {
        let naming = SceneNaming::default();
        assert_ne!(naming.scene_name(0, "loop.mp4"), naming.scene_name(1, "loop.mp4"));
    }
}
