//! Extended M3U playlist rendering

use crate::schedule::Timeline;
use std::fmt::Write;
use std::path::Path;

/// `file:///` URI with forward slashes; `%`, `#` and spaces are percent-encoded
pub fn file_uri(path: &Path) -> String {
    // `%` goes first so the escapes below are not encoded twice
    let normalized = path
        .to_string_lossy()
        .replace('%', "%25")
        .replace('#', "%23")
        .replace('\\', "/")
        .replace(' ', "%20");
    format!("file:///{}", normalized.trim_start_matches('/'))
}

/// `#EXTM3U` header, then `#EXTINF:<whole seconds>,<name>` and a URI per entry
pub fn render_m3u(timeline: &Timeline) -> String {
    let mut out = String::from("#EXTM3U\n");
    for entry in timeline.entries() {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "#EXTINF:{},{}",
            entry.duration_seconds().trunc() as u64,
            entry.display_name()
        );
        let _ = writeln!(out, "{}", file_uri(entry.path()));
    }
    out
}
