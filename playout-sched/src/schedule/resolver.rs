//! Elapsed time → active entry index
//!
//! Returns the unique `i` with `starts[i] <= elapsed < ends[i]`, or `None`
//! before the first entry, at/after the end of the last, for an empty
//! timeline, or for NaN. A timestamp exactly on a boundary belongs to the
//! entry that *starts* there; this decides when transitions fire.
//!
//! O(log n): binary search over the cumulative starts.

use crate::schedule::timeline::Timeline;

/// Index of the entry on air at `elapsed` seconds
pub fn resolve(elapsed: f64, timeline: &Timeline) -> Option<usize> {
    if elapsed.is_nan() {
        return None;
    }

    let starts = timeline.cumulative_starts();

    // Number of entries starting at or before `elapsed`
    let count = starts.partition_point(|&start| start <= elapsed);
    let index = count.checked_sub(1)?;

    if elapsed < timeline.cumulative_ends()[index] {
        Some(index)
    } else {
        None
    }
}
