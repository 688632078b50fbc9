//! Ordered playlist with cumulative offsets
//!
//! Insertion order is schedule order. Every mutation recomputes the
//! cumulative start/end arrays in full, so they always partition
//! `[0, total)` into half-open intervals:
//! - `starts[0] == 0`
//! - `ends[i] == starts[i] + duration[i]`
//! - `ends[i] == starts[i + 1]` exactly (same float, no gaps or overlaps)
//!
//! Playlists are human-curated, so O(n) recomputation is fine.

use crate::error::{Error, Result};
use crate::schedule::entry::Entry;

/// Ordered entries plus derived cumulative offsets (seconds)
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<Entry>,
    starts: Vec<f64>,
    ends: Vec<f64>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timeline from entries in schedule order
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut timeline = Self {
            entries,
            starts: Vec::new(),
            ends: Vec::new(),
        };
        timeline.recompute();
        timeline
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Cumulative start offsets, one per entry
    pub fn cumulative_starts(&self) -> &[f64] {
        &self.starts
    }

    /// Cumulative end offsets, one per entry
    pub fn cumulative_ends(&self) -> &[f64] {
        &self.ends
    }

    /// Schedule offset at which entry `index` begins
    pub fn start_of(&self, index: usize) -> Option<f64> {
        self.starts.get(index).copied()
    }

    /// Total duration in seconds (0 for an empty timeline)
    pub fn total_duration(&self) -> f64 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    /// Append entries at the end
    pub fn append(&mut self, entries: impl IntoIterator<Item = Entry>) {
        self.entries.extend(entries);
        self.recompute();
    }

    /// Insert entries before position `at`; `at >= len` appends
    pub fn insert(&mut self, at: usize, entries: impl IntoIterator<Item = Entry>) {
        let at = at.min(self.entries.len());
        self.entries.splice(at..at, entries);
        self.recompute();
    }

    /// Move selected rows one position earlier.
    ///
    /// Rows are swapped with their predecessor in ascending index order. A
    /// row at the top, or directly behind a selected row that could not
    /// move, stays put, so a block touching the edge keeps its order.
    ///
    /// Returns the new positions of the selected rows (ascending).
    ///
    /// # Errors
    /// `Validation` if any index is out of range; nothing is moved.
    pub fn move_up(&mut self, indices: &[usize]) -> Result<Vec<usize>> {
        let selection = self.normalize_selection(indices)?;
        let mut positions: Vec<usize> = Vec::with_capacity(selection.len());

        for &i in &selection {
            let blocked = i == 0 || positions.last() == Some(&(i - 1));
            if blocked {
                positions.push(i);
            } else {
                self.entries.swap(i, i - 1);
                positions.push(i - 1);
            }
        }

        self.recompute();
        Ok(positions)
    }

    /// Move selected rows one position later.
    ///
    /// Mirror image of [`Timeline::move_up`]: swaps run in descending index
    /// order and rows at the bottom stay put.
    pub fn move_down(&mut self, indices: &[usize]) -> Result<Vec<usize>> {
        let selection = self.normalize_selection(indices)?;
        let last = self.entries.len().saturating_sub(1);
        let mut positions: Vec<usize> = Vec::with_capacity(selection.len());

        for &i in selection.iter().rev() {
            let blocked = i == last || positions.last() == Some(&(i + 1));
            if blocked {
                positions.push(i);
            } else {
                self.entries.swap(i, i + 1);
                positions.push(i + 1);
            }
        }

        self.recompute();
        positions.reverse();
        Ok(positions)
    }

    /// Delete selected rows, returning them in schedule order.
    ///
    /// Removal runs in descending index order so earlier removals never
    /// shift later targets.
    ///
    /// # Errors
    /// `Validation` if any index is out of range; nothing is removed.
    pub fn delete(&mut self, indices: &[usize]) -> Result<Vec<Entry>> {
        let selection = self.normalize_selection(indices)?;
        let mut removed = Vec::with_capacity(selection.len());

        for &i in selection.iter().rev() {
            removed.push(self.entries.remove(i));
        }

        self.recompute();
        removed.reverse();
        Ok(removed)
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recompute();
    }

    /// Copy selected rows (every row when the selection is empty)
    pub fn copy_block(&self, indices: &[usize]) -> Result<Vec<Entry>> {
        if indices.is_empty() {
            return Ok(self.entries.clone());
        }
        let selection = self.normalize_selection(indices)?;
        Ok(selection.iter().map(|&i| self.entries[i].clone()).collect())
    }

    /// Paste copies of `block` with fresh ids at `at` (`None` appends).
    ///
    /// Returns the number of pasted entries.
    pub fn paste_block(&mut self, at: Option<usize>, block: &[Entry]) -> usize {
        let copies: Vec<Entry> = block.iter().map(Entry::duplicate).collect();
        let count = copies.len();
        match at {
            Some(at) => self.insert(at, copies),
            None => self.append(copies),
        }
        count
    }

    /// Sorted, de-duplicated, range-checked selection
    fn normalize_selection(&self, indices: &[usize]) -> Result<Vec<usize>> {
        let mut selection = indices.to_vec();
        selection.sort_unstable();
        selection.dedup();

        if let Some(&bad) = selection.iter().find(|&&i| i >= self.entries.len()) {
            return Err(Error::Validation(format!(
                "Index {} out of range for timeline of {} entries",
                bad,
                self.entries.len()
            )));
        }
        Ok(selection)
    }

    fn recompute(&mut self) {
        self.starts.clear();
        self.ends.clear();
        self.starts.reserve(self.entries.len());
        self.ends.reserve(self.entries.len());

        let mut offset = 0.0_f64;
        for entry in &self.entries {
            self.starts.push(offset);
            offset += entry.duration_seconds();
            self.ends.push(offset);
        }
    }
}
