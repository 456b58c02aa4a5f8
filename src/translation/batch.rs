/*!
 * Batch planning for provider calls.
 *
 * Entries are grouped in original order under two limits: an entry-count cap
 * and an approximate payload-size budget. A single oversized entry is never
 * split; it simply ends up alone in its batch.
 */

use log::debug;

use crate::subtitle_processor::SubtitleEntry;

/// Approximate per-entry payload overhead (markers and newlines)
pub const ENTRY_OVERHEAD_CHARS: usize = 40;

/// Smallest character budget a batch may be planned with
pub const MIN_BATCH_CHARS: usize = 512;

/// Groups subtitle entries into provider-sized batches
#[derive(Debug, Clone, Copy)]
pub struct BatchPlanner {
    max_entries_per_batch: usize,
    max_chars_per_batch: usize,
}

impl BatchPlanner {
    /// Create a planner; degenerate limits are clamped to safe minimums
    pub fn new(max_entries_per_batch: usize, max_chars_per_batch: usize) -> Self {
        Self {
            max_entries_per_batch: max_entries_per_batch.max(1),
            max_chars_per_batch: max_chars_per_batch.max(MIN_BATCH_CHARS),
        }
    }

    pub fn max_entries_per_batch(&self) -> usize {
        self.max_entries_per_batch
    }

    pub fn max_chars_per_batch(&self) -> usize {
        self.max_chars_per_batch
    }

    /// Estimated payload size of one entry
    pub fn entry_chars(entry: &SubtitleEntry) -> usize {
        ENTRY_OVERHEAD_CHARS + entry.original_text().chars().count()
    }

    /// Partition entries into ordered, non-empty batches.
    ///
    /// The concatenation of the returned batches equals the input.
    pub fn plan(&self, entries: &[SubtitleEntry]) -> Vec<Vec<SubtitleEntry>> {
        if entries.is_empty() {
            return Vec::new();
        }

        let capacity = self.max_entries_per_batch.min(entries.len());
        let mut batches = Vec::new();
        let mut current: Vec<SubtitleEntry> = Vec::with_capacity(capacity);
        let mut current_chars = 0;

        for entry in entries {
            let entry_chars = Self::entry_chars(entry);

            let would_exceed_count = current.len() >= self.max_entries_per_batch;
            let would_exceed_chars =
                !current.is_empty() && current_chars + 1 + entry_chars > self.max_chars_per_batch;

            if would_exceed_count || would_exceed_chars {
                batches.push(std::mem::replace(&mut current, Vec::with_capacity(capacity)));
                current_chars = 0;
            }

            current.push(entry.clone());
            current_chars += entry_chars + 1;
        }

        if !current.is_empty() {
            batches.push(current);
        }

        debug!(
            "Planned {} batches for {} entries (max {} entries / {} chars)",
            batches.len(),
            entries.len(),
            self.max_entries_per_batch,
            self.max_chars_per_batch
        );

        batches
    }
}

/// Convenience wrapper around [`BatchPlanner::plan`]
pub fn plan(
    entries: &[SubtitleEntry],
    max_entries_per_batch: usize,
    max_chars_per_batch: usize,
) -> Vec<Vec<SubtitleEntry>> {
    BatchPlanner::new(max_entries_per_batch, max_chars_per_batch).plan(entries)
}
