/*!
 * Tests for batch planning under entry and character limits
 */

use srt_relay::subtitle_processor::SubtitleEntry;
use srt_relay::translation::batch::{self, BatchPlanner, ENTRY_OVERHEAD_CHARS, MIN_BATCH_CHARS};
use crate::common;

fn flatten(batches: &[Vec<SubtitleEntry>]) -> Vec<u32> {
    batches.iter().flatten().map(|e| e.index).collect()
}

#[test]
fn test_plan_for_many_limits_should_never_produce_empty_or_oversized_batches() {
    let entries = common::sample_entries(97);

    for max_entries in [1, 2, 7, 40, 200] {
        for max_chars in [0, 512, 1_000, 12_000] {
            let batches = batch::plan(&entries, max_entries, max_chars);

            assert!(batches.iter().all(|b| !b.is_empty()));
            assert!(batches.iter().all(|b| b.len() <= max_entries));
            assert_eq!(flatten(&batches), (1..=97).collect::<Vec<_>>());
        }
    }
}

#[test]
fn test_plan_should_stay_within_char_budget_for_normal_entries() {
    let entries = common::sample_entries(50);
    let planner = BatchPlanner::new(100, 600);

    for batch in planner.plan(&entries) {
        let chars: usize = batch.iter().map(BatchPlanner::entry_chars).sum::<usize>() + batch.len() - 1;
        assert!(chars <= planner.max_chars_per_batch(), "batch of {} chars", chars);
    }
}

#[test]
fn test_plan_with_long_entry_should_not_split_it() {
    let mut entries = common::sample_entries(3);
    entries[1] = entries[1].with_lines(vec!["x".repeat(5_000)]);

    let batches = BatchPlanner::new(10, MIN_BATCH_CHARS).plan(&entries);

    assert_eq!(batches.len(), 3);
    assert_eq!(batches[1].len(), 1);
    assert_eq!(batches[1][0].index, 2);
}

#[test]
fn test_entry_chars_should_include_overhead() {
    let entry = SubtitleEntry::new(1, "00:00:01,000 --> 00:00:02,000", vec!["ab".into(), "cd".into()]);
    assert_eq!(BatchPlanner::entry_chars(&entry), ENTRY_OVERHEAD_CHARS + 5);
}
