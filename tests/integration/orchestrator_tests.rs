/*!
 * Orchestrator tests against mock and hand-written providers
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use srt_relay::errors::{ProviderError, TranslationError};
use srt_relay::providers::mock::MockProvider;
use srt_relay::providers::{BatchTranslation, TranslationProvider};
use srt_relay::session::{Job, JobStatus, JobStore};
use srt_relay::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use srt_relay::translation::{FailurePolicy, OrchestratorLimits, TranslationOrchestrator};
use crate::common;

/// Answers for every entry of the batch and for indices that were never asked for
#[derive(Debug)]
struct OverEagerProvider;

#[async_trait]
impl TranslationProvider for OverEagerProvider {
    fn name(&self) -> &str {
        "over-eager"
    }

    async fn translate_batch(
        &self,
        batch: &[SubtitleEntry],
        _target_language: &str,
    ) -> Result<BatchTranslation, ProviderError> {
        let mut answer: BatchTranslation = batch
            .iter()
            .map(|entry| (entry.index, vec![entry.original_text().to_uppercase()]))
            .collect();
        answer.insert(9_999, vec!["ghost".to_string()]);
        Ok(answer)
    }
}

/// Batch one fails late, batch two fails at once, later batches succeed slowly
#[derive(Debug, Default)]
struct StaggeredFailureProvider {
    successes: Arc<AtomicUsize>,
}

#[async_trait]
impl TranslationProvider for StaggeredFailureProvider {
    fn name(&self) -> &str {
        "staggered"
    }

    async fn translate_batch(
        &self,
        batch: &[SubtitleEntry],
        _target_language: &str,
    ) -> Result<BatchTranslation, ProviderError> {
        match batch.first().map(|entry| entry.index) {
            Some(1) => {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Err(ProviderError::RequestFailed("late failure in batch one".to_string()))
            }
            Some(2) => Err(ProviderError::RequestFailed("early failure in batch two".to_string())),
            _ => {
                tokio::time::sleep(Duration::from_millis(200)).await;
                self.successes.fetch_add(1, Ordering::SeqCst);
                Ok(batch.iter().map(|entry| (entry.index, entry.lines.clone())).collect())
            }
        }
    }
}

fn orchestrator(provider: impl TranslationProvider + 'static, limits: OrchestratorLimits) -> TranslationOrchestrator {
    TranslationOrchestrator::new(Arc::new(provider), limits)
}

#[tokio::test]
async fn test_sample_document_should_keep_time_ranges_and_line_counts() {
    common::init_test_logger();
    let entries = SubtitleCollection::parse(common::SAMPLE_SRT).unwrap();

    let output = orchestrator(MockProvider::working(), OrchestratorLimits::new(2, 12_000, 2))
        .run(&entries, "es", None)
        .await
        .unwrap();

    assert_eq!(output.len(), entries.len());
    for (original, translated) in entries.iter().zip(&output) {
        assert_eq!(original.index, translated.index);
        assert_eq!(original.time_range, translated.time_range);
        assert_eq!(original.lines.len(), translated.lines.len());
        assert!(translated.lines.iter().all(|line| line.starts_with("[TRANSLATED to es] ")));
    }
}

#[tokio::test]
async fn test_unsorted_indices_should_keep_stream_order() {
    let entries: Vec<SubtitleEntry> = [10u32, 3, 7, 1]
        .iter()
        .map(|&i| SubtitleEntry::new(i, "00:00:01,000 --> 00:00:02,000", vec![format!("entry {}", i)]))
        .collect();

    let output = orchestrator(MockProvider::slow(0, 10), OrchestratorLimits::new(1, 12_000, 4))
        .run(&entries, "it", None)
        .await
        .unwrap();

    let indices: Vec<u32> = output.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![10, 3, 7, 1]);
    assert_eq!(output[1].lines, vec!["[TRANSLATED to it] entry 3".to_string()]);
}

#[tokio::test]
async fn test_answers_for_unknown_indices_should_be_ignored() {
    let entries = common::sample_entries(4);

    let output = orchestrator(OverEagerProvider, OrchestratorLimits::new(2, 12_000, 2))
        .run(&entries, "de", None)
        .await
        .unwrap();

    assert_eq!(output.len(), 4);
    assert!(output.iter().all(|e| e.index != 9_999));
    assert_eq!(output[0].lines, vec!["SUBTITLE LINE NUMBER 1".to_string()]);
}

#[tokio::test]
async fn test_single_permit_should_dispatch_batches_in_order() {
    let provider = MockProvider::working();
    let entries = common::sample_entries(10);

    orchestrator(provider.clone(), OrchestratorLimits::new(2, 12_000, 1))
        .run(&entries, "fr", None)
        .await
        .unwrap();

    assert_eq!(provider.batch_starts(), vec![1, 3, 5, 7, 9]);
    assert_eq!(provider.peak_concurrency(), 1);
}

#[tokio::test]
async fn test_intermittent_provider_should_fail_whole_run() {
    common::init_test_logger();
    let provider = MockProvider::intermittent(3).with_failure_message("overloaded");
    let entries = common::sample_entries(12);

    let err = orchestrator(provider, OrchestratorLimits::new(2, 12_000, 2))
        .run(&entries, "fr", None)
        .await
        .unwrap_err();

    assert!(matches!(err, TranslationError::TranslationFailed(_)));
    assert_eq!(
        err.to_string(),
        "Parallel translation failed: API responded with error: 500 - overloaded"
    );
}

#[tokio::test]
async fn test_fixed_translations_should_mix_with_original_text() {
    let mut fixed = HashMap::new();
    fixed.insert(2, vec!["Zwei".to_string()]);
    fixed.insert(4, vec!["Vier".to_string()]);
    let entries = common::sample_entries(5);

    let output = orchestrator(MockProvider::working().with_translations(fixed), OrchestratorLimits::default())
        .run(&entries, "de", None)
        .await
        .unwrap();

    let lines: Vec<String> = output.iter().map(SubtitleEntry::original_text).collect();
    assert_eq!(
        lines,
        vec![
            "Subtitle line number 1".to_string(),
            "Zwei".to_string(),
            "Subtitle line number 3".to_string(),
            "Vier".to_string(),
            "Subtitle line number 5".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_failed_run_should_leave_job_processing_for_caller() {
    let store = Arc::new(JobStore::new());
    store.store("job-1", Job::pending("job-1", "movie.srt"));
    let entries = common::sample_entries(6);

    let result = orchestrator(MockProvider::failing_on_entry(6, "bad entry"), OrchestratorLimits::new(1, 12_000, 1))
        .with_job_store(Arc::clone(&store))
        .run(&entries, "fr", Some("job-1"))
        .await;

    assert!(result.is_err());
    let job = store.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.translated_count, Some(5));
    assert_eq!(job.total_count, Some(6));
}

#[tokio::test]
async fn test_cancel_policy_should_still_report_failure() {
    let limits = OrchestratorLimits::new(1, 12_000, 2).with_failure_policy(FailurePolicy::CancelOnFirstFailure);
    let entries = common::sample_entries(8);

    let err = orchestrator(MockProvider::failing_on_entry(1, "first batch broke").with_delay_ms(1, 3), limits)
        .run(&entries, "fr", None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("first batch broke"));
}

#[test]
fn test_run_should_be_drivable_from_blocking_code() {
    let entries = common::sample_entries(7);
    let orchestrator = orchestrator(MockProvider::working(), OrchestratorLimits::new(3, 12_000, 2));

    let output = tokio_test::block_on(orchestrator.run(&entries, "sv", None)).unwrap();

    assert_eq!(output.len(), 7);
    assert_eq!(output[6].lines, vec![MockProvider::translate_line("Subtitle line number 7", "sv")]);
}

#[tokio::test]
async fn test_reported_failure_should_follow_dispatch_order_not_completion_order() {
    let entries = common::sample_entries(4);

    let err = orchestrator(StaggeredFailureProvider::default(), OrchestratorLimits::new(1, 12_000, 4))
        .run(&entries, "fr", None)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Parallel translation failed: API request failed: late failure in batch one"
    );
}

#[tokio::test]
async fn test_wait_for_all_should_let_slower_batches_finish_before_failing() {
    let provider = StaggeredFailureProvider::default();
    let successes = Arc::clone(&provider.successes);
    let entries = common::sample_entries(4);

    let result = orchestrator(provider, OrchestratorLimits::new(1, 12_000, 4))
        .run(&entries, "fr", None)
        .await;

    assert!(matches!(result, Err(TranslationError::TranslationFailed(_))));
    assert_eq!(successes.load(Ordering::SeqCst), 2);
}
