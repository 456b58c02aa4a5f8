/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with translated text
 * - `MockProvider::omitting()` - Leaves some indices out of its answer
 * - `MockProvider::failing_on_entry()` - Fails the batch holding one entry
 * - `MockProvider::slow()` - Working, after a jittered delay
 *
 * Every mock counts calls and tracks how many calls are in flight at once.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{BatchTranslation, TranslationProvider, require_target_language};
use crate::subtitle_processor::SubtitleEntry;

const DEFAULT_FAILURE_MESSAGE: &str = "Simulated provider failure";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Succeeds but leaves these indices out of the answer
    Omitting(HashSet<u32>),
    /// Fails every Nth call
    Intermittent { fail_every: usize },
    /// Fails any batch containing this entry index
    FailOnEntry { index: u32 },
    /// Always fails with an error
    Failing,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    behavior: MockBehavior,
    failure_message: String,
    /// Random delay range applied before every answer
    delay_ms: Option<(u64, u64)>,
    /// Fixed answers; when set only these indices are returned
    translations: Option<Arc<BatchTranslation>>,
    call_count: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
    /// First entry index of every batch, in call order
    calls: Arc<Mutex<Vec<u32>>>,
}

/// Decrements the in-flight counter even when the call future is dropped
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            delay_ms: None,
            translations: None,
            call_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn omitting(indices: impl IntoIterator<Item = u32>) -> Self {
        Self::new(MockBehavior::Omitting(indices.into_iter().collect()))
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    pub fn failing_on_entry(index: u32, message: &str) -> Self {
        Self::new(MockBehavior::FailOnEntry { index }).with_failure_message(message)
    }

    /// Create a failing mock provider that always errors
    pub fn failing(message: &str) -> Self {
        Self::new(MockBehavior::Failing).with_failure_message(message)
    }

    /// Working provider answering after a jittered delay
    pub fn slow(min_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self::working().with_delay_ms(min_delay_ms, max_delay_ms)
    }

    pub fn with_delay_ms(mut self, min_delay_ms: u64, max_delay_ms: u64) -> Self {
        self.delay_ms = Some((min_delay_ms.min(max_delay_ms), max_delay_ms.max(min_delay_ms)));
        self
    }

    pub fn with_failure_message(mut self, message: &str) -> Self {
        self.failure_message = message.to_string();
        self
    }

    /// Answer with these fixed translations instead of generated text
    pub fn with_translations(mut self, translations: BatchTranslation) -> Self {
        self.translations = Some(Arc::new(translations));
        self
    }

    /// Text a working mock produces for one line
    pub fn translate_line(line: &str, target_language: &str) -> String {
        format!("[TRANSLATED to {}] {}", target_language, line)
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed running at the same time
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// First entry index of each batch, in the order calls started
    pub fn batch_starts(&self) -> Vec<u32> {
        self.calls.lock().clone()
    }

    fn failure(&self) -> ProviderError {
        ProviderError::ApiError {
            status_code: 500,
            message: self.failure_message.clone(),
        }
    }

    fn answer(&self, batch: &[SubtitleEntry], target_language: &str, skip: Option<&HashSet<u32>>) -> BatchTranslation {
        batch
            .iter()
            .filter(|entry| skip.is_none_or(|skip| !skip.contains(&entry.index)))
            .filter_map(|entry| match &self.translations {
                Some(fixed) => fixed.get(&entry.index).map(|lines| (entry.index, lines.clone())),
                None => Some((
                    entry.index,
                    entry
                        .lines
                        .iter()
                        .map(|line| Self::translate_line(line, target_language))
                        .collect(),
                )),
            })
            .collect()
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            failure_message: self.failure_message.clone(),
            delay_ms: self.delay_ms,
            translations: self.translations.clone(),
            call_count: Arc::clone(&self.call_count),
            in_flight: Arc::clone(&self.in_flight),
            peak_in_flight: Arc::clone(&self.peak_in_flight),
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate_batch(
        &self,
        batch: &[SubtitleEntry],
        target_language: &str,
    ) -> Result<BatchTranslation, ProviderError> {
        let target_language = require_target_language(target_language)?;
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(first) = batch.first() {
            self.calls.lock().push(first.index);
        }

        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlightGuard(Arc::clone(&self.in_flight));
        self.peak_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        if let Some((min_delay_ms, max_delay_ms)) = self.delay_ms {
            let delay_ms = rand::rng().random_range(min_delay_ms..=max_delay_ms);
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        match &self.behavior {
            MockBehavior::Working => Ok(self.answer(batch, target_language, None)),

            MockBehavior::Omitting(indices) => Ok(self.answer(batch, target_language, Some(indices))),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(self.failure())
                } else {
                    Ok(self.answer(batch, target_language, None))
                }
            }

            MockBehavior::FailOnEntry { index } => {
                if batch.iter().any(|entry| entry.index == *index) {
                    Err(self.failure())
                } else {
                    Ok(self.answer(batch, target_language, None))
                }
            }

            MockBehavior::Failing => Err(self.failure()),
        }
    }
}
