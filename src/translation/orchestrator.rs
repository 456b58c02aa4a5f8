/*!
 * Bounded-parallel batch translation.
 *
 * The orchestrator plans batches, runs one tokio task per batch behind a
 * semaphore, merges every answer into a map keyed by entry index and rebuilds
 * the document in input order. Entries the provider did not answer for keep
 * their original lines.
 */

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::errors::{ProviderError, TranslationError};
use crate::providers::TranslationProvider;
use crate::session::JobStore;
use crate::subtitle_processor::SubtitleEntry;

use super::batch::BatchPlanner;
use super::concurrency::{FailurePolicy, OrchestratorLimits};

/// Drives batch planning, parallel provider calls, progress and reassembly
#[derive(Debug, Clone)]
pub struct TranslationOrchestrator {
    provider: Arc<dyn TranslationProvider>,
    limits: OrchestratorLimits,
    job_store: Option<Arc<JobStore>>,
}

impl TranslationOrchestrator {
    pub fn new(provider: Arc<dyn TranslationProvider>, limits: OrchestratorLimits) -> Self {
        Self {
            provider,
            limits,
            job_store: None,
        }
    }

    /// Report progress of runs carrying a job id to this store
    pub fn with_job_store(mut self, store: Arc<JobStore>) -> Self {
        self.job_store = Some(store);
        self
    }

    pub fn limits(&self) -> &OrchestratorLimits {
        &self.limits
    }

    pub fn planner(&self) -> BatchPlanner {
        BatchPlanner::new(self.limits.max_entries_per_batch, self.limits.max_chars_per_batch)
    }

    /// Translate all entries, preserving count and order.
    ///
    /// Any failed batch fails the whole run with `TranslationFailed` carrying the
    /// failure of the earliest-dispatched failed batch.
    pub async fn run(
        &self,
        entries: &[SubtitleEntry],
        target_language: &str,
        job_id: Option<&str>,
    ) -> Result<Vec<SubtitleEntry>, TranslationError> {
        if target_language.trim().is_empty() {
            return Err(TranslationError::InvalidRequest("Target language is required.".to_string()));
        }

        let batches = self.planner().plan(entries);
        let total = entries.len();
        if batches.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            "Translating {} entries in {} batches with {} ({} in parallel)",
            total,
            batches.len(),
            self.provider.name(),
            self.limits.max_concurrent_batches
        );
        let start_time = Instant::now();

        let translated: Arc<Mutex<HashMap<u32, Vec<String>>>> =
            Arc::new(Mutex::new(HashMap::with_capacity(total)));
        let completed = Arc::new(AtomicUsize::new(0));
        let semaphore = Arc::new(Semaphore::new(self.limits.max_concurrent_batches));
        let batch_count = batches.len();

        let handles: Vec<JoinHandle<Result<(), ProviderError>>> = batches
            .into_iter()
            .enumerate()
            .map(|(batch_index, batch)| {
                let provider = Arc::clone(&self.provider);
                let semaphore = Arc::clone(&semaphore);
                let translated = Arc::clone(&translated);
                let completed = Arc::clone(&completed);
                let store = self.job_store.clone();
                let job_id = job_id.map(str::to_string);
                let target_language = target_language.to_string();
                let batch_timeout = self.limits.batch_timeout;

                tokio::spawn(async move {
                    // The semaphore is never closed
                    let permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

                    debug!("Dispatching batch {}/{} ({} entries)", batch_index + 1, batch_count, batch.len());
                    let call = provider.translate_batch(&batch, &target_language);
                    let result = match batch_timeout {
                        Some(deadline) => tokio::time::timeout(deadline, call)
                            .await
                            .unwrap_or_else(|_| Err(ProviderError::Timeout(deadline.as_millis() as u64))),
                        None => call.await,
                    };

                    let lines_by_index = match result {
                        Ok(lines_by_index) => lines_by_index,
                        Err(e) => {
                            warn!("Batch {}/{} failed: {}", batch_index + 1, batch_count, e);
                            return Err(e);
                        }
                    };

                    translated.lock().extend(lines_by_index);
                    drop(permit);

                    let done = completed.fetch_add(batch.len(), Ordering::SeqCst) + batch.len();
                    info!("Translated {}/{} entries", done, total);
                    if let (Some(store), Some(job_id)) = (store, job_id) {
                        store.update_progress(&job_id, done, total);
                    }
                    Ok(())
                })
            })
            .collect();

        let failures = self.join(handles).await;

        if let Some((batch_index, root_cause)) = failures.into_iter().next() {
            error!("Translation aborted by batch {}: {}", batch_index + 1, root_cause);
            return Err(TranslationError::TranslationFailed(root_cause));
        }

        let translated = translated.lock();
        let output = reassemble(entries, &translated);

        let missing = entries.iter().filter(|e| !translated.contains_key(&e.index)).count();
        if missing > 0 {
            warn!("{} entries had no translation and keep their original text", missing);
        }
        info!("Translation finished in {:?}", start_time.elapsed());

        Ok(output)
    }

    /// Wait for the batch tasks and return failures ordered by dispatch position.
    ///
    /// Under `CancelOnFirstFailure` the remaining tasks are aborted once a failure
    /// is seen; cancellations caused by that abort are not reported as failures.
    async fn join(&self, handles: Vec<JoinHandle<Result<(), ProviderError>>>) -> Vec<(usize, String)> {
        let abort_handles: Vec<_> = handles.iter().map(JoinHandle::abort_handle).collect();
        let mut pending: FuturesUnordered<_> = handles
            .into_iter()
            .enumerate()
            .map(|(batch_index, handle)| async move { (batch_index, handle.await) })
            .collect();

        let mut failures = Vec::new();
        let mut aborted = false;

        while let Some((batch_index, outcome)) = pending.next().await {
            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(provider_error)) => provider_error.to_string(),
                Err(join_error) if join_error.is_cancelled() && aborted => continue,
                Err(join_error) => format!("batch task interrupted: {}", join_error),
            };
            failures.push((batch_index, failure));

            if self.limits.failure_policy == FailurePolicy::CancelOnFirstFailure && !aborted {
                debug!("Cancelling in-flight batches after failure in batch {}", batch_index + 1);
                abort_handles.iter().for_each(|handle| handle.abort());
                aborted = true;
            }
        }

        failures.sort_by_key(|(batch_index, _)| *batch_index);
        failures
    }
}

/// Reassemble a document from a translation map, keeping untranslated entries as-is
pub fn reassemble(entries: &[SubtitleEntry], translated: &HashMap<u32, Vec<String>>) -> Vec<SubtitleEntry> {
    entries
        .iter()
        .map(|entry| {
            translated
                .get(&entry.index)
                .map_or_else(|| entry.clone(), |lines| entry.with_lines(lines.clone()))
        })
        .collect()
}
