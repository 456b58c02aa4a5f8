/*!
 * Job manager: the submit / poll boundary around the orchestrator.
 *
 * This module handles:
 * - Accepting translation requests and creating PENDING jobs
 * - Running one pipeline task per job (parse, orchestrate, serialize)
 * - Recording the terminal state of every job in the store
 */

use bytes::Bytes;
use log::{debug, error, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::errors::TranslationError;
use crate::file_utils::FileManager;
use crate::providers::TranslationProvider;
use crate::subtitle_processor::SubtitleCollection;
use crate::translation::{OrchestratorLimits, TranslationOrchestrator};

use super::models::{Job, TranslationRequest};
use super::store::JobStore;

/// Runs translation jobs in the background and tracks them in a shared store
#[derive(Debug, Clone)]
pub struct JobManager {
    orchestrator: TranslationOrchestrator,
    store: Arc<JobStore>,
}

impl JobManager {
    /// Create a job manager reporting to `store`
    pub fn new(provider: Arc<dyn TranslationProvider>, limits: OrchestratorLimits, store: Arc<JobStore>) -> Self {
        let orchestrator = TranslationOrchestrator::new(provider, limits).with_job_store(Arc::clone(&store));
        Self { orchestrator, store }
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    /// Accept a translation job and start it on the tokio runtime.
    ///
    /// The request is rejected before any job exists when the target language is
    /// blank, the name is not a `.srt` file or the content is not a subtitle stream.
    /// Returns the new job id.
    pub fn submit(
        &self,
        input_path: impl Into<PathBuf>,
        input_name: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let input_path = input_path.into();
        if target_language.trim().is_empty() {
            return Err(TranslationError::InvalidRequest("Target language is required.".to_string()));
        }
        if !FileManager::is_subtitle_file(input_name) {
            return Err(TranslationError::InvalidRequest("Only .srt files are supported.".to_string()));
        }
        SubtitleCollection::validate_file(&input_path)?;

        let job_id = Uuid::new_v4().to_string();
        self.store.store(&job_id, Job::pending(&job_id, input_name));
        info!("Accepted job {} for {} -> {}", job_id, input_name, target_language);

        let request = TranslationRequest::new(input_path, target_language).with_job_id(&job_id);
        let output_name = FileManager::output_file_name(input_name, target_language);
        let manager = self.clone();
        let task_job_id = job_id.clone();

        tokio::spawn(async move {
            match manager.translate(&request).await {
                Ok(content) => {
                    manager.store.complete(&task_job_id, &output_name, Bytes::from(content));
                    info!("Job {} completed as {}", task_job_id, output_name);
                }
                Err(e) => {
                    error!("Job {} failed: {}", task_job_id, e);
                    manager.store.fail(&task_job_id, &format!("Translation failed: {}", e));
                }
            }
        });

        Ok(job_id)
    }

    /// Current snapshot of a job
    pub fn status(&self, job_id: &str) -> Option<Job> {
        self.store.get(job_id)
    }

    /// Parse, translate and serialize one subtitle file.
    ///
    /// Returns the translated document as SRT text.
    pub async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslationError> {
        if request.target_language.trim().is_empty() {
            return Err(TranslationError::InvalidRequest("Target language is required.".to_string()));
        }

        debug!("Parsing {:?}", request.input_path);
        let entries = SubtitleCollection::parse_file(&request.input_path)?;

        let job_id = request.job_id.as_deref();
        if let Some(job_id) = job_id {
            self.store.update_progress(job_id, 0, entries.len());
        }

        let translated = self.orchestrator.run(&entries, &request.target_language, job_id).await?;
        Ok(SubtitleCollection::serialize(&translated))
    }

    /// Poll a job until it reaches a terminal state.
    ///
    /// Returns `None` when the job is unknown or disappears while waiting.
    pub async fn wait_for(&self, job_id: &str, poll_interval: Duration) -> Option<Job> {
        loop {
            let job = self.store.get(job_id)?;
            if job.is_terminal() {
                return Some(job);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}
