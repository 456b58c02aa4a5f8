/*!
 * In-process job progress registry.
 *
 * One store is created at service start and handed to every component that
 * needs it. Entries live until they are removed or pruned explicitly.
 */

use bytes::Bytes;
use chrono::{Duration, Utc};
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::models::{Job, JobStatus};

/// Concurrent-safe registry of job snapshots keyed by job id
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<String, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a job snapshot
    pub fn store(&self, job_id: &str, job: Job) {
        self.jobs.write().insert(job_id.to_string(), job);
    }

    /// Current snapshot of a job
    pub fn get(&self, job_id: &str) -> Option<Job> {
        self.jobs.read().get(job_id).cloned()
    }

    /// Drop a job, returning its last snapshot
    pub fn remove(&self, job_id: &str) -> Option<Job> {
        self.jobs.write().remove(job_id)
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    /// Move a live job to PROCESSING with the given counts.
    ///
    /// Terminal jobs are left untouched and the translated count never goes down,
    /// so updates racing each other still read as monotonic progress.
    /// Returns false when the job is unknown or already finished.
    pub fn update_progress(&self, job_id: &str, translated_count: usize, total_count: usize) -> bool {
        let mut jobs = self.jobs.write();
        let Some(job) = jobs.get_mut(job_id) else {
            return false;
        };
        if job.is_terminal() {
            return false;
        }

        let translated = job
            .translated_count
            .map_or(translated_count, |current| current.max(translated_count));
        *job = Job::processing(job_id, &job.input_name, translated, total_count);
        true
    }

    /// Finish a live job with its output
    pub fn complete(&self, job_id: &str, output_name: &str, output_content: Bytes) -> bool {
        self.finish(job_id, |job| Job::completed(job_id, &job.input_name, output_name, output_content))
    }

    /// Finish a live job with an error message
    pub fn fail(&self, job_id: &str, error_message: &str) -> bool {
        self.finish(job_id, |job| Job::failed(job_id, &job.input_name, error_message))
    }

    fn finish(&self, job_id: &str, next: impl FnOnce(&Job) -> Job) -> bool {
        let mut jobs = self.jobs.write();
        match jobs.get_mut(job_id) {
            Some(job) if !job.is_terminal() => {
                *job = next(job);
                true
            }
            Some(_) => {
                debug!("Job {} already finished, ignoring transition", job_id);
                false
            }
            None => false,
        }
    }

    /// Remove terminal jobs whose last change is older than `older_than`
    pub fn prune_terminal(&self, older_than: Duration) -> usize {
        let cutoff = Utc::now() - older_than;
        let mut jobs = self.jobs.write();
        let before = jobs.len();
        jobs.retain(|_, job| !(job.is_terminal() && job.updated_at < cutoff));
        before - jobs.len()
    }

    /// Number of jobs per status
    pub fn count_by_status(&self, status: JobStatus) -> usize {
        self.jobs.read().values().filter(|job| job.status == status).count()
    }
}
