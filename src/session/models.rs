/*!
 * Job models for translation tracking.
 *
 * A job moves `Pending -> Processing* -> Completed | Failed`. The terminal
 * states are final.
 */

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Status of a translation job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Accepted, not started yet
    Pending,
    /// Batches are being translated
    Processing,
    /// Output is available
    Completed,
    /// Translation failed, see the error message
    Failed,
}

impl JobStatus {
    /// Terminal states accept no further transition
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

/// Snapshot of one translation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier
    pub id: String,

    /// Current status
    pub status: JobStatus,

    /// Name of the uploaded subtitle file
    pub input_name: String,

    /// Name of the translated file
    pub output_name: Option<String>,

    /// Translated document (UTF-8 SRT)
    pub output_content: Option<Bytes>,

    /// Human-readable failure reason
    pub error_message: Option<String>,

    /// Entries translated so far
    pub translated_count: Option<usize>,

    /// Entries in the document
    pub total_count: Option<usize>,

    /// Last state change
    pub updated_at: DateTime<Utc>,
}

impl Job {
    fn with_status(id: &str, input_name: &str, status: JobStatus) -> Self {
        Self {
            id: id.to_string(),
            status,
            input_name: input_name.to_string(),
            output_name: None,
            output_content: None,
            error_message: None,
            translated_count: None,
            total_count: None,
            updated_at: Utc::now(),
        }
    }

    pub fn pending(id: &str, input_name: &str) -> Self {
        Self::with_status(id, input_name, JobStatus::Pending)
    }

    pub fn processing(id: &str, input_name: &str, translated_count: usize, total_count: usize) -> Self {
        Self {
            translated_count: Some(translated_count),
            total_count: Some(total_count),
            ..Self::with_status(id, input_name, JobStatus::Processing)
        }
    }

    pub fn completed(id: &str, input_name: &str, output_name: &str, output_content: Bytes) -> Self {
        Self {
            output_name: Some(output_name.to_string()),
            output_content: Some(output_content),
            ..Self::with_status(id, input_name, JobStatus::Completed)
        }
    }

    pub fn failed(id: &str, input_name: &str, error_message: &str) -> Self {
        Self {
            error_message: Some(error_message.to_string()),
            ..Self::with_status(id, input_name, JobStatus::Failed)
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Progress in percent, when counts are known
    pub fn progress_percentage(&self) -> Option<f64> {
        match (self.translated_count, self.total_count) {
            (Some(_), Some(0)) => Some(100.0),
            (Some(done), Some(total)) => Some(done as f64 / total as f64 * 100.0),
            _ => None,
        }
    }
}

/// Request to translate one subtitle file
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// Readable, already-validated subtitle file
    pub input_path: PathBuf,

    /// Non-blank target language
    pub target_language: String,

    /// Job to report progress to, if any
    pub job_id: Option<String>,
}

impl TranslationRequest {
    pub fn new(input_path: impl Into<PathBuf>, target_language: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            target_language: target_language.into(),
            job_id: None,
        }
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }
}
