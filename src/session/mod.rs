/*!
 * Translation job tracking.
 *
 * This module provides:
 * - Job snapshots and their status lifecycle
 * - The in-process job progress store
 * - The job manager that runs jobs in the background
 */

pub mod manager;
pub mod models;
pub mod store;

// Re-export main types
pub use manager::JobManager;
pub use models::{Job, JobStatus, TranslationRequest};
pub use store::JobStore;
