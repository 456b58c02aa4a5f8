/*!
 * Tests for the job progress store and job snapshots
 */

use bytes::Bytes;
use std::sync::Arc;
use std::thread;

use srt_relay::session::{Job, JobStatus, JobStore};

fn store_with_pending(ids: &[&str]) -> JobStore {
    let store = JobStore::new();
    for id in ids {
        store.store(id, Job::pending(id, "movie.srt"));
    }
    store
}

#[test]
fn test_job_lifecycle_should_move_pending_processing_completed() {
    let store = store_with_pending(&["job-1"]);
    assert_eq!(store.get("job-1").map(|j| j.status), Some(JobStatus::Pending));

    assert!(store.update_progress("job-1", 0, 12));
    assert!(store.update_progress("job-1", 8, 12));
    let job = store.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.progress_percentage(), Some(8.0 / 12.0 * 100.0));

    assert!(store.complete("job-1", "movie_fr.srt", Bytes::from_static(b"1\n")));
    let job = store.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.input_name, "movie.srt");
    assert_eq!(job.output_content.as_deref(), Some(&b"1\n"[..]));
    assert!(!store.update_progress("job-1", 12, 12));
}

#[test]
fn test_failed_job_should_not_complete_later() {
    let store = store_with_pending(&["job-1"]);

    assert!(store.fail("job-1", "Translation failed: boom"));
    assert!(!store.complete("job-1", "movie_fr.srt", Bytes::new()));

    let job = store.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error_message.as_deref(), Some("Translation failed: boom"));
}

#[test]
fn test_count_by_status_should_track_each_state() {
    let store = store_with_pending(&["a", "b", "c", "d"]);
    store.update_progress("b", 1, 2);
    store.complete("c", "c.srt", Bytes::new());
    store.fail("d", "nope");

    assert_eq!(store.count_by_status(JobStatus::Pending), 1);
    assert_eq!(store.count_by_status(JobStatus::Processing), 1);
    assert_eq!(store.count_by_status(JobStatus::Completed), 1);
    assert_eq!(store.count_by_status(JobStatus::Failed), 1);
    assert_eq!(store.len(), 4);
}

#[test]
fn test_prune_terminal_with_zero_age_should_drop_finished_jobs() {
    let store = store_with_pending(&["live", "done"]);
    store.complete("done", "done.srt", Bytes::new());
    thread::sleep(std::time::Duration::from_millis(5));

    assert_eq!(store.prune_terminal(chrono::Duration::zero()), 1);
    assert!(store.get("done").is_none());
    assert!(store.get("live").is_some());
}

#[test]
fn test_store_shared_across_threads_should_see_every_job() {
    let store = Arc::new(JobStore::new());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25 {
                    let id = format!("job-{}-{}", t, i);
                    store.store(&id, Job::pending(&id, "movie.srt"));
                    store.update_progress(&id, i, 25);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 200);
    assert_eq!(store.count_by_status(JobStatus::Processing), 200);
}

#[test]
fn test_job_snapshot_should_serialize_to_json() {
    let job = Job::processing("job-1", "movie.srt", 3, 4);
    let json = serde_json::to_value(&job).unwrap();

    assert_eq!(json["status"], "PROCESSING");
    assert_eq!(json["translated_count"], 3);
    assert_eq!(json["total_count"], 4);
}
