use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Serialize, Serializer};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Terminal states are `Completed` and `Failed`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobStatus {
    Processing,
    Completed,
    Failed(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Processing)
    }

    pub fn text(&self) -> String {
        match self {
            JobStatus::Processing => "processing".to_string(),
            JobStatus::Completed => "completed".to_string(),
            JobStatus::Failed(reason) => format!("failed: {}", reason),
        }
    }
}

impl Serialize for JobStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text())
    }
}

/// Snapshot of one bulk-import run, polled by clients.
#[derive(Clone, Debug, Serialize)]
pub struct ImportJob {
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Truncated percentage; 0 until `total` is known.
    pub progress: u8,
    pub status: JobStatus,
    pub error_file: Option<String>,
    #[serde(skip)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ImportJob {
    fn new() -> Self {
        Self {
            total: 0,
            processed: 0,
            succeeded: 0,
            failed: 0,
            progress: 0,
            status: JobStatus::Processing,
            error_file: None,
            finished_at: None,
        }
    }
}

/// Ledger of import jobs keyed by job id. Cloning shares the underlying map,
/// so handlers and pipeline tasks all see the same entries.
#[derive(Clone, Default)]
pub struct ImportTracker {
    jobs: Arc<DashMap<String, ImportJob>>,
}

impl ImportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Must run before the upload response is sent, so an immediate poll
    /// never races an unregistered job.
    pub fn register(&self, job_id: &str) {
        self.jobs.insert(job_id.to_string(), ImportJob::new());
    }

    pub fn update<F: FnOnce(&mut ImportJob)>(&self, job_id: &str, apply: F) {
        if let Some(mut job) = self.jobs.get_mut(job_id) {
            apply(&mut job);
        }
    }

    /// Marks a job terminal and stamps the finish time used for eviction.
    pub fn finish(&self, job_id: &str, status: JobStatus) {
        self.update(job_id, |job| {
            job.status = status;
            job.finished_at = Some(Utc::now());
        });
    }

    pub fn get(&self, job_id: &str) -> Option<ImportJob> {
        self.jobs.get(job_id).map(|entry| entry.value().clone())
    }

    /// Drops terminal jobs that finished before `cutoff`; running jobs are
    /// never evicted. Returns the number of entries removed.
    pub fn evict_finished_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|_, job| {
            !(job.status.is_terminal()
                && job.finished_at.map(|at| at < cutoff).unwrap_or(false))
        });
        before - self.jobs.len()
    }

    /// Periodic eviction loop; runs until the shutdown signal flips.
    pub async fn run_sweeper(self, retention: Duration, mut shutdown_rx: watch::Receiver<bool>) {
        info!("Import job sweeper started, retention {:?}", retention);
        let retention = chrono::Duration::from_std(retention)
            .unwrap_or_else(|_| chrono::Duration::hours(24));

        loop {
            tokio::select! {
                _ = sleep(SWEEP_INTERVAL) => {
                    let evicted = self.evict_finished_before(Utc::now() - retention);
                    if evicted > 0 {
                        debug!("Evicted {} finished import jobs", evicted);
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Import job sweeper stopping");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_jobs_start_zeroed_and_processing() {
        let tracker = ImportTracker::new();
        tracker.register("job-1");

        let job = tracker.get("job-1").unwrap();
        assert_eq!(job.total, 0);
        assert_eq!(job.processed, 0);
        assert_eq!(job.progress, 0);
        assert_eq!(job.status, JobStatus::Processing);
        assert!(tracker.get("missing").is_none());
    }

    #[test]
    fn jobs_do_not_interfere() {
        let tracker = ImportTracker::new();
        tracker.register("job-a");
        tracker.register("job-b");

        tracker.update("job-a", |job| {
            job.total = 10;
            job.processed = 4;
            job.succeeded = 4;
        });

        let untouched = tracker.get("job-b").unwrap();
        assert_eq!(untouched.processed, 0);
        assert_eq!(untouched.total, 0);
        assert_eq!(tracker.get("job-a").unwrap().processed, 4);
    }

    #[test]
    fn failed_status_carries_its_reason() {
        let tracker = ImportTracker::new();
        tracker.register("job-1");
        tracker.finish("job-1", JobStatus::Failed("could not parse CSV".to_string()));

        let job = tracker.get("job-1").unwrap();
        assert_eq!(job.status.text(), "failed: could not parse CSV");
        assert!(job.status.is_terminal());
        assert!(job.finished_at.is_some());
    }

    #[test]
    fn eviction_only_touches_finished_jobs_past_the_cutoff() {
        let tracker = ImportTracker::new();
        tracker.register("running");
        tracker.register("done");
        tracker.finish("done", JobStatus::Completed);

        // Cutoff in the future: the finished job is older than it.
        let evicted = tracker.evict_finished_before(Utc::now() + chrono::Duration::minutes(1));
        assert_eq!(evicted, 1);
        assert!(tracker.get("done").is_none());
        assert!(tracker.get("running").is_some());
    }
}
