use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{error, info};

use crate::api::error::ServiceError;

use super::sheet::{self, FailedRow, RawRow, Sheet};
use super::tracker::{ImportTracker, JobStatus};
use super::RowError;

/// Per-entity half of the import pipeline: builds the reference context once
/// per run, then imports rows one at a time.
#[async_trait]
pub trait RowImporter: Send + Sync {
    type Context: Send + Sync;

    /// Entity label used in logs.
    fn entity(&self) -> &'static str;

    /// Reads the referenced collections into lookup maps. A failure here is
    /// run-fatal.
    async fn prepare(&self) -> Result<Self::Context, ServiceError>;

    /// Resolves, validates and writes a single row.
    async fn import_row(&self, ctx: &Self::Context, row: &RawRow) -> Result<(), RowError>;
}

/// Runs one import job to its terminal state.
///
/// Row failures never abort the run; anything failing before the row loop
/// (unreadable file, unbuildable reference maps) marks the job
/// `failed: <message>` and stops. Every attempted row, including reference
/// misses, counts toward `processed`.
pub async fn run_import<I: RowImporter>(
    importer: I,
    tracker: ImportTracker,
    job_id: String,
    file_path: PathBuf,
) {
    info!(
        "Import {}: processing {} file {}",
        job_id,
        importer.entity(),
        file_path.display()
    );

    let Sheet { headers, rows } = match sheet::read_rows(&file_path) {
        Ok(sheet) => sheet,
        Err(e) => {
            error!("Import {}: unreadable input: {}", job_id, e);
            tracker.finish(&job_id, JobStatus::Failed(e.to_string()));
            return;
        }
    };

    let total = rows.len();
    tracker.update(&job_id, |job| job.total = total);

    let ctx = match importer.prepare().await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Import {}: could not build reference maps: {}", job_id, e);
            tracker.finish(&job_id, JobStatus::Failed(e.to_string()));
            return;
        }
    };

    let mut failures: Vec<FailedRow> = Vec::new();

    for (i, row) in rows.into_iter().enumerate() {
        match importer.import_row(&ctx, &row).await {
            Ok(()) => tracker.update(&job_id, |job| job.succeeded += 1),
            Err(e) => {
                tracker.update(&job_id, |job| job.failed += 1);
                failures.push(FailedRow {
                    row,
                    error: e.message().to_string(),
                });
            }
        }

        let processed = i + 1;
        tracker.update(&job_id, |job| {
            job.processed = processed;
            job.progress = ((processed * 100) / total) as u8;
        });
    }

    if !failures.is_empty() {
        let report_path = sheet::error_report_path(&file_path);
        match sheet::write_error_report(&report_path, &headers, &failures) {
            Ok(()) => tracker.update(&job_id, |job| {
                job.error_file = Some(report_path.to_string_lossy().into_owned());
            }),
            Err(e) => error!("Import {}: could not write error report: {}", job_id, e),
        }
    }

    tracker.finish(&job_id, JobStatus::Completed);
    info!(
        "Import {}: finished with {} failed of {} rows",
        job_id,
        failures.len(),
        total
    );
}
