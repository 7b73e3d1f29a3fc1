use std::path::{Path, PathBuf};

use actix_multipart::Multipart;
use actix_web::web::BytesMut;
use futures_util::TryStreamExt;
use tracing::info;
use uuid::Uuid;

use crate::api::error::ServiceError;

/// A staged upload: raw bytes persisted under a job-unique filename.
pub struct StagedUpload {
    pub job_id: String,
    pub path: PathBuf,
}

/// Accepts a single `.csv`/`.xlsx` file field and writes it to `upload_dir`
/// as `{job_id}_{original_name}`. Anything else is a client error; no job is
/// created for rejected uploads.
pub async fn stage_upload(
    mut payload: Multipart,
    upload_dir: &Path,
) -> Result<StagedUpload, ServiceError> {
    while let Some(mut field) = payload.try_next().await.map_err(bad_multipart)? {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(sanitize_filename);
        let Some(filename) = filename else {
            // Not a file field; skip it.
            continue;
        };

        if !is_supported(&filename) {
            return Err(ServiceError::BadRequest(
                "Only CSV or Excel files are supported".to_string(),
            ));
        }

        let mut content = BytesMut::new();
        while let Some(chunk) = field.try_next().await.map_err(bad_multipart)? {
            content.extend_from_slice(&chunk);
        }

        tokio::fs::create_dir_all(upload_dir)
            .await
            .map_err(|e| ServiceError::Internal(format!("could not create upload dir: {}", e)))?;

        let job_id = Uuid::new_v4().simple().to_string();
        let path = upload_dir.join(format!("{}_{}", job_id, filename));
        tokio::fs::write(&path, &content)
            .await
            .map_err(|e| ServiceError::Internal(format!("could not stage upload: {}", e)))?;

        info!("Staged upload {} for job {}", path.display(), job_id);
        return Ok(StagedUpload { job_id, path });
    }

    Err(ServiceError::BadRequest(
        "No file field in upload".to_string(),
    ))
}

fn bad_multipart(e: actix_multipart::MultipartError) -> ServiceError {
    ServiceError::BadRequest(format!("invalid multipart payload: {}", e))
}

fn is_supported(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    lower.ends_with(".csv") || lower.ends_with(".xlsx")
}

/// Uploaded filenames end up in a server-side path; strip separators.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_spreadsheet_extensions_are_supported() {
        assert!(is_supported("faculties.csv"));
        assert!(is_supported("COURSES.XLSX"));
        assert!(!is_supported("report.pdf"));
        assert!(!is_supported("csv"));
    }

    #[test]
    fn path_separators_are_stripped_from_filenames() {
        assert_eq!(sanitize_filename("../../etc/passwd.csv"), ".._.._etc_passwd.csv");
    }
}
