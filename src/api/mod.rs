use serde::Serialize;

pub mod batch;
pub mod course;
pub mod error;
pub mod faculty;
pub mod health;
pub mod program;
pub mod progress;
pub mod student;
pub mod types;
pub mod user;
pub mod validation;

/// Plain acknowledgement body.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Acknowledgement carrying the new document id.
#[derive(Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: String,
}

/// Upload acknowledgement; `job_id` is the handle for progress polling.
#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub job_id: String,
}
