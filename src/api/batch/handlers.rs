use actix_multipart::Multipart;
use actix_web::{
    delete, get, post,
    web::{scope, Data, Path, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use crate::api::error::ServiceError;
use crate::api::{CreatedResponse, MessageResponse, UploadResponse};
use crate::config::Config;
use crate::import::{run_import, stage_upload, ImportTracker};

use super::import::BatchImporter;
use super::models::Batch;
use super::service::BatchService;

#[post("/create")]
async fn create_batch(
    service: Data<BatchService>,
    batch: Json<Batch>,
) -> Result<HttpResponse, ServiceError> {
    let id = service.add_batch(&batch).await?;
    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Batch Created Successfully".to_string(),
        id,
    }))
}

#[get("")]
async fn get_batches(service: Data<BatchService>) -> Result<HttpResponse, ServiceError> {
    let batches = service.list_batches().await?;
    Ok(HttpResponse::Ok().json(batches))
}

#[delete("/{batch_id}")]
async fn delete_batch(
    service: Data<BatchService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let matched = service.delete_batch(&path.into_inner()).await?;
    if matched == 0 {
        return Err(ServiceError::NotFound("Batch not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Batch Deleted Successfully".to_string(),
    }))
}

#[post("/upload")]
async fn upload_batches(
    payload: Multipart,
    config: Data<Config>,
    tracker: Data<ImportTracker>,
    service: Data<BatchService>,
) -> Result<HttpResponse, ServiceError> {
    let staged = stage_upload(payload, config.upload_dir.as_ref()).await?;
    let job_id = staged.job_id.clone();

    tracker.register(&job_id);
    let importer = BatchImporter::new(service.get_ref().clone());
    tokio::spawn(run_import(
        importer,
        tracker.get_ref().clone(),
        job_id.clone(),
        staged.path,
    ));

    Ok(HttpResponse::Accepted().json(UploadResponse {
        message: "File is saved for processing".to_string(),
        job_id,
    }))
}

pub fn batch_config(config: &mut ServiceConfig) {
    config.service(
        scope("batch")
            .service(create_batch)
            .service(get_batches)
            .service(delete_batch)
            .service(upload_batches),
    );
}
