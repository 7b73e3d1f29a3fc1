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

use super::import::ProgramImporter;
use super::models::Program;
use super::service::ProgramService;

#[post("/create")]
async fn create_program(
    service: Data<ProgramService>,
    program: Json<Program>,
) -> Result<HttpResponse, ServiceError> {
    let id = service.add_program(&program).await?;
    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Program Added Successfully".to_string(),
        id,
    }))
}

#[get("")]
async fn get_programs(service: Data<ProgramService>) -> Result<HttpResponse, ServiceError> {
    let programs = service.list_programs().await?;
    Ok(HttpResponse::Ok().json(programs))
}

#[delete("/{program_id}")]
async fn delete_program(
    service: Data<ProgramService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let matched = service.delete_program(&path.into_inner()).await?;
    if matched == 0 {
        return Err(ServiceError::NotFound("Program not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Program Deleted Successfully".to_string(),
    }))
}

#[post("/upload")]
async fn upload_programs(
    payload: Multipart,
    config: Data<Config>,
    tracker: Data<ImportTracker>,
    service: Data<ProgramService>,
) -> Result<HttpResponse, ServiceError> {
    let staged = stage_upload(payload, config.upload_dir.as_ref()).await?;
    let job_id = staged.job_id.clone();

    // Register before responding so an immediate poll finds the job.
    tracker.register(&job_id);
    let importer = ProgramImporter::new(service.get_ref().clone());
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

pub fn program_config(config: &mut ServiceConfig) {
    config.service(
        scope("program")
            .service(create_program)
            .service(get_programs)
            .service(delete_program)
            .service(upload_programs),
    );
}
