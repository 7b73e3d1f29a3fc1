use actix_multipart::Multipart;
use actix_web::{
    get, post,
    web::{scope, Data, Path, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use crate::api::error::ServiceError;
use crate::api::{CreatedResponse, UploadResponse};
use crate::config::Config;
use crate::import::{run_import, stage_upload, ImportTracker};

use super::import::FacultyImporter;
use super::models::Faculty;
use super::service::FacultyService;

#[post("/create")]
async fn create_faculty(
    service: Data<FacultyService>,
    faculty: Json<Faculty>,
) -> Result<HttpResponse, ServiceError> {
    let id = service.add_faculty(&faculty).await?;
    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Faculty Added Successfully".to_string(),
        id,
    }))
}

#[get("")]
async fn get_faculties(service: Data<FacultyService>) -> Result<HttpResponse, ServiceError> {
    let faculties = service.list_faculties().await?;
    Ok(HttpResponse::Ok().json(faculties))
}

#[get("/{user_id}")]
async fn get_faculty_by_user_id(
    service: Data<FacultyService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let faculty = service.get_faculty_by_user_id(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(faculty))
}

#[post("/upload")]
async fn upload_faculties(
    payload: Multipart,
    config: Data<Config>,
    tracker: Data<ImportTracker>,
    service: Data<FacultyService>,
) -> Result<HttpResponse, ServiceError> {
    let staged = stage_upload(payload, config.upload_dir.as_ref()).await?;
    let job_id = staged.job_id.clone();

    tracker.register(&job_id);
    let importer = FacultyImporter::new(service.get_ref().clone());
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

pub fn faculty_config(config: &mut ServiceConfig) {
    config.service(
        scope("faculty")
            .service(create_faculty)
            .service(get_faculties)
            .service(upload_faculties)
            .service(get_faculty_by_user_id),
    );
}
