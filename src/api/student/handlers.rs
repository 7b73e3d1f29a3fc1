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

use super::import::StudentImporter;
use super::models::Student;
use super::service::StudentService;

#[post("/create")]
async fn create_student(
    service: Data<StudentService>,
    student: Json<Student>,
) -> Result<HttpResponse, ServiceError> {
    let id = service.add_student(&student).await?;
    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Student Added Successfully".to_string(),
        id,
    }))
}

#[get("")]
async fn get_students(service: Data<StudentService>) -> Result<HttpResponse, ServiceError> {
    let students = service.list_students().await?;
    Ok(HttpResponse::Ok().json(students))
}

#[get("/{user_id}")]
async fn get_student_by_user_id(
    service: Data<StudentService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let student = service.get_student_by_user_id(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(student))
}

#[post("/upload")]
async fn upload_students(
    payload: Multipart,
    config: Data<Config>,
    tracker: Data<ImportTracker>,
    service: Data<StudentService>,
) -> Result<HttpResponse, ServiceError> {
    let staged = stage_upload(payload, config.upload_dir.as_ref()).await?;
    let job_id = staged.job_id.clone();

    tracker.register(&job_id);
    let importer = StudentImporter::new(service.get_ref().clone());
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

pub fn student_config(config: &mut ServiceConfig) {
    config.service(
        scope("student")
            .service(create_student)
            .service(get_students)
            .service(upload_students)
            .service(get_student_by_user_id),
    );
}
