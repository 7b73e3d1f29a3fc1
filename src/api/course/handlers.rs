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

use super::import::CourseImporter;
use super::models::Course;
use super::service::CourseService;

#[post("/create")]
async fn create_course(
    service: Data<CourseService>,
    course: Json<Course>,
) -> Result<HttpResponse, ServiceError> {
    let id = service.add_course(&course).await?;
    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Course Added Successfully".to_string(),
        id,
    }))
}

#[get("")]
async fn get_courses(service: Data<CourseService>) -> Result<HttpResponse, ServiceError> {
    let courses = service.list_courses().await?;
    Ok(HttpResponse::Ok().json(courses))
}

#[delete("/{course_id}")]
async fn delete_course(
    service: Data<CourseService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let matched = service.delete_course(&path.into_inner()).await?;
    if matched == 0 {
        return Err(ServiceError::NotFound("Course not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Course Deleted Successfully".to_string(),
    }))
}

#[post("/upload")]
async fn upload_courses(
    payload: Multipart,
    config: Data<Config>,
    tracker: Data<ImportTracker>,
    service: Data<CourseService>,
) -> Result<HttpResponse, ServiceError> {
    let staged = stage_upload(payload, config.upload_dir.as_ref()).await?;
    let job_id = staged.job_id.clone();

    tracker.register(&job_id);
    let importer = CourseImporter::new(service.get_ref().clone());
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

pub fn course_config(config: &mut ServiceConfig) {
    config.service(
        scope("course")
            .service(create_course)
            .service(get_courses)
            .service(delete_course)
            .service(upload_courses),
    );
}
