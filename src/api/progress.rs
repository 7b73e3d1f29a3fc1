use actix_web::{
    get,
    web::{scope, Data, Path, ServiceConfig},
    HttpResponse,
};

use crate::api::error::ServiceError;
use crate::import::ImportTracker;

/// Progress snapshot for one import job. Clients poll this until `status`
/// turns terminal; the error report path shows up here when rows failed.
#[get("/{job_id}")]
async fn get_import_job(
    tracker: Data<ImportTracker>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let job_id = path.into_inner();
    match tracker.get(&job_id) {
        Some(job) => Ok(HttpResponse::Ok().json(job)),
        None => Err(ServiceError::NotFound("Import job not found".to_string())),
    }
}

pub fn import_config(config: &mut ServiceConfig) {
    config.service(scope("import").service(get_import_job));
}
