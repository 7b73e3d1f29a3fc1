use actix_web::{
    get, post,
    web::{scope, Data, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use crate::api::error::ServiceError;
use crate::api::CreatedResponse;

use super::models::User;
use super::service::UserService;

#[post("/create")]
async fn create_user(
    service: Data<UserService>,
    user: Json<User>,
) -> Result<HttpResponse, ServiceError> {
    let id = service.add_user(&user).await?;
    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "User Added Successfully".to_string(),
        id,
    }))
}

#[get("")]
async fn get_users(service: Data<UserService>) -> Result<HttpResponse, ServiceError> {
    let users = service.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

pub fn user_config(config: &mut ServiceConfig) {
    config.service(scope("user").service(create_user).service(get_users));
}
