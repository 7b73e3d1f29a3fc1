use std::fmt;

use actix_web::{HttpResponse, ResponseError};
use tracing::{error, warn};

use crate::api::validation::ErrorResponse;
use crate::store::StoreError;

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Document store operation failed
    Store(StoreError),

    /// Uniqueness precondition violated
    Conflict(String),

    /// Referenced document does not exist
    NotFound(String),

    /// Client sent an unusable request
    BadRequest(String),

    /// Anything else that must not leak details to the caller
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Store(e) => write!(f, "storage error: {}", e),
            ServiceError::Conflict(msg)
            | ServiceError::NotFound(msg)
            | ServiceError::BadRequest(msg)
            | ServiceError::Internal(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::Store(e) => {
                error!("Store error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Storage error occurred"}),
                })
            }
            ServiceError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                HttpResponse::Conflict().json(ErrorResponse {
                    error: msg.clone(),
                    fields: serde_json::json!({}),
                })
            }
            ServiceError::NotFound(msg) => {
                warn!("Not found: {}", msg);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: msg.clone(),
                    fields: serde_json::json!({}),
                })
            }
            ServiceError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: msg.clone(),
                    fields: serde_json::json!({}),
                })
            }
            ServiceError::Internal(msg) => {
                error!("Internal error: {}", msg);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({}),
                })
            }
        }
    }
}
