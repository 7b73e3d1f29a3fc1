use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;

/// Error body shared by validation failures and service errors.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

fn bad_request(error: &str, fields: serde_json::Value) -> actix_web::Error {
    let body = ErrorResponse {
        error: error.to_string(),
        fields,
    };
    actix_web::error::InternalError::from_response("", HttpResponse::BadRequest().json(body))
        .into()
}

/// JsonConfig applied app-wide: renders validator and deserialize failures
/// as structured 400 responses instead of the default plain-text body.
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| match err {
        actix_web_validator::Error::Validate(validation_errors) => {
            let mut fields = serde_json::Map::new();
            for (field, errors) in validation_errors.field_errors() {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value for field: {}", field))
                    })
                    .collect();
                fields.insert(field.to_string(), json!({ "errors": messages }));
            }
            bad_request("Validation failed", serde_json::Value::Object(fields))
        }
        actix_web_validator::Error::Deserialize(de_err) => {
            let detail = de_err.to_string();
            let message = if detail.contains("EOF while parsing") {
                "Request body is empty. Expected JSON payload"
            } else if detail.contains("unknown variant") {
                "Invalid enum value. Check allowed values for this field"
            } else {
                "Invalid JSON format"
            };
            bad_request("Request validation failed", json!({ "message": message }))
        }
        _ => bad_request("Validation failed", json!({ "message": "Validation error" })),
    })
}
