use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::types::RecordStatus;

/// A course offered within a program. `course_code` is unique across the
/// whole catalog.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Course {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub course_code: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub course_name: String,
    pub semester: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}
