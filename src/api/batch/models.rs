use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::types::RecordStatus;

/// A cohort of students admitted together; its name is the key student
/// imports resolve against.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Batch {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub batch_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_in_charge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}
