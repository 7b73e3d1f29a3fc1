use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::types::{EmploymentStatus, Gender};

/// A faculty member. Owns a dependent `User` login account created when the
/// record is written; `user_id` is filled in by the writer.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Faculty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub email: String,
    #[validate(length(equal = 10, message = "must be exactly 10 characters"))]
    pub phone_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    pub program_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: EmploymentStatus,
}
