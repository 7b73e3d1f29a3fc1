use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::types::{UserRole, UserStatus};

/// A login account. Faculty and student imports create one implicitly, with
/// an `Inactive` status until the owner activates it.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct User {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
}
