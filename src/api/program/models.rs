use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::types::RecordStatus;

/// An academic program; its name is the key bulk imports resolve against.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Program {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub program_name: String,
    #[serde(default)]
    pub status: RecordStatus,
}
