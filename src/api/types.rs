use serde::{Deserialize, Serialize};

/// Lifecycle status shared by program, course and batch records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
    Deleted,
}

impl RecordStatus {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            "Deleted" => Ok(Self::Deleted),
            _ => Err("must be one of Active, Inactive, Deleted".to_string()),
        }
    }
}

/// Employment status used by faculty and student records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum EmploymentStatus {
    #[default]
    Active,
    Resigned,
}

impl EmploymentStatus {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "Active" => Ok(Self::Active),
            "Resigned" => Ok(Self::Resigned),
            _ => Err("must be one of Active, Resigned".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Others" => Ok(Self::Others),
            _ => Err("must be one of Male, Female, Others".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Faculty,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum UserStatus {
    Active,
    Inactive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_parse_exact_literals_only() {
        assert_eq!(RecordStatus::parse("Active"), Ok(RecordStatus::Active));
        assert!(RecordStatus::parse("active").is_err());
        assert_eq!(
            EmploymentStatus::parse("Resigned"),
            Ok(EmploymentStatus::Resigned)
        );
        assert!(EmploymentStatus::parse("Retired").is_err());
        assert_eq!(Gender::parse("Others"), Ok(Gender::Others));
        assert!(Gender::parse("other").is_err());
    }

    #[test]
    fn user_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Faculty).unwrap(),
            "\"faculty\""
        );
        assert_eq!(
            serde_json::to_string(&UserStatus::Inactive).unwrap(),
            "\"Inactive\""
        );
    }
}
