use async_trait::async_trait;

use crate::api::error::ServiceError;
use crate::api::types::{EmploymentStatus, Gender};
use crate::import::resolver::{name_index, NameIndex};
use crate::import::{FieldReader, RawRow, RowError, RowImporter};
use crate::store::collections;

use super::models::Faculty;
use super::service::FacultyService;

/// Bulk-import half of the faculty service. Every row must name an existing
/// program.
pub struct FacultyImporter {
    service: FacultyService,
}

impl FacultyImporter {
    pub fn new(service: FacultyService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RowImporter for FacultyImporter {
    type Context = NameIndex;

    fn entity(&self) -> &'static str {
        "faculty"
    }

    async fn prepare(&self) -> Result<NameIndex, ServiceError> {
        name_index(self.service.store(), collections::PROGRAMS, "program_name").await
    }

    async fn import_row(&self, programs: &NameIndex, row: &RawRow) -> Result<(), RowError> {
        let program_id = match row.get("program_name").and_then(|name| programs.get(name)) {
            Some(id) => id.to_string(),
            None => {
                return Err(RowError::ResolutionMiss(
                    "Program name not found".to_string(),
                ))
            }
        };

        let faculty = parse_faculty_row(row, program_id)?;
        self.service
            .add_faculty(&faculty)
            .await
            .map_err(|e| RowError::Write(e.to_string()))?;
        Ok(())
    }
}

fn parse_faculty_row(row: &RawRow, program_id: String) -> Result<Faculty, RowError> {
    let mut fields = FieldReader::new(row);
    let first_name = fields.required("first_name");
    let middle_name = fields.optional("middle_name");
    let last_name = fields.optional("last_name");
    let email = fields.required("email");
    let phone_no = fields.required("phone_no");
    let gender = fields.optional_enum("gender", Gender::parse);
    let dob = fields.optional_date("dob");
    let join_date = fields.optional_date("join_date");
    let end_date = fields.optional_date("end_date");
    let status = fields
        .optional_enum("status", EmploymentStatus::parse)
        .unwrap_or_default();

    fields.finish(Faculty {
        user_id: None,
        first_name,
        middle_name,
        last_name,
        email,
        phone_no,
        gender,
        dob,
        program_id,
        join_date,
        end_date,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_row() -> RawRow {
        let mut row = RawRow::default();
        row.insert("first_name", "Ada");
        row.insert("email", "ada@college.edu");
        row.insert("phone_no", "9876543210");
        row
    }

    #[test]
    fn short_phone_number_fails_the_length_constraint() {
        let mut row = base_row();
        row.insert("phone_no", "12345");

        match parse_faculty_row(&row, "p1".to_string()) {
            Err(RowError::Validation(msg)) => {
                assert_eq!(msg, "phone_no: must be exactly 10 characters");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_date_and_bad_status_aggregate() {
        let mut row = base_row();
        row.insert("dob", "01/02/1990");
        row.insert("status", "Retired");

        match parse_faculty_row(&row, "p1".to_string()) {
            Err(RowError::Validation(msg)) => {
                assert_eq!(
                    msg,
                    "dob: must be an ISO date (YYYY-MM-DD); \
                     status: must be one of Active, Resigned"
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn complete_row_parses_with_defaults() {
        let mut row = base_row();
        row.insert("gender", "Female");
        row.insert("dob", "1990-02-01");
        row.insert("join_date", "2020-07-15");

        let faculty = parse_faculty_row(&row, "p1".to_string()).unwrap();
        assert_eq!(faculty.program_id, "p1");
        assert_eq!(faculty.gender, Some(Gender::Female));
        assert_eq!(faculty.status, EmploymentStatus::Active);
        assert!(faculty.user_id.is_none());
    }
}
