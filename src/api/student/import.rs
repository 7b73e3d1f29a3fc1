use async_trait::async_trait;

use crate::api::error::ServiceError;
use crate::api::types::{EmploymentStatus, Gender};
use crate::import::resolver::{name_index, NameIndex};
use crate::import::{FieldReader, RawRow, RowError, RowImporter};
use crate::store::collections;

use super::models::Student;
use super::service::StudentService;

/// References both programs (required) and batches (optional) for one run.
pub struct StudentRefs {
    programs: NameIndex,
    batches: NameIndex,
}

/// Bulk-import half of the student service.
pub struct StudentImporter {
    service: StudentService,
}

impl StudentImporter {
    pub fn new(service: StudentService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RowImporter for StudentImporter {
    type Context = StudentRefs;

    fn entity(&self) -> &'static str {
        "student"
    }

    async fn prepare(&self) -> Result<StudentRefs, ServiceError> {
        let store = self.service.store();
        Ok(StudentRefs {
            programs: name_index(store, collections::PROGRAMS, "program_name").await?,
            batches: name_index(store, collections::BATCHES, "batch_name").await?,
        })
    }

    async fn import_row(&self, refs: &StudentRefs, row: &RawRow) -> Result<(), RowError> {
        let program_id = match row
            .get("program_name")
            .and_then(|name| refs.programs.get(name))
        {
            Some(id) => id.to_string(),
            None => {
                return Err(RowError::ResolutionMiss(
                    "Program name not found".to_string(),
                ))
            }
        };

        // Batch membership is optional, but a named batch must exist.
        let batch_id = match row.get("batch_name") {
            Some(name) => match refs.batches.get(name) {
                Some(id) => Some(id.to_string()),
                None => {
                    return Err(RowError::ResolutionMiss(
                        "Batch name not found".to_string(),
                    ))
                }
            },
            None => None,
        };

        let student = parse_student_row(row, program_id, batch_id)?;
        self.service
            .add_student(&student)
            .await
            .map_err(|e| RowError::Write(e.to_string()))?;
        Ok(())
    }
}

fn parse_student_row(
    row: &RawRow,
    program_id: String,
    batch_id: Option<String>,
) -> Result<Student, RowError> {
    let mut fields = FieldReader::new(row);
    let first_name = fields.required("first_name");
    let middle_name = fields.optional("middle_name");
    let last_name = fields.optional("last_name");
    let email = fields.required("email");
    let phone_no = fields.required("phone_no");
    let gender = fields.optional_enum("gender", Gender::parse);
    let dob = fields.optional_date("dob");
    let adm_year = fields.optional("adm_year");
    let join_date = fields.optional_date("join_date");
    let end_date = fields.optional_date("end_date");
    let status = fields
        .optional_enum("status", EmploymentStatus::parse)
        .unwrap_or_default();

    fields.finish(Student {
        user_id: None,
        first_name,
        middle_name,
        last_name,
        email,
        phone_no,
        gender,
        dob,
        program_id,
        batch_id,
        adm_year,
        join_date,
        end_date,
        status,
    })
}
