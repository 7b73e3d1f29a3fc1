use async_trait::async_trait;

use crate::api::error::ServiceError;
use crate::api::types::RecordStatus;
use crate::import::resolver::{name_index, NameIndex};
use crate::import::{FieldReader, RawRow, RowError, RowImporter};
use crate::store::collections;

use super::models::Course;
use super::service::CourseService;

/// Bulk-import half of the course service. Rows name their program; the
/// context maps program names to ids for the whole run.
pub struct CourseImporter {
    service: CourseService,
}

impl CourseImporter {
    pub fn new(service: CourseService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RowImporter for CourseImporter {
    type Context = NameIndex;

    fn entity(&self) -> &'static str {
        "course"
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

        let course = parse_course_row(row, program_id)?;
        self.service
            .add_course(&course)
            .await
            .map_err(|e| RowError::Write(e.to_string()))?;
        Ok(())
    }
}

fn parse_course_row(row: &RawRow, program_id: String) -> Result<Course, RowError> {
    let mut fields = FieldReader::new(row);
    let course_code = fields.required("course_code");
    let course_name = fields.required("course_name");
    let semester = fields.required_i32("semester");
    let status = fields
        .optional_enum("status", RecordStatus::parse)
        .unwrap_or_default();

    fields.finish(Course {
        course_code,
        course_name,
        semester,
        program_id: Some(program_id),
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_aggregated_into_one_message() {
        let row = RawRow::default();
        match parse_course_row(&row, "p1".to_string()) {
            Err(RowError::Validation(msg)) => {
                assert_eq!(
                    msg,
                    "course_code: field required; course_name: field required; \
                     semester: field required"
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_semester_is_a_coercion_error() {
        let mut row = RawRow::default();
        row.insert("course_code", "CS101");
        row.insert("course_name", "Intro to Programming");
        row.insert("semester", "first");

        match parse_course_row(&row, "p1".to_string()) {
            Err(RowError::Validation(msg)) => {
                assert_eq!(msg, "semester: must be an integer");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn valid_row_carries_the_resolved_program_id() {
        let mut row = RawRow::default();
        row.insert("course_code", "CS101");
        row.insert("course_name", "Intro to Programming");
        row.insert("semester", "1");

        let course = parse_course_row(&row, "p1".to_string()).unwrap();
        assert_eq!(course.program_id.as_deref(), Some("p1"));
        assert_eq!(course.semester, 1);
        assert_eq!(course.status, RecordStatus::Active);
    }
}
