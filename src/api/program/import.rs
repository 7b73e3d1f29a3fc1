use async_trait::async_trait;

use crate::api::error::ServiceError;
use crate::api::types::RecordStatus;
use crate::import::{FieldReader, RawRow, RowError, RowImporter};

use super::models::Program;
use super::service::ProgramService;

/// Bulk-import half of the program service. Program rows reference nothing,
/// so the context is empty.
pub struct ProgramImporter {
    service: ProgramService,
}

impl ProgramImporter {
    pub fn new(service: ProgramService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RowImporter for ProgramImporter {
    type Context = ();

    fn entity(&self) -> &'static str {
        "program"
    }

    async fn prepare(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn import_row(&self, _ctx: &(), row: &RawRow) -> Result<(), RowError> {
        let program = parse_program_row(row)?;
        self.service
            .add_program(&program)
            .await
            .map_err(|e| RowError::Write(e.to_string()))?;
        Ok(())
    }
}

fn parse_program_row(row: &RawRow) -> Result<Program, RowError> {
    let mut fields = FieldReader::new(row);
    let program_name = fields.required("program_name");
    let status = fields
        .optional_enum("status", RecordStatus::parse)
        .unwrap_or_default();

    fields.finish(Program {
        program_name,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_name_is_a_validation_error() {
        let row = RawRow::default();
        let result = parse_program_row(&row);
        match result {
            Err(RowError::Validation(msg)) => {
                assert_eq!(msg, "program_name: field required");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_status_literal_is_reported() {
        let mut row = RawRow::default();
        row.insert("program_name", "CS");
        row.insert("status", "Archived");

        match parse_program_row(&row) {
            Err(RowError::Validation(msg)) => {
                assert_eq!(msg, "status: must be one of Active, Inactive, Deleted");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn status_defaults_to_active() {
        let mut row = RawRow::default();
        row.insert("program_name", "CS");

        let program = parse_program_row(&row).unwrap();
        assert_eq!(program.status, RecordStatus::Active);
    }
}
