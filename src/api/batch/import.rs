use async_trait::async_trait;

use crate::api::error::ServiceError;
use crate::api::types::RecordStatus;
use crate::import::resolver::{name_index, NameIndex};
use crate::import::{FieldReader, RawRow, RowError, RowImporter};
use crate::store::collections;

use super::models::Batch;
use super::service::BatchService;

/// Bulk-import half of the batch service. The program reference is optional
/// on batch rows, but a named program must exist.
pub struct BatchImporter {
    service: BatchService,
}

impl BatchImporter {
    pub fn new(service: BatchService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RowImporter for BatchImporter {
    type Context = NameIndex;

    fn entity(&self) -> &'static str {
        "batch"
    }

    async fn prepare(&self) -> Result<NameIndex, ServiceError> {
        name_index(self.service.store(), collections::PROGRAMS, "program_name").await
    }

    async fn import_row(&self, programs: &NameIndex, row: &RawRow) -> Result<(), RowError> {
        let program_id = match row.get("program_name") {
            Some(name) => match programs.get(name) {
                Some(id) => Some(id.to_string()),
                None => {
                    return Err(RowError::ResolutionMiss(
                        "Program name not found".to_string(),
                    ))
                }
            },
            None => None,
        };

        let batch = parse_batch_row(row, program_id)?;
        self.service
            .add_batch(&batch)
            .await
            .map_err(|e| RowError::Write(e.to_string()))?;
        Ok(())
    }
}

fn parse_batch_row(row: &RawRow, program_id: Option<String>) -> Result<Batch, RowError> {
    let mut fields = FieldReader::new(row);
    let batch_name = fields.required("batch_name");
    let faculty_in_charge = fields.optional("faculty_in_charge");
    let semester = fields.optional_i32("semester");
    let start_date = fields.optional("start_date");
    let end_date = fields.optional("end_date");
    let status = fields
        .optional_enum("status", RecordStatus::parse)
        .unwrap_or_default();

    fields.finish(Batch {
        batch_name,
        faculty_in_charge,
        program_id,
        semester,
        start_date,
        end_date,
        status,
    })
}
