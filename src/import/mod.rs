use std::fmt;

use chrono::NaiveDate;
use validator::{Validate, ValidationErrors};

pub mod pipeline;
pub mod resolver;
pub mod sheet;
pub mod tracker;
pub mod upload;

pub use pipeline::{run_import, RowImporter};
pub use sheet::RawRow;
pub use tracker::{ImportJob, ImportTracker, JobStatus};
pub use upload::stage_upload;

/// Why a single row was not imported. Tagged so the report writer and tests
/// can tell the three failure classes apart without parsing strings.
#[derive(Debug)]
pub enum RowError {
    /// A referenced display name had no matching document.
    ResolutionMiss(String),
    /// Field-level failures, aggregated into one message per row.
    Validation(String),
    /// The entity writer rejected the record (conflict or store failure).
    Write(String),
}

impl RowError {
    pub fn message(&self) -> &str {
        match self {
            RowError::ResolutionMiss(msg) | RowError::Validation(msg) | RowError::Write(msg) => {
                msg
            }
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Flattens validator output into `"<field>: <message>"` lines, sorted for
/// stable aggregation.
pub fn field_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let detail = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "invalid value".to_string());
                format!("{}: {}", field, detail)
            })
        })
        .collect();
    messages.sort();
    messages
}

/// Pulls typed values out of a row while collecting per-field coercion
/// failures; `finish` folds them (plus validator constraints) into one
/// `RowError::Validation`.
pub struct FieldReader<'a> {
    row: &'a RawRow,
    errors: Vec<String>,
}

impl<'a> FieldReader<'a> {
    pub fn new(row: &'a RawRow) -> Self {
        Self {
            row,
            errors: Vec::new(),
        }
    }

    pub fn required(&mut self, field: &str) -> String {
        let value = self.row.get(field);
        match value {
            Some(v) => v.to_string(),
            None => {
                self.errors.push(format!("{}: field required", field));
                String::new()
            }
        }
    }

    pub fn optional(&self, field: &str) -> Option<String> {
        self.row.get(field).map(str::to_string)
    }

    pub fn required_i32(&mut self, field: &str) -> i32 {
        let value = self.row.get(field);
        match value {
            Some(v) => match v.parse() {
                Ok(n) => n,
                Err(_) => {
                    self.errors.push(format!("{}: must be an integer", field));
                    0
                }
            },
            None => {
                self.errors.push(format!("{}: field required", field));
                0
            }
        }
    }

    pub fn optional_i32(&mut self, field: &str) -> Option<i32> {
        let value = self.row.get(field);
        match value {
            Some(v) => match v.parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    self.errors.push(format!("{}: must be an integer", field));
                    None
                }
            },
            None => None,
        }
    }

    pub fn optional_date(&mut self, field: &str) -> Option<NaiveDate> {
        let value = self.row.get(field);
        match value {
            Some(v) => match NaiveDate::parse_from_str(v, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    self.errors
                        .push(format!("{}: must be an ISO date (YYYY-MM-DD)", field));
                    None
                }
            },
            None => None,
        }
    }

    pub fn optional_enum<T>(
        &mut self,
        field: &str,
        parse: fn(&str) -> Result<T, String>,
    ) -> Option<T> {
        let value = self.row.get(field);
        match value {
            Some(v) => match parse(v) {
                Ok(parsed) => Some(parsed),
                Err(detail) => {
                    self.errors.push(format!("{}: {}", field, detail));
                    None
                }
            },
            None => None,
        }
    }

    /// Runs the record's validator constraints and aggregates everything
    /// into one row error, joined by `"; "`.
    pub fn finish<T: Validate>(self, record: T) -> Result<T, RowError> {
        let mut errors = self.errors;
        if errors.is_empty() {
            if let Err(validation) = record.validate() {
                errors.extend(field_messages(&validation));
            }
        }
        if errors.is_empty() {
            Ok(record)
        } else {
            Err(RowError::Validation(errors.join("; ")))
        }
    }
}
