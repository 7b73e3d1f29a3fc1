use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};

/// One spreadsheet row keyed by header name. Blank cells count as absent,
/// matching how spreadsheet tools round-trip empty values.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn insert(&mut self, column: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.cells.insert(column.to_string(), value.to_string());
        }
    }

    /// Cell value, `None` when the column is missing or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// Parsed input file: header order plus one `RawRow` per data row.
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// A failed row retained for the sidecar report.
#[derive(Debug)]
pub struct FailedRow {
    pub row: RawRow,
    pub error: String,
}

#[derive(Debug)]
pub enum SheetError {
    Io(std::io::Error),
    Csv(csv::Error),
    Xlsx(calamine::XlsxError),
    Unsupported(String),
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetError::Io(e) => write!(f, "could not read file: {}", e),
            SheetError::Csv(e) => write!(f, "could not parse CSV: {}", e),
            SheetError::Xlsx(e) => write!(f, "could not parse workbook: {}", e),
            SheetError::Unsupported(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for SheetError {}

impl From<std::io::Error> for SheetError {
    fn from(e: std::io::Error) -> Self {
        SheetError::Io(e)
    }
}

impl From<csv::Error> for SheetError {
    fn from(e: csv::Error) -> Self {
        SheetError::Csv(e)
    }
}

impl From<calamine::XlsxError> for SheetError {
    fn from(e: calamine::XlsxError) -> Self {
        SheetError::Xlsx(e)
    }
}

/// Reads a staged upload into rows, choosing the parser by extension.
pub fn read_rows(path: &Path) -> Result<Sheet, SheetError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_csv(path),
        "xlsx" => read_xlsx(path),
        other => Err(SheetError::Unsupported(format!(
            "unsupported file extension: {:?}",
            other
        ))),
    }
}

fn read_csv(path: &Path) -> Result<Sheet, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = RawRow::default();
        for (i, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(i) {
                row.insert(header, value);
            }
        }
        rows.push(row);
    }

    Ok(Sheet { headers, rows })
}

fn read_xlsx(path: &Path) -> Result<Sheet, SheetError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetError::Unsupported("workbook has no sheets".to_string()))??;

    let mut cells = range.rows();
    let headers: Vec<String> = cells
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();

    let mut rows = Vec::new();
    for data in cells {
        let mut row = RawRow::default();
        for (i, header) in headers.iter().enumerate() {
            if let Some(cell) = data.get(i) {
                row.insert(header, &cell_text(cell));
            }
        }
        rows.push(row);
    }

    Ok(Sheet { headers, rows })
}

/// Numeric cells come back as floats; whole numbers are rendered without a
/// fraction so ids and phone numbers survive the round trip.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Sidecar report path: `{stem}_errors.csv` beside the input file.
pub fn error_report_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("upload");
    input.with_file_name(format!("{}_errors.csv", stem))
}

/// Writes failed rows with their original columns plus an `error` column.
pub fn write_error_report(
    path: &Path,
    headers: &[String],
    failures: &[FailedRow],
) -> Result<(), SheetError> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header_row: Vec<&str> = headers.iter().map(String::as_str).collect();
    header_row.push("error");
    writer.write_record(&header_row)?;

    for failure in failures {
        let mut record: Vec<&str> = headers
            .iter()
            .map(|header| failure.row.get(header).unwrap_or(""))
            .collect();
        record.push(&failure.error);
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
