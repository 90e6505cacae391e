//! CSV file data adapter.
//!
//! Reads a report exported as CSV. Rows above the header (the banner) are
//! skipped; the header row position is configurable. Fields are decoded
//! lossily, so a stray Latin-1 byte becomes U+FFFD instead of failing the file.

use crate::domain::error::ConverterError;
use crate::domain::service_row::{parse_amount, parse_day_first, ColumnMap, ServiceRow};
use crate::ports::data_port::DataPort;
use csv::ByteRecord;
use std::fs::File;
use std::path::PathBuf;

pub const DEFAULT_HEADER_ROW: usize = 1;

pub struct CsvAdapter {
    path: PathBuf,
    header_row: usize,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            header_row: DEFAULT_HEADER_ROW,
        }
    }

    /// Zero-based index of the header row in the raw file.
    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    fn unreadable(&self, reason: impl Into<String>) -> ConverterError {
        ConverterError::InputUnreadable {
            source_name: self.path.display().to_string(),
            reason: reason.into(),
        }
    }
}

fn raw(record: &ByteRecord, idx: usize) -> String {
    record
        .get(idx)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}

fn field(record: &ByteRecord, idx: usize) -> String {
    raw(record, idx).trim().to_string()
}

fn is_blank(record: &ByteRecord) -> bool {
    record.iter().all(|f| f.trim_ascii().is_empty())
}

fn to_service_row(record: &ByteRecord, cols: &ColumnMap) -> ServiceRow {
    ServiceRow {
        route: field(record, cols.route),
        service: field(record, cols.service),
        kind: field(record, cols.kind),
        container: field(record, cols.container),
        origin: field(record, cols.origin),
        final_location: field(record, cols.final_location),
        notes: raw(record, cols.notes),
        arrival: parse_day_first(&raw(record, cols.arrival)),
        amount: parse_amount(&raw(record, cols.amount)),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_rows(&self) -> Result<Vec<ServiceRow>, ConverterError> {
        let file = File::open(&self.path).map_err(|e| self.unreadable(e.to_string()))?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut records = rdr.byte_records();
        let header = records
            .by_ref()
            .nth(self.header_row)
            .ok_or_else(|| self.unreadable(format!("no header at row {}", self.header_row + 1)))?
            .map_err(|e| self.unreadable(e.to_string()))?;

        let header: Vec<String> = (0..header.len()).map(|i| raw(&header, i)).collect();
        let cols = ColumnMap::from_header(&header)?;
        log::debug!("{}: column map {:?}", self.path.display(), cols);

        let mut rows = Vec::new();
        for result in records {
            let record = result.map_err(|e| self.unreadable(e.to_string()))?;
            if is_blank(&record) {
                continue;
            }
            rows.push(to_service_row(&record, &cols));
        }

        log::info!("read {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    fn source_name(&self) -> String {
        self.path.display().to_string()
    }
}
