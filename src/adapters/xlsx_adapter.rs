//! Spreadsheet data adapter.
//!
//! Opens any workbook format calamine understands (xlsx, xlsm, xls, ods) and
//! reads the first sheet. The first row is a banner; the header sits on the
//! second row unless configured otherwise.

use crate::adapters::csv_adapter::DEFAULT_HEADER_ROW;
use crate::domain::error::ConverterError;
use crate::domain::service_row::{parse_amount, parse_day_first, ColumnMap, ServiceRow};
use crate::ports::data_port::DataPort;
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDateTime;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::path::PathBuf;

pub struct XlsxAdapter {
    path: PathBuf,
    header_row: usize,
}

impl XlsxAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            header_row: DEFAULT_HEADER_ROW,
        }
    }

    /// Zero-based index of the header row in the sheet.
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

impl DataPort for XlsxAdapter {
    fn fetch_rows(&self) -> Result<Vec<ServiceRow>, ConverterError> {
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| self.unreadable(format!("failed to open workbook: {}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| self.unreadable("workbook has no sheets"))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| self.unreadable(format!("failed to read sheet {}: {}", sheet_name, e)))?;

        let rows = rows_from_range(&range, self.header_row)
            .map_err(|e| match e {
                ConverterError::InputUnreadable { reason, .. } => self.unreadable(reason),
                other => other,
            })?;
        log::info!(
            "read {} rows from {} [{}]",
            rows.len(),
            self.path.display(),
            sheet_name
        );
        Ok(rows)
    }

    fn source_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Convert a sheet range into service rows. `header_row` is an absolute sheet
/// row; calamine ranges start at the first used cell, so it is rebased here.
pub fn rows_from_range(
    range: &Range<Data>,
    header_row: usize,
) -> Result<Vec<ServiceRow>, ConverterError> {
    let start_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);
    let header_idx = header_row.saturating_sub(start_row);

    let mut iter = range.rows().skip(header_idx);
    let header: Vec<String> = iter
        .next()
        .ok_or_else(|| ConverterError::InputUnreadable {
            source_name: "sheet".into(),
            reason: format!("no header at row {}", header_row + 1),
        })?
        .iter()
        .map(cell_text)
        .collect();
    let cols = ColumnMap::from_header(&header)?;
    log::debug!("sheet column map {:?}", cols);

    Ok(iter
        .filter(|row| !row.iter().all(|c| cell_text(c).is_empty()))
        .map(|row| to_service_row(row, &cols))
        .collect())
}

fn to_service_row(row: &[Data], cols: &ColumnMap) -> ServiceRow {
    let text = |idx: usize| row.get(idx).map(cell_text).unwrap_or_default();
    ServiceRow {
        route: text(cols.route),
        service: text(cols.service),
        kind: text(cols.kind),
        container: text(cols.container),
        origin: text(cols.origin),
        final_location: text(cols.final_location),
        notes: row.get(cols.notes).map(cell_raw_text).unwrap_or_default(),
        arrival: row.get(cols.arrival).and_then(cell_datetime),
        amount: row.get(cols.amount).map_or(Some(Decimal::ZERO), cell_amount),
    }
}

fn cell_raw_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => cell_text(other),
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        _ => String::new(),
    }
}

fn cell_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime(),
        Data::DateTimeIso(s) | Data::String(s) => parse_day_first(s),
        _ => None,
    }
}

fn cell_amount(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Empty => Some(Decimal::ZERO),
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::Float(f) => Decimal::from_f64(*f),
        Data::String(s) => parse_amount(s),
        _ => None,
    }
}
