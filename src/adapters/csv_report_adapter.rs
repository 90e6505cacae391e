//! CSV report adapter implementing ReportPort.

use std::fs;
use std::path::PathBuf;

use crate::domain::error::ConverterError;
use crate::domain::report::{Cell, SummaryTable};
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter {
    output_dir: PathBuf,
}

impl CsvReportAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, table: &SummaryTable) -> Result<PathBuf, ConverterError> {
        let path = self.output_dir.join(format!("{}.csv", table.name));
        let output_err = |e: csv::Error| ConverterError::Output {
            name: path.display().to_string(),
            reason: e.to_string(),
        };

        fs::create_dir_all(&self.output_dir)?;
        let mut wtr = csv::Writer::from_path(&path).map_err(output_err)?;
        wtr.write_record(&table.columns).map_err(output_err)?;
        for row in &table.rows {
            wtr.write_record(row.iter().map(Cell::render))
                .map_err(output_err)?;
        }
        wtr.flush()?;

        log::info!("wrote {} rows to {}", table.rows.len(), path.display());
        Ok(path)
    }
}
