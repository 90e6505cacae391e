//! Output port: a sink for finalized category tables.

use crate::domain::error::ConverterError;
use crate::domain::report::SummaryTable;
use std::path::PathBuf;

/// Port for writing summary tables.
pub trait ReportPort {
    /// Write one table and return where it was stored.
    fn write(&self, table: &SummaryTable) -> Result<PathBuf, ConverterError>;

    /// Default implementation: writes each table in turn, stopping at the
    /// first failure.
    fn write_all(&self, tables: &[SummaryTable]) -> Result<Vec<PathBuf>, ConverterError> {
        tables.iter().map(|t| self.write(t)).collect()
    }
}
