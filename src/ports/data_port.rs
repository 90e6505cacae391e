//! Input port: a source of service rows.

use crate::domain::error::ConverterError;
use crate::domain::service_row::ServiceRow;

pub trait DataPort {
    /// Read every data row in input order.
    ///
    /// Fails only when the input as a whole cannot be read as a table or lacks
    /// a required column. Individual bad cells are carried in the row.
    fn fetch_rows(&self) -> Result<Vec<ServiceRow>, ConverterError>;

    /// Human-readable name of the source for log and error messages.
    fn source_name(&self) -> String;
}
