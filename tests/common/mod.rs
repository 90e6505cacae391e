#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::path::PathBuf;
use to_converter::domain::error::ConverterError;
use to_converter::domain::report::SummaryTable;
pub use to_converter::domain::service_row::ServiceRow;
use to_converter::ports::data_port::DataPort;
use to_converter::ports::report_port::ReportPort;

pub const GUIDE: &str = "Guía";
pub const ADDITIONAL: &str = "Cargo Adicional Guía";

pub struct MockDataPort {
    pub rows: Vec<ServiceRow>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(rows: Vec<ServiceRow>) -> Self {
        Self { rows, error: None }
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_rows(&self) -> Result<Vec<ServiceRow>, ConverterError> {
        if let Some(reason) = &self.error {
            return Err(ConverterError::InputUnreadable {
                source_name: self.source_name(),
                reason: reason.clone(),
            });
        }
        Ok(self.rows.clone())
    }

    fn source_name(&self) -> String {
        "mock".to_string()
    }
}

/// Records every table handed to it instead of touching the filesystem.
pub struct MockReportPort {
    pub written: RefCell<Vec<SummaryTable>>,
    pub fail_on: Option<String>,
}

impl MockReportPort {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(mut self, name_prefix: &str) -> Self {
        self.fail_on = Some(name_prefix.to_string());
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.written.borrow().iter().map(|t| t.name.clone()).collect()
    }
}

impl ReportPort for MockReportPort {
    fn write(&self, table: &SummaryTable) -> Result<PathBuf, ConverterError> {
        if let Some(prefix) = &self.fail_on {
            if table.name.starts_with(prefix.as_str()) {
                return Err(ConverterError::Output {
                    name: table.name.clone(),
                    reason: "disk full".into(),
                });
            }
        }
        self.written.borrow_mut().push(table.clone());
        Ok(PathBuf::from(format!("{}.mock", table.name)))
    }
}

pub fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn arrival(date: &str) -> Option<NaiveDateTime> {
    Some(NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M").unwrap())
}

/// A guide-charge row with a fixed arrival; tweak fields with struct update syntax.
pub fn make_row(
    route: &str,
    kind: &str,
    service: &str,
    container: &str,
    amount: Decimal,
) -> ServiceRow {
    ServiceRow {
        route: route.to_string(),
        service: service.to_string(),
        kind: kind.to_string(),
        container: container.to_string(),
        origin: "Puerto Caldera".to_string(),
        final_location: "Patio Coyol".to_string(),
        notes: String::new(),
        arrival: arrival("2025-05-20 08:00"),
        amount: Some(amount),
    }
}

pub fn guide(route: &str, service: &str, container: &str, amount: Decimal) -> ServiceRow {
    make_row(route, GUIDE, service, container, amount)
}

pub fn additional(route: &str, service: &str, container: &str, amount: Decimal) -> ServiceRow {
    make_row(route, ADDITIONAL, service, container, amount)
}

pub const REPORT_HEADER: &str =
    "Ruta,Tipo Servicio,Tipo,Contenedor,Origen,Ubicación Final,Notas,Monto,Fecha y Hora Llegada";

/// A CSV operations report with the usual banner line above the header.
pub fn write_csv_report(dir: &tempfile::TempDir, body: &[&str]) -> PathBuf {
    let path = dir.path().join("operaciones.csv");
    let mut content = format!("Reporte de Operaciones\n{}\n", REPORT_HEADER);
    for line in body {
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(&path, content).unwrap();
    path
}
