//! Service row representation and cell parsing helpers.

use crate::domain::error::ConverterError;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

pub const COL_ROUTE: &str = "Ruta";
pub const COL_SERVICE: &str = "Tipo Servicio";
pub const COL_KIND: &str = "Tipo";
pub const COL_CONTAINER: &str = "Contenedor";
pub const COL_ORIGIN: &str = "Origen";
pub const COL_FINAL_LOCATION: &str = "Ubicación Final";
pub const COL_NOTES: &str = "Notas";
pub const COL_AMOUNT: &str = "Monto";
pub const COL_ARRIVAL: &str = "Fecha y Hora Llegada";

pub const REQUIRED_COLUMNS: [&str; 9] = [
    COL_ROUTE,
    COL_SERVICE,
    COL_KIND,
    COL_CONTAINER,
    COL_ORIGIN,
    COL_FINAL_LOCATION,
    COL_NOTES,
    COL_AMOUNT,
    COL_ARRIVAL,
];

/// One recorded logistics event from the operations report.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRow {
    pub route: String,
    pub service: String,
    /// Event kind, the report's "Tipo" column.
    pub kind: String,
    pub container: String,
    pub origin: String,
    pub final_location: String,
    pub notes: String,
    pub arrival: Option<NaiveDateTime>,
    /// `None` when the source cell held something that is not a number.
    pub amount: Option<Decimal>,
}

/// Positions of the required columns in an input header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub route: usize,
    pub service: usize,
    pub kind: usize,
    pub container: usize,
    pub origin: usize,
    pub final_location: usize,
    pub notes: usize,
    pub amount: usize,
    pub arrival: usize,
}

impl ColumnMap {
    /// Locate every required column. Unknown columns are ignored; the first
    /// occurrence wins when a header repeats.
    pub fn from_header<S: AsRef<str>>(header: &[S]) -> Result<Self, ConverterError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.as_ref().trim() == name)
                .ok_or_else(|| ConverterError::MissingColumn {
                    column: name.to_string(),
                })
        };
        Ok(Self {
            route: find(COL_ROUTE)?,
            service: find(COL_SERVICE)?,
            kind: find(COL_KIND)?,
            container: find(COL_CONTAINER)?,
            origin: find(COL_ORIGIN)?,
            final_location: find(COL_FINAL_LOCATION)?,
            notes: find(COL_NOTES)?,
            amount: find(COL_AMOUNT)?,
            arrival: find(COL_ARRIVAL)?,
        })
    }
}

/// Formats tried in order; day always precedes month. Two-digit years come
/// first because `%Y` would read "25" as the year 25. `%.f` also matches no
/// fraction at all.
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S%.f",
    "%d/%m/%y %H:%M",
    "%d/%m/%y %I:%M:%S %p",
    "%d/%m/%y %I:%M %p",
    "%d-%m-%y %H:%M:%S%.f",
    "%d-%m-%y %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %I:%M %p",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d-%m-%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
];

/// Earlier years are a misread (a truncated or mangled year), not a real arrival.
const MIN_YEAR: i32 = 1900;

/// Parse an arrival timestamp with day-first ordering.
///
/// ISO dates (`YYYY-MM-DD`) are unambiguous and accepted as well. Two-digit
/// years follow chrono's `%y` pivot (00-68 is 20xx). A bare date is taken at
/// midnight. Returns `None` for blank or unrecognised input, or a year before
/// 1900.
pub fn parse_day_first(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let datetime = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })?;
    (datetime.year() >= MIN_YEAR).then_some(datetime)
}

/// Parse a monetary cell. Blank cells count as zero.
///
/// Currency symbols and thousands separators are stripped before parsing.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '₡' | ',' | ' '))
        .collect();
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("nan") {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn column_map_ignores_extra_columns() {
        let header = [
            "Id", "Ruta", "Tipo Servicio", "Tipo", "Contenedor", "Chofer", "Origen",
            "Ubicación Final", "Notas", "Monto", "Fecha y Hora Llegada",
        ];
        let map = ColumnMap::from_header(&header).unwrap();
        assert_eq!(map.route, 1);
        assert_eq!(map.origin, 6);
        assert_eq!(map.arrival, 10);
    }

    #[test]
    fn column_map_reports_missing_column() {
        let header = ["Ruta", "Tipo Servicio", "Tipo", "Contenedor", "Origen"];
        let err = ColumnMap::from_header(&header).unwrap_err();
        assert!(
            matches!(err, ConverterError::MissingColumn { column } if column == "Ubicación Final")
        );
    }

    #[test]
    fn day_first_slash_format() {
        assert_eq!(
            parse_day_first("03/04/2025 14:30"),
            Some(dt(2025, 4, 3, 14, 30))
        );
        assert_eq!(
            parse_day_first("03/04/2025 14:30:00"),
            Some(dt(2025, 4, 3, 14, 30))
        );
    }

    #[test]
    fn two_digit_year_is_current_century() {
        assert_eq!(
            parse_day_first("03/04/25 14:30"),
            Some(dt(2025, 4, 3, 14, 30))
        );
        assert_eq!(
            parse_day_first("03-04-25 14:30:00"),
            Some(dt(2025, 4, 3, 14, 30))
        );
        assert_eq!(parse_day_first("03/04/25"), Some(dt(2025, 4, 3, 0, 0)));
    }

    #[test]
    fn fractional_seconds_accepted() {
        let expected = NaiveDate::from_ymd_opt(2025, 4, 3)
            .unwrap()
            .and_hms_milli_opt(14, 30, 0, 250)
            .unwrap();
        assert_eq!(parse_day_first("03/04/2025 14:30:00.250"), Some(expected));
        assert_eq!(
            parse_day_first("2025-04-03 14:30:00.000"),
            Some(dt(2025, 4, 3, 14, 30))
        );
        let half = dt(2025, 4, 3, 14, 30) + chrono::TimeDelta::milliseconds(500);
        assert_eq!(parse_day_first("2025-04-03T14:30:00.5"), Some(half));
    }

    #[test]
    fn implausible_year_is_none() {
        assert_eq!(parse_day_first("03/04/0025 14:30"), None);
        assert_eq!(parse_day_first("03/04/125"), None);
    }

    #[test]
    fn day_first_rejects_month_overflow() {
        // 25 cannot be a month, and day-first never swaps.
        assert_eq!(parse_day_first("04/25/2025 10:00"), None);
    }

    #[test]
    fn iso_and_bare_dates_accepted() {
        assert_eq!(
            parse_day_first("2025-04-03 08:15:00"),
            Some(dt(2025, 4, 3, 8, 15))
        );
        assert_eq!(parse_day_first("03/04/2025"), Some(dt(2025, 4, 3, 0, 0)));
    }

    #[test]
    fn blank_arrival_is_none() {
        assert_eq!(parse_day_first("   "), None);
        assert_eq!(parse_day_first("sin fecha"), None);
    }

    #[test]
    fn amount_strips_symbols() {
        assert_eq!(parse_amount("$1,250.50"), Some(Decimal::new(125050, 2)));
        assert_eq!(parse_amount(" 90 "), Some(Decimal::from(90)));
    }

    #[test]
    fn blank_amount_is_zero() {
        assert_eq!(parse_amount(""), Some(Decimal::ZERO));
        assert_eq!(parse_amount("nan"), Some(Decimal::ZERO));
    }

    #[test]
    fn malformed_amount_is_none() {
        assert_eq!(parse_amount("cien"), None);
    }
}
