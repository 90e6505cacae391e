//! Report builder: finalized per-category tables.

use crate::domain::aggregator::SummaryRecord;
use crate::domain::category::Category;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

pub const CLIENT: &str = "CLIENTE";
pub const BOOKING: &str = "BL o BOOKING";
pub const SIZE: &str = "TAMAÑO";
pub const PLACEMENT_DATE: &str = "FECHA DE COLOCACIÓN";
pub const CONTAINER: &str = "Contenedor";
pub const ORIGIN_PORT: &str = "PUERTO DE SALIDA";
pub const DROP_OFF: &str = "DIRECCIÓN DE COLOCACIÓN";
pub const EMPTY_RETURN: &str = "ENTREGA DE VACIO";
pub const FREIGHT: &str = "COSTO FLETE $";
pub const AXLE: &str = "3 EJES $";
pub const YARD_PICKUP: &str = "PATIO DE RETIRO $";
pub const RETURN_TRIP: &str = "RETORNO $";
pub const EXTRA_COSTS: &str = "EXTRA COSTOS $";
pub const TOTAL: &str = "MONTO TOTAL $";
pub const TTA_COMMENT: &str = "COMENTARIOS TTA";
pub const MSC_COMMENT: &str = "COMENTARIOS MSC";

/// Output column order.
pub const COLUMNS: [&str; 16] = [
    CLIENT,
    BOOKING,
    SIZE,
    PLACEMENT_DATE,
    CONTAINER,
    ORIGIN_PORT,
    DROP_OFF,
    EMPTY_RETURN,
    FREIGHT,
    AXLE,
    YARD_PICKUP,
    RETURN_TRIP,
    EXTRA_COSTS,
    TOTAL,
    TTA_COMMENT,
    MSC_COMMENT,
];

/// The columns summed into [`TOTAL`].
pub const COST_COLUMNS: [&str; 5] = [FREIGHT, YARD_PICKUP, AXLE, RETURN_TRIP, EXTRA_COSTS];

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Date(NaiveDate),
    Money(Decimal),
}

impl Cell {
    pub fn blank() -> Self {
        Cell::Text(String::new())
    }

    pub fn as_money(&self) -> Option<Decimal> {
        match self {
            Cell::Money(d) => Some(*d),
            _ => None,
        }
    }

    /// Plain text rendering, as written to CSV and used for column widths.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Money(d) => format!("{:.2}", d),
        }
    }
}

/// Money columns are recognised by the currency marker in their header.
pub fn is_money_column(name: &str) -> bool {
    name.contains('$')
}

/// A finalized table for one category, ready for a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub category: Category,
    /// Output name without extension.
    pub name: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl SummaryTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Overwrite each row's total with the sum of its cost cells, located by
    /// header name so a change in column order cannot misalign the sum.
    pub fn recompute_totals(&mut self) {
        let cost_idx: Vec<usize> = COST_COLUMNS
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        let Some(total_idx) = self.column_index(TOTAL) else {
            return;
        };
        for row in &mut self.rows {
            let total: Decimal = cost_idx
                .iter()
                .filter_map(|&i| row.get(i).and_then(Cell::as_money))
                .sum();
            if let Some(cell) = row.get_mut(total_idx) {
                *cell = Cell::Money(total);
            }
        }
    }
}

/// `<category label with underscores>_<timestamp>`.
pub fn output_name(category: Category, timestamp: NaiveDateTime) -> String {
    format!("{}_{}", category.file_stem(), timestamp.format(TIMESTAMP_FORMAT))
}

fn record_cell(record: &SummaryRecord, column: &str) -> Cell {
    let c = &record.charges;
    match column {
        BOOKING => Cell::Text(record.booking.clone()),
        PLACEMENT_DATE => Cell::Date(record.placement_date),
        CONTAINER => Cell::Text(record.container.clone()),
        ORIGIN_PORT => Cell::Text(record.origin_port.clone()),
        DROP_OFF => Cell::Text(record.drop_off_address.clone()),
        EMPTY_RETURN => Cell::Text(record.empty_return.clone()),
        FREIGHT => Cell::Money(c.freight),
        AXLE => Cell::Money(c.axle_surcharge),
        YARD_PICKUP => Cell::Money(c.yard_pickup),
        RETURN_TRIP => Cell::Money(c.return_trip),
        EXTRA_COSTS => Cell::Money(c.extra_costs),
        TOTAL => Cell::Money(Decimal::ZERO),
        TTA_COMMENT => Cell::Text(record.tta_comment.clone()),
        // CLIENTE, TAMAÑO and COMENTARIOS MSC are filled in by hand downstream.
        _ => Cell::blank(),
    }
}

/// Finalize one category: fixed columns, ascending placement date (stable on
/// group order), totals recomputed from the finalized cost cells.
pub fn build(
    category: Category,
    mut records: Vec<SummaryRecord>,
    timestamp: NaiveDateTime,
) -> SummaryTable {
    records.sort_by_key(|r| r.placement_date);

    let rows = records
        .iter()
        .map(|rec| COLUMNS.iter().map(|col| record_cell(rec, col)).collect())
        .collect();

    let mut table = SummaryTable {
        category,
        name: output_name(category, timestamp),
        columns: COLUMNS.to_vec(),
        rows,
    };
    table.recompute_totals();
    table
}
