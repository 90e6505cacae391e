//! Spreadsheet report adapter implementing ReportPort.
//!
//! Writes each summary table to `<name>.xlsx` with a styled header row,
//! currency-formatted cost columns and widths sized to the content.

use std::fs;
use std::path::PathBuf;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};

use crate::domain::error::ConverterError;
use crate::domain::report::{is_money_column, Cell, SummaryTable};
use crate::ports::report_port::ReportPort;

pub const DEFAULT_SHEET_NAME: &str = "TO";

const HEADER_ROW_HEIGHT: f64 = 20.0;
const MONEY_FORMAT: &str = "$#,##0.00";
const DATE_FORMAT: &str = "yyyy-mm-dd";

pub struct XlsxReportAdapter {
    output_dir: PathBuf,
    sheet_name: String,
    autofit: bool,
}

impl XlsxReportAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            autofit: true,
        }
    }

    pub fn with_sheet_name(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = sheet_name.into();
        self
    }

    pub fn with_autofit(mut self, autofit: bool) -> Self {
        self.autofit = autofit;
        self
    }

    fn build_workbook(&self, table: &SummaryTable) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.sheet_name)?;

        let header_format = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::Black)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);
        let cell_format = Format::new().set_border(FormatBorder::Thin);
        let money_format = Format::new()
            .set_num_format(MONEY_FORMAT)
            .set_border(FormatBorder::Thin);
        let date_format = Format::new()
            .set_num_format(DATE_FORMAT)
            .set_border(FormatBorder::Thin);

        for (col, name) in table.columns.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *name, &header_format)?;
        }
        sheet.set_row_height(0, HEADER_ROW_HEIGHT)?;

        for (r, row) in table.rows.iter().enumerate() {
            let excel_row = (r + 1) as u32;
            for (c, cell) in row.iter().enumerate() {
                let excel_col = c as u16;
                let money_col = table.columns.get(c).is_some_and(|h| is_money_column(h));
                match cell {
                    Cell::Money(amount) => {
                        let value = amount.to_f64().unwrap_or_default();
                        sheet.write_number_with_format(excel_row, excel_col, value, &money_format)?;
                    }
                    Cell::Date(date) => {
                        sheet.write_datetime_with_format(excel_row, excel_col, date, &date_format)?;
                    }
                    Cell::Text(text) if text.is_empty() => {
                        let format = if money_col { &money_format } else { &cell_format };
                        sheet.write_blank(excel_row, excel_col, format)?;
                    }
                    Cell::Text(text) => {
                        sheet.write_string_with_format(excel_row, excel_col, text, &cell_format)?;
                    }
                }
            }
        }

        if self.autofit {
            for (col, width) in column_widths(table).into_iter().enumerate() {
                sheet.set_column_width(col as u16, width as f64)?;
            }
        }

        Ok(workbook)
    }
}

/// Longest rendered value per column, header included, plus two characters of
/// padding.
pub fn column_widths(table: &SummaryTable) -> Vec<usize> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(c, header)| {
            let longest = table
                .rows
                .iter()
                .filter_map(|row| row.get(c))
                .map(|cell| cell.render().chars().count())
                .max()
                .unwrap_or(0);
            longest.max(header.chars().count()) + 2
        })
        .collect()
}

impl ReportPort for XlsxReportAdapter {
    fn write(&self, table: &SummaryTable) -> Result<PathBuf, ConverterError> {
        let path = self.output_dir.join(format!("{}.xlsx", table.name));
        let output_err = |reason: String| ConverterError::Output {
            name: path.display().to_string(),
            reason,
        };

        fs::create_dir_all(&self.output_dir)?;
        let mut workbook = self
            .build_workbook(table)
            .map_err(|e| output_err(e.to_string()))?;
        workbook.save(&path).map_err(|e| output_err(e.to_string()))?;

        log::info!("wrote {} rows to {}", table.rows.len(), path.display());
        Ok(path)
    }
}
