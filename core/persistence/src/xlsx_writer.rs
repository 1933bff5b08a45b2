//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::ExportError;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

/// Excel column width limit, in characters.
const MAX_COLUMN_WIDTH: usize = 80;

/// Write a single-sheet workbook: a bold header row, then one row per record.
/// Every value is written as a string cell; prices and dates stay pre-formatted text.
pub fn write_spreadsheet(
    sheet_name: &str,
    headers: &[&str],
    body: &[Vec<&str>],
) -> Result<Vec<u8>, ExportError> {
    let mut xlsx = XlsxWorkbook::new();
    let worksheet = xlsx.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let header_format = Format::new().set_bold();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (index, values) in body.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, value) in values.iter().enumerate() {
            worksheet.write_string(row, col as u16, *value)?;
            if let Some(width) = widths.get_mut(col) {
                *width = (*width).max(value.chars().count());
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        let excel_width = (*width + 2).min(MAX_COLUMN_WIDTH) as f64;
        worksheet.set_column_width(col as u16, excel_width)?;
    }

    let bytes = xlsx.save_to_buffer()?;
    log::debug!("wrote sheet '{}' with {} rows, {} bytes", sheet_name, body.len(), bytes.len());
    Ok(bytes)
}
