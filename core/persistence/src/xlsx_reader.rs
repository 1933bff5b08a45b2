// FILENAME: core\persistence\src\xlsx_reader.rs

use crate::ExportError;
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

/// Text content of one worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetText {
    pub name: String,
    /// Rows from the first used row, padded to the widest row.
    pub rows: Vec<Vec<String>>,
}

/// Read the first worksheet of an XLSX buffer as plain text.
pub fn read_sheet_text(bytes: &[u8]) -> Result<SheetText, ExportError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let sheet_names = workbook.sheet_names().to_vec();

    let Some(name) = sheet_names.first() else {
        return Err(ExportError::InvalidFormat(
            "Workbook contains no sheets".to_string(),
        ));
    };

    let range = workbook
        .worksheet_range(name)
        .map_err(|e| ExportError::InvalidFormat(e.to_string()))?;

    let mut rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }

    Ok(SheetText {
        name: name.clone(),
        rows,
    })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
