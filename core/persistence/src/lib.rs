//! FILENAME: core/persistence/src/lib.rs
//! Dispatch Persistence Module
//!
//! Turns projected rows into the two export artifacts: a single-sheet XLSX
//! workbook and a paginated PDF table. Both are built from the same cell
//! matrix, so their cell text matches column for column.

mod config;
mod error;
mod export;
mod output;
mod pdf_text;
mod pdf_writer;
pub mod table_layout;
mod xlsx_reader;
mod xlsx_writer;

pub use config::{ExportConfig, PageSetup, A4_HEIGHT, A4_WIDTH};
pub use error::ExportError;
pub use export::{ExportOutcome, ExportReport, Exporter};
pub use output::write_artifact;
pub use table_layout::{layout_table, TableLayout};
pub use xlsx_reader::{read_sheet_text, SheetText};

use engine::{ColumnSchema, ProjectedRow};
use std::fmt;

// ============================================================================
// RECORD KINDS AND FORMATS
// ============================================================================

/// The exported record types. Each has fixed file names, title and sheet name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Orders,
    Customers,
}

impl RecordKind {
    pub fn file_stem(self) -> &'static str {
        match self {
            RecordKind::Orders => "orders",
            RecordKind::Customers => "customers",
        }
    }

    /// Title line of the printable document.
    pub fn title(self) -> &'static str {
        match self {
            RecordKind::Orders => "All Orders",
            RecordKind::Customers => "All Customers",
        }
    }

    pub fn sheet_name(self) -> &'static str {
        match self {
            RecordKind::Orders => "Orders",
            RecordKind::Customers => "Customers",
        }
    }

    /// Default column schema, shared by both formats.
    pub fn schema(self) -> ColumnSchema {
        match self {
            RecordKind::Orders => ColumnSchema::orders(),
            RecordKind::Customers => ColumnSchema::customers(),
        }
    }

    /// e.g. `orders.xlsx`
    pub fn file_name(self, format: ArtifactFormat) -> String {
        format!("{}.{}", self.file_stem(), format.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactFormat {
    /// XLSX workbook.
    Spreadsheet,
    /// PDF table.
    Document,
}

impl ArtifactFormat {
    pub const ALL: [ArtifactFormat; 2] = [ArtifactFormat::Spreadsheet, ArtifactFormat::Document];

    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Spreadsheet => "xlsx",
            ArtifactFormat::Document => "pdf",
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A generated export file, held in memory until written.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub format: ArtifactFormat,
    pub bytes: Vec<u8>,
}

// ============================================================================
// SERIALIZATION
// ============================================================================

/// Cell text of `rows` in schema order.
///
/// Fails with `UnknownColumn` if any row lacks a schema key, before anything
/// is rendered.
pub fn cell_matrix<'r>(
    rows: &'r [ProjectedRow],
    schema: &ColumnSchema,
) -> Result<Vec<Vec<&'r str>>, ExportError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            schema.values(row).ok_or_else(|| ExportError::UnknownColumn {
                key: schema.missing_key(row).unwrap_or_default().to_string(),
                row: index,
            })
        })
        .collect()
}

/// XLSX bytes for `rows`: header row plus one text row per record.
pub fn to_spreadsheet(
    rows: &[ProjectedRow],
    schema: &ColumnSchema,
    sheet_name: &str,
) -> Result<Vec<u8>, ExportError> {
    let body = cell_matrix(rows, schema)?;
    xlsx_writer::write_spreadsheet(sheet_name, &schema.headers(), &body)
}

/// Page layout the PDF for `rows` is drawn from.
pub fn document_layout(
    rows: &[ProjectedRow],
    schema: &ColumnSchema,
    title: &str,
    page: &PageSetup,
) -> Result<TableLayout, ExportError> {
    page.validate()?;
    let body = cell_matrix(rows, schema)?;
    Ok(layout_table(title, &schema.headers(), &body, page))
}

/// PDF bytes for `rows`: title line and a ruled, paginated table.
pub fn to_document(
    rows: &[ProjectedRow],
    schema: &ColumnSchema,
    title: &str,
    page: &PageSetup,
) -> Result<Vec<u8>, ExportError> {
    let layout = document_layout(rows, schema, title, page)?;
    pdf_writer::write_document(&layout, page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_file_names() {
        assert_eq!(RecordKind::Orders.file_name(ArtifactFormat::Spreadsheet), "orders.xlsx");
        assert_eq!(RecordKind::Orders.file_name(ArtifactFormat::Document), "orders.pdf");
        assert_eq!(RecordKind::Customers.file_name(ArtifactFormat::Spreadsheet), "customers.xlsx");
        assert_eq!(RecordKind::Customers.file_name(ArtifactFormat::Document), "customers.pdf");
    }

    #[test]
    fn test_cell_matrix_reports_unknown_column() {
        let rows = vec![
            ProjectedRow::new().with("a", "1").with("b", "2"),
            ProjectedRow::new().with("a", "3"),
        ];
        let schema = ColumnSchema::from_pairs(&[("A", "a"), ("B", "b")]);

        match cell_matrix(&rows, &schema) {
            Err(ExportError::UnknownColumn { key, row }) => {
                assert_eq!(key, "b");
                assert_eq!(row, 1);
            }
            other => panic!("expected UnknownColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_column_fails_both_formats() {
        let rows = vec![ProjectedRow::new().with("a", "1")];
        let schema = ColumnSchema::from_pairs(&[("Z", "z")]);

        assert!(to_spreadsheet(&rows, &schema, "Orders").is_err());
        assert!(to_document(&rows, &schema, "All Orders", &PageSetup::default()).is_err());
    }

    #[test]
    fn test_schema_reorders_columns() {
        let rows = vec![ProjectedRow::new().with("a", "1").with("b", "2")];
        let schema = ColumnSchema::from_pairs(&[("B", "b"), ("A", "a")]);

        let sheet = read_sheet_text(&to_spreadsheet(&rows, &schema, "Sheet").unwrap()).unwrap();
        assert_eq!(sheet.rows, vec![vec!["B", "A"], vec!["2", "1"]]);

        let layout = document_layout(&rows, &schema, "T", &PageSetup::default()).unwrap();
        assert_eq!(layout.header_text(), vec!["B", "A"]);
        assert_eq!(layout.record_text(), vec![vec!["2", "1"]]);
    }
}
