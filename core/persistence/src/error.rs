//! FILENAME: core/persistence/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Column '{key}' is not present in row {row}")]
    UnknownColumn { key: String, row: usize },

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Invalid export config: {0}")]
    Config(#[from] serde_json::Error),
}
