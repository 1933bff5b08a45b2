//! FILENAME: core/persistence/src/export.rs
//! Export orchestration: project records, render each format, write files.
//!
//! The spreadsheet and the document are rendered and written independently.
//! A failure in one format is reported in its outcome and never stops or
//! touches the other.

use crate::output::write_artifact;
use crate::{to_document, to_spreadsheet, Artifact, ArtifactFormat, ExportConfig, ExportError, RecordKind};
use engine::{ColumnSchema, Customer, CustomerLookup, Order, ProjectedRow, RecordProjector};
use std::path::{Path, PathBuf};

/// Result of exporting one format.
#[derive(Debug)]
pub struct ExportOutcome {
    pub format: ArtifactFormat,
    pub result: Result<PathBuf, ExportError>,
}

/// Per-format results of one export call.
#[derive(Debug)]
pub struct ExportReport {
    pub kind: RecordKind,
    pub rows: usize,
    pub outcomes: Vec<ExportOutcome>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn written(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(PathBuf::as_path)
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (ArtifactFormat, &ExportError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.format, e)))
    }
}

pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Projector using the configured currency.
    pub fn projector(&self) -> RecordProjector {
        RecordProjector::new(self.config.currency.clone())
    }

    /// Render one artifact in memory.
    pub fn render(
        &self,
        kind: RecordKind,
        format: ArtifactFormat,
        rows: &[ProjectedRow],
        schema: &ColumnSchema,
    ) -> Result<Artifact, ExportError> {
        let bytes = match format {
            ArtifactFormat::Spreadsheet => to_spreadsheet(rows, schema, kind.sheet_name())?,
            ArtifactFormat::Document => to_document(rows, schema, kind.title(), &self.config.page)?,
        };
        Ok(Artifact {
            file_name: kind.file_name(format),
            format,
            bytes,
        })
    }

    /// Render and write each requested format into the output directory.
    pub fn export_rows(
        &self,
        kind: RecordKind,
        rows: &[ProjectedRow],
        schema: &ColumnSchema,
        formats: &[ArtifactFormat],
    ) -> ExportReport {
        let outcomes = formats
            .iter()
            .map(|&format| {
                let result = self
                    .render(kind, format, rows, schema)
                    .and_then(|artifact| write_artifact(&self.config.output_dir, &artifact));
                if let Err(e) = &result {
                    log::warn!("{} export of {} failed: {}", format, kind.file_stem(), e);
                }
                ExportOutcome { format, result }
            })
            .collect();

        ExportReport {
            kind,
            rows: rows.len(),
            outcomes,
        }
    }

    pub fn export_orders(
        &self,
        orders: &[Order],
        lookup: &CustomerLookup,
        formats: &[ArtifactFormat],
    ) -> ExportReport {
        let rows = self.projector().project_orders(orders, lookup);
        self.export_rows(RecordKind::Orders, &rows, &RecordKind::Orders.schema(), formats)
    }

    pub fn export_customers(&self, customers: &[Customer], formats: &[ArtifactFormat]) -> ExportReport {
        let rows = self.projector().project_customers(customers);
        self.export_rows(RecordKind::Customers, &rows, &RecordKind::Customers.schema(), formats)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}
