//! FILENAME: core/persistence/src/config.rs
//! Export configuration: currency, page geometry, output directory.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides, e.g. `{ "currency": { "symbol": "¤" }, "outputDir": "out" }`.

use crate::ExportError;
use engine::CurrencyFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A4 portrait, in PDF points.
pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    pub currency: CurrencyFormat,
    pub page: PageSetup,
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyFormat::default(),
            page: PageSetup::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExportConfig {
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Page geometry and typography for the printable document. Units are points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Distance from the top edge to the title baseline.
    pub title_top: f32,
    pub title_font_size: f32,
    pub body_font_size: f32,
    /// Inner padding of each table cell.
    pub cell_padding: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            margin: 40.0,
            title_top: 28.35,
            title_font_size: 16.0,
            body_font_size: 9.0,
            cell_padding: 4.0,
        }
    }
}

impl PageSetup {
    pub fn content_width(&self) -> f32 {
        (self.width - 2.0 * self.margin).max(0.0)
    }

    pub fn line_height(&self) -> f32 {
        self.body_font_size * 1.2
    }

    /// Top of the table on the first page, below the title.
    pub fn first_table_top(&self) -> f32 {
        (self.title_top + self.title_font_size * 0.6).max(self.margin)
    }

    pub fn table_bottom(&self) -> f32 {
        self.height - self.margin
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if self.content_width() <= 2.0 * self.cell_padding {
            return Err(ExportError::InvalidFormat(format!(
                "page width {} leaves no room for a table with margin {}",
                self.width, self.margin
            )));
        }
        if self.body_font_size <= 0.0 || self.title_font_size <= 0.0 {
            return Err(ExportError::InvalidFormat("font sizes must be positive".to_string()));
        }
        if self.first_table_top() >= self.table_bottom() {
            return Err(ExportError::InvalidFormat(format!(
                "page height {} leaves no room for a table",
                self.height
            )));
        }
        Ok(())
    }
}
