//! FILENAME: core/engine/src/number_format.rs
//! PURPOSE: Monetary display formatting for projected rows and detail summaries.
//! CONTEXT: Prices are shown as a fixed prefix symbol followed by a fixed number
//! of decimals, with no grouping and no locale rules. Values that are not
//! finite are not rejected; they render as `NaN` / `Infinity` after the symbol.

use serde::{Deserialize, Serialize};

/// Ghanaian cedi sign followed by a space, as printed on the order views.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "GH₵ ";

/// Prefix-symbol currency format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    /// Printed verbatim before the amount (include any separating space).
    pub symbol: String,
    pub decimal_places: u8,
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            decimal_places: 2,
        }
    }

    /// Format a value as currency.
    pub fn format(&self, value: f64) -> String {
        format!("{}{}", self.symbol, format_fixed(value, self.decimal_places))
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_SYMBOL)
    }
}

/// Fixed-point rendering with no thousands separator.
pub fn format_fixed(value: f64, decimal_places: u8) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // -0.0 would otherwise print as "-0.00"
    let value = if value == 0.0 { 0.0 } else { value };
    let formatted = format!("{:.prec$}", value, prec = decimal_places as usize);

    // Tiny negatives round to zero
    match formatted.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => formatted,
    }
}
