//! FILENAME: core/engine/src/detail.rs
//! PURPOSE: Per-order detail summary (delivery agent, location, food lines).
//! CONTEXT: Used by the interactive detail view only; exports never include it.

use crate::number_format::CurrencyFormat;
use crate::projection::name_or_default;
use crate::records::Order;
use serde::Serialize;
use std::fmt;

/// Structured detail text for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailSummary {
    pub delivery_agent: String,
    pub location: String,
    /// One `<foodName> x <quantity> - <price>` line per item, in order.
    pub items: Vec<String>,
}

/// Summarize an order's nested fields. Absent line items give an empty list.
pub fn aggregate(order: &Order, currency: &CurrencyFormat) -> DetailSummary {
    let items = order
        .line_items
        .iter()
        .flatten()
        .map(|item| {
            format!(
                "{} x {} - {}",
                item.food_name,
                item.quantity,
                currency.format(item.food_price)
            )
        })
        .collect();

    DetailSummary {
        delivery_agent: name_or_default(order.delivery_guy.as_ref()).to_string(),
        location: name_or_default(order.location.as_ref()).to_string(),
        items,
    }
}

impl fmt::Display for DetailSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Delivery Guy: {}", self.delivery_agent)?;
        writeln!(f, "Location: {}", self.location)?;
        write!(f, "Orders:")?;
        for item in &self.items {
            write!(f, "\n  - {}", item)?;
        }
        Ok(())
    }
}
