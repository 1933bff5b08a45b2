//! FILENAME: core/engine/src/projection.rs
//! PURPOSE: Projection of raw records into flat, display-ready rows.
//! CONTEXT: A projected row is the single source for both export formats. Every
//! record yields exactly one row and every column is always present: missing
//! references and nested fields resolve to fixed default literals.

use crate::date_format;
use crate::number_format::CurrencyFormat;
use crate::records::{Customer, CustomerLookup, NamedRef, Order};
use log::debug;
use serde::{Deserialize, Serialize};

// ============================================================================
// COLUMN KEYS AND DEFAULTS
// ============================================================================

pub const ORDER_TIME: &str = "OrderTime";
pub const ORDER_TYPE: &str = "OrderType";
pub const TOTAL_PRICE: &str = "TotalPrice";
pub const CUSTOMER_NAME: &str = "CustomerName";
pub const DELIVERY_GUY_NAME: &str = "DeliveryGuyName";

pub const FULL_NAME: &str = "FullName";
pub const ADDRESS: &str = "Address";
pub const PHONE: &str = "Phone";
pub const LOCATION: &str = "Location";
pub const STATUS: &str = "Status";

/// Shown when an order's client id is absent or not in the lookup.
pub const UNKNOWN_CUSTOMER: &str = "Unknown";
/// Shown when a nested `{ name }` object or its name is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// Name of a nested reference, or `N/A`.
pub fn name_or_default(reference: Option<&NamedRef>) -> &str {
    reference
        .and_then(|r| r.name.as_deref())
        .filter(|name| !name.is_empty())
        .unwrap_or(NOT_AVAILABLE)
}

// ============================================================================
// PROJECTED ROW
// ============================================================================

/// Ordered column key -> display string mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedRow {
    fields: Vec<(String, String)>,
}

impl ProjectedRow {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Set a field. Replaces the value if the key exists, keeping its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ============================================================================
// COLUMN SCHEMA
// ============================================================================

/// One exported column: header label plus the row field it reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub header: String,
    pub key: String,
}

impl ColumnSpec {
    pub fn new(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            key: key.into(),
        }
    }
}

/// Ordered list of exported columns. Both artifacts follow this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSchema {
    columns: Vec<ColumnSpec>,
}

impl ColumnSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(header, key)| ColumnSpec::new(*header, *key))
                .collect(),
        )
    }

    pub fn orders() -> Self {
        Self::from_pairs(&[
            ("Order Time", ORDER_TIME),
            ("Order Type", ORDER_TYPE),
            ("Total Price", TOTAL_PRICE),
            ("Customer Name", CUSTOMER_NAME),
            ("Delivery Guy Name", DELIVERY_GUY_NAME),
        ])
    }

    pub fn customers() -> Self {
        Self::from_pairs(&[
            ("Name", FULL_NAME),
            ("Address", ADDRESS),
            ("Phone", PHONE),
            ("Location", LOCATION),
            ("Status", STATUS),
        ])
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// First schema key that `row` does not carry.
    pub fn missing_key(&self, row: &ProjectedRow) -> Option<&str> {
        self.columns
            .iter()
            .map(|c| c.key.as_str())
            .find(|key| row.get(key).is_none())
    }

    /// Cell values of `row` in schema order, or `None` if a key is missing.
    pub fn values<'r>(&self, row: &'r ProjectedRow) -> Option<Vec<&'r str>> {
        self.columns.iter().map(|c| row.get(&c.key)).collect()
    }
}

// ============================================================================
// PROJECTOR
// ============================================================================

/// Maps raw records to projected rows.
#[derive(Debug, Clone, Default)]
pub struct RecordProjector {
    currency: CurrencyFormat,
}

impl RecordProjector {
    pub fn new(currency: CurrencyFormat) -> Self {
        Self { currency }
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.currency
    }

    pub fn project_order(&self, order: &Order, lookup: &CustomerLookup) -> ProjectedRow {
        let order_time = order
            .order_time
            .as_deref()
            .map(date_format::normalize)
            .unwrap_or_default();
        let customer_name = lookup
            .resolve(order.client_id.as_deref())
            .unwrap_or(UNKNOWN_CUSTOMER);

        ProjectedRow::new()
            .with(ORDER_TIME, order_time)
            .with(ORDER_TYPE, order.order_type.to_string())
            .with(TOTAL_PRICE, self.currency.format(order.total_price))
            .with(CUSTOMER_NAME, customer_name)
            .with(DELIVERY_GUY_NAME, name_or_default(order.delivery_guy.as_ref()))
    }

    pub fn project_customer(&self, customer: &Customer) -> ProjectedRow {
        ProjectedRow::new()
            .with(FULL_NAME, format!("{} {}", customer.first_name, customer.last_name))
            .with(ADDRESS, customer.address.as_str())
            .with(PHONE, customer.contact.as_str())
            .with(LOCATION, customer.location.as_str())
            .with(STATUS, customer.status.label())
    }

    pub fn project_orders(&self, orders: &[Order], lookup: &CustomerLookup) -> Vec<ProjectedRow> {
        debug!("projecting {} orders against {} customers", orders.len(), lookup.len());
        orders
            .iter()
            .map(|order| self.project_order(order, lookup))
            .collect()
    }

    pub fn project_customers(&self, customers: &[Customer]) -> Vec<ProjectedRow> {
        debug!("projecting {} customers", customers.len());
        customers
            .iter()
            .map(|customer| self.project_customer(customer))
            .collect()
    }
}
