//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the record engine.
//! CONTEXT: Raw order/customer records go in, display-ready rows come out.
//! Re-exports public types and modules for use by other crates.

pub mod date_format;
pub mod detail;
pub mod number_format;
pub mod projection;
pub mod records;

// Re-export commonly used types at the crate root
pub use date_format::{month_index, normalize as normalize_timestamp, Timestamp, MONTH_NAMES};
pub use detail::{aggregate as aggregate_detail, DetailSummary};
pub use number_format::{format_fixed, CurrencyFormat, DEFAULT_CURRENCY_SYMBOL};
pub use projection::{
    name_or_default, ColumnSchema, ColumnSpec, ProjectedRow, RecordProjector, NOT_AVAILABLE,
    UNKNOWN_CUSTOMER,
};
pub use records::{
    customers_from_json, lookup_from_json, orders_from_json, Customer, CustomerLookup,
    CustomerStatus, LineItem, NamedRef, Order, OrderType, RecordError,
};
