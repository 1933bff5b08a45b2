//! FILENAME: core/engine/src/records.rs
//! PURPOSE: Raw order and customer records as supplied by the data collaborator.
//! CONTEXT: Records arrive as loosely-structured JSON documents (Firestore-style
//! `{ id, ...data }` objects). Every optional or inconsistently-typed field is
//! accepted here and normalized later by the projection layer, so decoding a
//! record never fails because a nested field is missing, null, or mistyped.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// ORDER
// ============================================================================

/// A raw order record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    /// Custom "25 July 2024 at 15:30:00 UTC+00:00" encoding or an ISO-like string.
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub order_time: Option<String>,
    #[serde(default)]
    pub order_type: OrderType,
    /// Stored total. Never reconciled against the line items.
    #[serde(default = "not_a_number", deserialize_with = "lenient_decimal")]
    pub total_price: f64,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub delivery_guy: Option<NamedRef>,
    #[serde(default)]
    pub location: Option<NamedRef>,
    #[serde(default, rename = "orders", deserialize_with = "lenient_line_items")]
    pub line_items: Option<Vec<LineItem>>,
}

impl Default for Order {
    /// A record with no fields set. The price is NaN, as for a decoded
    /// document without `totalPrice`.
    fn default() -> Self {
        Self {
            id: String::new(),
            order_time: None,
            order_type: OrderType::default(),
            total_price: f64::NAN,
            client_id: None,
            delivery_guy: None,
            location: None,
            line_items: None,
        }
    }
}

impl Order {
    /// Sum of `quantity * foodPrice` over the line items.
    /// Informational only; projections always use `total_price`.
    pub fn line_items_total(&self) -> f64 {
        self.line_items
            .iter()
            .flatten()
            .map(|item| item.quantity as f64 * item.food_price)
            .sum()
    }
}

/// The kind of order. Unknown values are kept verbatim; `null` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum OrderType {
    Delivery,
    Pickup,
    Other(String),
}

impl Default for OrderType {
    fn default() -> Self {
        OrderType::Other(String::new())
    }
}

impl From<String> for OrderType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Delivery" => OrderType::Delivery,
            "Pickup" => OrderType::Pickup,
            _ => OrderType::Other(value),
        }
    }
}

impl From<Option<String>> for OrderType {
    fn from(value: Option<String>) -> Self {
        value.map(OrderType::from).unwrap_or_default()
    }
}

impl From<OrderType> for String {
    fn from(value: OrderType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Delivery => f.write_str("Delivery"),
            OrderType::Pickup => f.write_str("Pickup"),
            OrderType::Other(s) => f.write_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for OrderType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(OrderType::from(scalar_text(&value)))
    }
}

/// A nested `{ name }` object (delivery agent, location).
///
/// A bare string is taken as the name; any other shape has no name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NamedRef {
    pub name: Option<String>,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl<'de> Deserialize<'de> for NamedRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = match Value::deserialize(deserializer)? {
            Value::Object(fields) => fields.get("name").and_then(scalar_text),
            Value::String(name) => Some(name),
            _ => None,
        };
        Ok(NamedRef { name })
    }
}

/// One food line inside an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub food_name: String,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(default = "not_a_number", deserialize_with = "lenient_decimal")]
    pub food_price: f64,
}

impl LineItem {
    pub fn new(food_name: impl Into<String>, quantity: u32, food_price: f64) -> Self {
        Self {
            food_name: food_name.into(),
            quantity,
            food_price,
        }
    }
}

// ============================================================================
// CUSTOMER
// ============================================================================

/// A raw customer record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    /// Phone number.
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default)]
    pub status: CustomerStatus,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub image_url: Option<String>,
}

/// Canonical customer status.
///
/// Stored documents use either a boolean or a string such as `"active"`.
/// Both are folded into this tri-state on decode:
/// - `true` / `"active"` -> `Active`
/// - `false` / `"inactive"` -> `Inactive`
/// - anything else (including a missing field) -> `Unknown`
///
/// Strings are compared case-insensitively after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
    #[default]
    Unknown,
}

impl CustomerStatus {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Bool(true) => CustomerStatus::Active,
            Value::Bool(false) => CustomerStatus::Inactive,
            Value::String(s) => Self::from_label(s),
            _ => CustomerStatus::Unknown,
        }
    }

    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("active") {
            CustomerStatus::Active
        } else if label.eq_ignore_ascii_case("inactive") {
            CustomerStatus::Inactive
        } else {
            CustomerStatus::Unknown
        }
    }

    pub fn is_active(self) -> bool {
        self == CustomerStatus::Active
    }

    /// Status after the activate/deactivate action.
    pub fn toggled(self) -> Self {
        match self {
            CustomerStatus::Active => CustomerStatus::Inactive,
            CustomerStatus::Inactive | CustomerStatus::Unknown => CustomerStatus::Active,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CustomerStatus::Active => "Active",
            CustomerStatus::Inactive => "Inactive",
            CustomerStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CustomerStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(CustomerStatus::from_json(&value))
    }
}

// ============================================================================
// CUSTOMER LOOKUP
// ============================================================================

/// Customer id -> display name, used to resolve `Order::client_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CustomerLookup(HashMap<String, String>);

impl CustomerLookup {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.0.insert(id.into(), name.into());
    }

    /// Display name for `id`. Absent ids, unmapped ids, and empty names all
    /// resolve to `None`.
    pub fn resolve(&self, id: Option<&str>) -> Option<&str> {
        id.and_then(|id| self.0.get(id))
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for CustomerLookup {
    /// Non-text names (null, numbers) are stored as their text or as empty.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = HashMap::<String, Value>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|(id, name)| (id, scalar_text(&name).unwrap_or_default()))
            .collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CustomerLookup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        )
    }
}

impl From<&[Customer]> for CustomerLookup {
    /// Build the narrow lookup view from full customer records.
    fn from(customers: &[Customer]) -> Self {
        customers
            .iter()
            .map(|c| (c.id.clone(), format!("{} {}", c.first_name, c.last_name)))
            .collect()
    }
}

// ============================================================================
// JSON SNAPSHOTS
// ============================================================================

/// Decode a JSON array of order documents. One record per array element.
pub fn orders_from_json(json: &str) -> Result<Vec<Order>, RecordError> {
    records_from_json(json, "order")
}

/// Decode a JSON array of customer documents. One record per array element.
pub fn customers_from_json(json: &str) -> Result<Vec<Customer>, RecordError> {
    records_from_json(json, "customer")
}

pub fn lookup_from_json(json: &str) -> Result<CustomerLookup, RecordError> {
    Ok(serde_json::from_str(json)?)
}

/// Only a snapshot that is not a JSON array is an error. An element that is
/// not an object still yields a record, with every field at its default.
fn records_from_json<T>(json: &str, kind: &str) -> Result<Vec<T>, RecordError>
where
    T: DeserializeOwned + Default,
{
    let documents: Vec<Value> = serde_json::from_str(json)?;
    Ok(documents
        .into_iter()
        .enumerate()
        .map(|(index, document)| {
            serde_json::from_value(document).unwrap_or_else(|e| {
                warn!("{} {} is not a document ({}); using an empty record", kind, index, e);
                T::default()
            })
        })
        .collect())
}

// ============================================================================
// LENIENT FIELD DECODING
// ============================================================================

fn not_a_number() -> f64 {
    f64::NAN
}

/// Text form of a scalar: strings as-is, numbers and booleans as written.
/// Null, arrays and objects have none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

/// Accepts a JSON number or a numeric string. Anything else becomes NaN so
/// the record still decodes and the price renders as "NaN".
fn lenient_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

/// Whole non-negative numbers, as JSON numbers or numeric strings. Anything
/// else counts as zero.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32)
        .unwrap_or(0))
}

/// A non-array `orders` field counts as absent. Elements that are not
/// objects are skipped.
fn lenient_line_items<'de, D>(deserializer: D) -> Result<Option<Vec<LineItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(elements) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let items = elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value::<LineItem>(element) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("skipping malformed line item: {}", e);
                None
            }
        })
        .collect();
    Ok(Some(items))
}
