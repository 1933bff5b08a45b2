//! FILENAME: app/src/snapshot.rs
// PURPOSE: Loading record snapshots from JSON files.

use anyhow::Context;
use engine::{customers_from_json, lookup_from_json, orders_from_json, Customer, CustomerLookup, Order};
use std::fs;
use std::path::Path;

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn load_orders(path: &Path) -> anyhow::Result<Vec<Order>> {
    let orders = orders_from_json(&read(path)?)
        .with_context(|| format!("decoding orders from {}", path.display()))?;
    log::info!("loaded {} orders from {}", orders.len(), path.display());
    Ok(orders)
}

pub fn load_customers(path: &Path) -> anyhow::Result<Vec<Customer>> {
    let customers = customers_from_json(&read(path)?)
        .with_context(|| format!("decoding customers from {}", path.display()))?;
    log::info!("loaded {} customers from {}", customers.len(), path.display());
    Ok(customers)
}

pub fn load_lookup(path: &Path) -> anyhow::Result<CustomerLookup> {
    lookup_from_json(&read(path)?)
        .with_context(|| format!("decoding customer lookup from {}", path.display()))
}
