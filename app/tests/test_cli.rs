//! FILENAME: tests/test_cli.rs
//! End-to-end runs of the export commands against JSON snapshots.

use app_lib::cli::Cli;
use app_lib::run;
use clap::Parser;
use persistence::read_sheet_text;
use std::fs;
use std::path::Path;

const ORDERS: &str = r#"[
    {
        "id": "1",
        "orderTime": "25 July 2024 at 15:30:00 UTC+00:00",
        "orderType": "Delivery",
        "totalPrice": 25.5,
        "clientId": "c1",
        "deliveryGuy": { "name": "John Doe" },
        "location": { "name": "123 Elm Street" },
        "orders": [
            { "foodName": "Pizza", "quantity": 1, "foodPrice": 15.0 },
            { "foodName": "Soda", "quantity": 2, "foodPrice": 5.0 }
        ]
    },
    {
        "id": "2",
        "orderTime": "\"25 July 2024 at 16:00:00 UTC+00:00\"",
        "orderType": "Pickup",
        "totalPrice": 18.75,
        "clientId": "c2"
    }
]"#;

const CUSTOMERS: &str = r#"[
    { "id": "c1", "firstName": "Alice", "lastName": "Johnson", "address": "1 Ring Road",
      "contact": "0240000001", "location": "Accra", "status": true },
    { "id": "c2", "firstName": "Bob", "lastName": "Brown", "address": "2 Ring Road",
      "contact": "0240000002", "location": "Kumasi", "status": "active" }
]"#;

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_orders_command_writes_both_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let orders = write(dir.path(), "orders.json", ORDERS);
    let lookup = write(dir.path(), "lookup.json", r#"{ "c1": "Alice Johnson" }"#);
    let out = dir.path().join("out");

    let cli = Cli::parse_from([
        "dispatch-export",
        "orders",
        "--orders",
        &orders,
        "--lookup",
        &lookup,
        "--out",
        out.to_str().unwrap(),
    ]);
    assert!(run(cli).unwrap());

    assert!(out.join("orders.pdf").exists());
    let sheet = read_sheet_text(&fs::read(out.join("orders.xlsx")).unwrap()).unwrap();
    assert_eq!(sheet.rows.len(), 3);
    assert_eq!(sheet.rows[1][0], "July 25, 2024, 3:30:00 PM UTC+00:00");
    assert_eq!(sheet.rows[2][0], "July 25, 2024, 4:00:00 PM UTC+00:00");
    assert_eq!(sheet.rows[2][3], "Unknown");
    assert_eq!(sheet.rows[2][4], "N/A");
}

#[test]
fn test_orders_lookup_from_customer_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let orders = write(dir.path(), "orders.json", ORDERS);
    let customers = write(dir.path(), "customers.json", CUSTOMERS);

    let cli = Cli::parse_from([
        "dispatch-export",
        "orders",
        "--orders",
        &orders,
        "--customers",
        &customers,
        "--format",
        "xlsx",
        "--out",
        dir.path().to_str().unwrap(),
    ]);
    assert!(run(cli).unwrap());

    let sheet = read_sheet_text(&fs::read(dir.path().join("orders.xlsx")).unwrap()).unwrap();
    assert_eq!(sheet.rows[1][3], "Alice Johnson");
    assert_eq!(sheet.rows[2][3], "Bob Brown");
    assert!(!dir.path().join("orders.pdf").exists());
}

#[test]
fn test_customers_command_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let customers = write(dir.path(), "customers.json", CUSTOMERS);
    let out = dir.path().join("exports");
    let config = write(
        dir.path(),
        "config.json",
        &format!(r#"{{ "outputDir": {:?} }}"#, out.to_str().unwrap()),
    );

    let cli = Cli::parse_from(["dispatch-export", "customers", "--customers", &customers, "--config", &config]);
    assert!(run(cli).unwrap());

    let sheet = read_sheet_text(&fs::read(out.join("customers.xlsx")).unwrap()).unwrap();
    assert_eq!(sheet.name, "Customers");
    assert_eq!(sheet.rows[0], vec!["Name", "Address", "Phone", "Location", "Status"]);
    assert_eq!(sheet.rows[1], vec!["Alice Johnson", "1 Ring Road", "0240000001", "Accra", "Active"]);
    assert_eq!(sheet.rows[2][4], "Active");
    assert!(out.join("customers.pdf").exists());
}

#[test]
fn test_failed_format_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let customers = write(dir.path(), "customers.json", CUSTOMERS);
    let config = write(dir.path(), "config.json", r#"{ "page": { "height": 40.0 } }"#);

    let cli = Cli::parse_from([
        "dispatch-export",
        "customers",
        "--customers",
        &customers,
        "--config",
        &config,
        "--out",
        dir.path().to_str().unwrap(),
    ]);
    assert!(!run(cli).unwrap());
    assert!(dir.path().join("customers.xlsx").exists());
    assert!(!dir.path().join("customers.pdf").exists());
}

#[test]
fn test_detail_command() {
    let dir = tempfile::tempdir().unwrap();
    let orders = write(dir.path(), "orders.json", ORDERS);

    let cli = Cli::parse_from(["dispatch-export", "detail", "--orders", &orders, "--id", "1"]);
    assert!(run(cli).unwrap());

    let cli = Cli::parse_from(["dispatch-export", "detail", "--orders", &orders, "--id", "99"]);
    assert!(run(cli).is_err());
}

#[test]
fn test_missing_snapshot_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");

    let cli = Cli::parse_from(["dispatch-export", "customers", "--customers", missing.to_str().unwrap()]);
    let err = run(cli).unwrap_err();
    assert!(format!("{:#}", err).contains("nope.json"));
}
