//! FILENAME: app/src/lib.rs
// PURPOSE: Command-line front end for the export pipeline.
// CONTEXT: Plays the data-supply role: reads record snapshots from JSON files,
// hands them to the exporter and reports each artifact.

pub mod cli;
pub mod logging;
pub mod snapshot;

use anyhow::{anyhow, Context};
use cli::{Cli, Command};
use engine::{aggregate_detail, CustomerLookup};
use persistence::{ExportConfig, ExportReport, Exporter};

/// Run one command. Returns `Ok(false)` when an export format failed while
/// the others were written.
pub fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => ExportConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ExportConfig::default(),
    };
    if let Some(out) = cli.out {
        config.output_dir = out;
    }
    let exporter = Exporter::new(config);

    match cli.command {
        Command::Orders {
            orders,
            lookup,
            customers,
            format,
        } => {
            let orders = snapshot::load_orders(&orders)?;
            let lookup = match (lookup, customers) {
                (Some(path), _) => snapshot::load_lookup(&path)?,
                (None, Some(path)) => CustomerLookup::from(snapshot::load_customers(&path)?.as_slice()),
                (None, None) => {
                    log::warn!("no customer lookup given; every customer name will be Unknown");
                    CustomerLookup::new()
                }
            };
            let report = exporter.export_orders(&orders, &lookup, &format.formats());
            Ok(summarize(&report))
        }
        Command::Customers { customers, format } => {
            let customers = snapshot::load_customers(&customers)?;
            let report = exporter.export_customers(&customers, &format.formats());
            Ok(summarize(&report))
        }
        Command::Detail { orders, id } => {
            let orders = snapshot::load_orders(&orders)?;
            let order = orders
                .iter()
                .find(|o| o.id == id)
                .ok_or_else(|| anyhow!("no order with id {:?}", id))?;
            println!("{}", aggregate_detail(order, &exporter.config().currency));
            Ok(true)
        }
    }
}

fn summarize(report: &ExportReport) -> bool {
    for path in report.written() {
        println!("{}", path.display());
    }
    for (format, error) in report.failures() {
        log::error!("{} {} export failed: {}", report.kind.file_stem(), format, error);
    }
    log::info!("exported {} {}", report.rows, report.kind.file_stem());
    report.is_success()
}
