//! FILENAME: app/src/cli.rs
// PURPOSE: Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use persistence::ArtifactFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dispatch-export", version, about = "Export orders and customers to XLSX and PDF")]
pub struct Cli {
    /// JSON export config (currency, page setup, output directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output directory, overrides the config
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export orders.xlsx / orders.pdf
    Orders {
        /// JSON array of order documents
        #[arg(long)]
        orders: PathBuf,
        /// JSON object mapping customer id to display name
        #[arg(long)]
        lookup: Option<PathBuf>,
        /// JSON array of customer documents, used to build the lookup
        #[arg(long, conflicts_with = "lookup")]
        customers: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = FormatArg::Both)]
        format: FormatArg,
    },
    /// Export customers.xlsx / customers.pdf
    Customers {
        /// JSON array of customer documents
        #[arg(long)]
        customers: PathBuf,
        #[arg(long, value_enum, default_value_t = FormatArg::Both)]
        format: FormatArg,
    },
    /// Print the detail summary of one order
    Detail {
        /// JSON array of order documents
        #[arg(long)]
        orders: PathBuf,
        /// Order id
        #[arg(long)]
        id: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Xlsx,
    Pdf,
    Both,
}

impl FormatArg {
    pub fn formats(self) -> Vec<ArtifactFormat> {
        match self {
            FormatArg::Xlsx => vec![ArtifactFormat::Spreadsheet],
            FormatArg::Pdf => vec![ArtifactFormat::Document],
            FormatArg::Both => ArtifactFormat::ALL.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_orders_command() {
        let cli = Cli::parse_from([
            "dispatch-export",
            "orders",
            "--orders",
            "orders.json",
            "--lookup",
            "lookup.json",
            "--format",
            "pdf",
            "--out",
            "exports",
        ]);

        assert_eq!(cli.out, Some(PathBuf::from("exports")));
        match cli.command {
            Command::Orders { orders, lookup, customers, format } => {
                assert_eq!(orders, PathBuf::from("orders.json"));
                assert_eq!(lookup, Some(PathBuf::from("lookup.json")));
                assert!(customers.is_none());
                assert_eq!(format.formats(), vec![ArtifactFormat::Document]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_lookup_and_customers_conflict() {
        let result = Cli::try_parse_from([
            "dispatch-export",
            "orders",
            "--orders",
            "o.json",
            "--lookup",
            "l.json",
            "--customers",
            "c.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_format_is_both() {
        let cli = Cli::parse_from(["dispatch-export", "customers", "--customers", "c.json"]);
        match cli.command {
            Command::Customers { format, .. } => assert_eq!(format, FormatArg::Both),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
