//! # Command Line

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use warehub_core::AdjustOperation;

#[derive(Debug, Parser)]
#[command(name = "warehub-console", version, about = "Warehub operator console")]
pub struct Cli {
    /// Config file (default: platform config dir, console.toml)
    #[arg(long, global = true, env = "WAREHUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file; overrides the config file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read a barcode from the scanner and resolve it
    Scan(ScanArgs),

    /// Resolve a SKU or barcode text without scanning
    Lookup {
        /// SKU or barcode text
        payload: String,
    },

    /// Change the quantity of an item by SKU or barcode text
    Adjust {
        /// SKU or barcode text
        payload: String,

        #[command(flatten)]
        delta: RequiredDelta,
    },

    /// Create an inventory item
    Create {
        #[arg(long)]
        name: String,

        /// Vendor barcode text printed on the item
        #[arg(long)]
        barcode: Option<String>,

        /// Explicit SKU; generated from the configured prefix when omitted
        #[arg(long)]
        sku: Option<String>,

        #[arg(long, default_value_t = 0)]
        quantity: u32,
    },

    /// List inventory items
    List {
        /// Filter by name, SKU or barcode text
        #[arg(long, short)]
        query: Option<String>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub delta: OptionalDelta,

    /// Keep scanning until a scan is cancelled
    #[arg(long)]
    pub repeat: bool,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct RequiredDelta {
    /// Units to add
    #[arg(long)]
    pub add: Option<u32>,

    /// Units to subtract (stops at zero)
    #[arg(long)]
    pub subtract: Option<u32>,
}

#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct OptionalDelta {
    /// Units to add to the scanned item
    #[arg(long)]
    pub add: Option<u32>,

    /// Units to subtract from the scanned item
    #[arg(long)]
    pub subtract: Option<u32>,
}

fn delta(add: Option<u32>, subtract: Option<u32>) -> Option<(AdjustOperation, u32)> {
    match (add, subtract) {
        (Some(n), _) => Some((AdjustOperation::Add, n)),
        (None, Some(n)) => Some((AdjustOperation::Subtract, n)),
        (None, None) => None,
    }
}

impl RequiredDelta {
    pub fn get(&self) -> Option<(AdjustOperation, u32)> {
        delta(self.add, self.subtract)
    }
}

impl OptionalDelta {
    pub fn get(&self) -> Option<(AdjustOperation, u32)> {
        delta(self.add, self.subtract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_adjust_requires_exactly_one_direction() {
        let cli = Cli::try_parse_from(["warehub-console", "adjust", "WHW-00001", "--subtract", "5"])
            .unwrap();
        match cli.command {
            Command::Adjust { payload, delta } => {
                assert_eq!(payload, "WHW-00001");
                assert_eq!(delta.get(), Some((AdjustOperation::Subtract, 5)));
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["warehub-console", "adjust", "WHW-00001"]).is_err());
        assert!(Cli::try_parse_from([
            "warehub-console",
            "adjust",
            "WHW-00001",
            "--add",
            "1",
            "--subtract",
            "1"
        ])
        .is_err());
    }

    #[test]
    fn test_scan_delta_is_optional() {
        let cli = Cli::try_parse_from(["warehub-console", "--json", "scan", "--repeat"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Scan(args) => {
                assert!(args.repeat);
                assert_eq!(args.delta.get(), None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
