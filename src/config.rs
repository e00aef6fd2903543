use clap::Parser;
use std::path::{Path, PathBuf};

/// Trait for reading configuration parameters
pub trait Config {
    fn input_path(&self) -> &Path;
    fn output_path(&self) -> Option<&Path>;
    fn strict(&self) -> bool;
}

/// CLI configuration
#[derive(Parser, Debug)]
#[command(
    name = "realized-cap",
    about = "Computes per-address realized balances from a CSV of signed token transfers",
    version
)]
pub struct CliConfig {
    /// Path to the input CSV file containing transfers
    /// (columns: address, timestamp, amount, price)
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Write snapshot rows to this file instead of stdout
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<PathBuf>,

    /// Fail when a disposal exceeds the address's total holdings
    /// instead of silently emptying the ledger
    #[arg(long)]
    strict: bool,
}

impl Config for CliConfig {
    fn input_path(&self) -> &Path {
        &self.input_file
    }

    fn output_path(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    fn strict(&self) -> bool {
        self.strict
    }
}
