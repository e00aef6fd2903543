mod config;

use anyhow::{Context, Result};
use balance_engine::{
    engine::OverdrawPolicy,
    process_feed,
    transaction::{BalanceSnapshot, Transaction},
};
use clap::Parser;
use config::{CliConfig, Config};
use std::fs::File;
use std::io::{self, Write};
use tracing::{info, warn};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = CliConfig::parse();

    run(&config)?;

    info!("Processing completed successfully");

    Ok(())
}

fn run<C: Config>(config: &C) -> Result<()> {
    let transactions = read_transactions(config)?;

    let policy = if config.strict() {
        OverdrawPolicy::Strict
    } else {
        OverdrawPolicy::Absorb
    };

    let snapshots =
        process_feed(transactions, policy).context("Realized balance computation failed")?;

    info!("Computed {} balance snapshots", snapshots.len());

    // Writing is independent of computation: a sink failure surfaces here
    // with the snapshots already fully materialized.
    match config.output_path() {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            write_snapshots(file, &snapshots)?;
        }
        None => {
            let stdout = io::stdout();
            write_snapshots(stdout.lock(), &snapshots)?;
        }
    }

    Ok(())
}

fn read_transactions<C: Config>(config: &C) -> Result<Vec<Transaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(config.input_path())
        .context("Failed to open input file")?;

    let mut transactions = Vec::new();
    let mut skipped = 0;

    for result in reader.deserialize() {
        match result {
            Ok(tx) => transactions.push(tx),
            Err(e) => {
                warn!("Failed to parse transfer row: {e}");
                skipped += 1;
            }
        }
    }

    info!(
        "Read {} transfers, skipped {skipped} invalid rows",
        transactions.len()
    );

    Ok(transactions)
}

fn write_snapshots<W: Write>(writer: W, snapshots: &[BalanceSnapshot]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);

    for snapshot in snapshots {
        writer
            .serialize(snapshot)
            .context("Failed to serialize balance snapshot")?;
    }

    writer.flush().context("Failed to flush output")?;

    Ok(())
}
