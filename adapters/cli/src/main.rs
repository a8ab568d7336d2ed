#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that builds flood fields and plans for ASCII maps.

mod commands;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::{FieldsCommand, SolveCommand};

/// Flood fields and state search for Helirin maps.
#[derive(Parser, Debug)]
#[command(name = "helirin", about = "Helirin route planner", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Build the flood fields and summarise them
    Fields(FieldsCommand),

    /// Plan a route from a start pixel to the ending zone
    Solve(SolveCommand),
}

/// Entry point for the Helirin command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Fields(cmd) => cmd.execute(&mut out),
        Command::Solve(cmd) => cmd.execute(&mut out),
    }
}
