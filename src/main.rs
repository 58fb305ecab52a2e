//! Numgrad CLI - static semantic checker for Numgrad programs

use clap::Parser;
use numgrad::cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> miette::Result<ExitCode> {
    // NUMGRAD_LOG takes the usual filter syntax, e.g. "numgrad=debug"
    let filter = EnvFilter::try_from_env("NUMGRAD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    Ok(cli.run()?)
}
