//! Command-line interface for the Numgrad checker
//!
//! Provides commands: check, explain

mod check_cmd;
mod explain_cmd;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

use crate::config::ConfigError;

pub use check_cmd::{CheckOptions, CheckSummary};

/// Numgrad - static semantic checker
#[derive(Parser, Debug)]
#[command(name = "numgrad")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output diagnostics as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check program trees (JSON) for semantic errors
    Check {
        /// Program files to check
        #[arg(required = true, value_name = "FILES")]
        paths: Vec<PathBuf>,

        /// Configuration file (defaults to ./numgrad.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Numgrad source each tree was parsed from, shown under diagnostics.
        /// Repeat once per program file, in the same order.
        #[arg(long = "source", value_name = "SOURCE")]
        sources: Vec<PathBuf>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Print the type recorded for every expression node
        #[arg(long)]
        dump_types: bool,
    },

    /// Explain a diagnostic code in detail
    Explain {
        /// Code to explain (e.g., E1001, W0001)
        code: String,
    },
}

/// Failures that stop a command before it can report diagnostics
#[derive(Debug, Error, miette::Diagnostic)]
pub enum CliError {
    #[error("{0}")]
    #[diagnostic(code(numgrad::config), help("see numgrad.toml"))]
    Config(#[from] ConfigError),

    #[error("could not read {}", path.display())]
    #[diagnostic(code(numgrad::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{sources} --source file(s) given for {files} program file(s)")]
    #[diagnostic(
        code(numgrad::source),
        help("pass one --source per program file, in the same order, or none")
    )]
    SourceCount { sources: usize, files: usize },

    #[error("unknown diagnostic code {0}")]
    #[diagnostic(
        code(numgrad::explain),
        help("codes look like E1001 (errors) or W0001 (warnings)")
    )]
    UnknownCode(String),
}

impl Cli {
    /// Run the selected command
    pub fn run(self) -> Result<ExitCode, CliError> {
        match self.command {
            Command::Check {
                paths,
                config,
                sources,
                strict,
                dump_types,
            } => {
                let options = CheckOptions {
                    config,
                    sources,
                    strict,
                    dump_types,
                    json: self.json,
                };
                let summary = check_cmd::run_check(&paths, &options)?;
                Ok(if summary.failed(strict) {
                    ExitCode::FAILURE
                } else {
                    ExitCode::SUCCESS
                })
            }
            Command::Explain { code } => {
                explain_cmd::run_explain(&code)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

#[cfg(test)]
mod tests;
