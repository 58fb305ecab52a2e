//! Handler for the `numgrad check` subcommand.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::constant::ConstValue;
use crate::diagnostics::DiagnosticBag;
use crate::syntax::{self, NodeId};
use crate::typechecker::check_program;
use crate::types::Type;

use super::CliError;

/// Flags of `numgrad check`
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub config: Option<PathBuf>,
    /// Source text per program file, paired by position
    pub sources: Vec<PathBuf>,
    pub strict: bool,
    pub dump_types: bool,
    pub json: bool,
}

/// Totals over every checked file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl CheckSummary {
    pub fn failed(&self, strict: bool) -> bool {
        self.errors > 0 || (strict && self.warnings > 0)
    }

    fn record(&mut self, diagnostics: &DiagnosticBag) {
        self.files += 1;
        self.errors += diagnostics.error_count();
        self.warnings += diagnostics.warning_count();
    }
}

/// Outcome of checking one file
pub(super) struct FileReport {
    pub(super) diagnostics: DiagnosticBag,
    /// Recorded expression types in node order
    pub(super) types: Vec<(NodeId, Type, Option<ConstValue>)>,
}

pub(crate) fn run_check(paths: &[PathBuf], options: &CheckOptions) -> Result<CheckSummary, CliError> {
    if !options.sources.is_empty() && options.sources.len() != paths.len() {
        return Err(CliError::SourceCount {
            sources: options.sources.len(),
            files: paths.len(),
        });
    }
    let config = Config::discover(options.config.as_deref(), Path::new("."))?;

    let mut summary = CheckSummary::default();
    for (i, path) in paths.iter().enumerate() {
        let source = match options.sources.get(i) {
            Some(source_path) => std::fs::read_to_string(source_path).map_err(|source| CliError::Io {
                path: source_path.clone(),
                source,
            })?,
            None => String::new(),
        };
        tracing::info!(file = %path.display(), "checking");
        let report = check_file(path, &config);
        summary.record(&report.diagnostics);

        if options.json {
            for d in &report.diagnostics {
                println!("{}", d.to_json());
            }
        } else if !report.diagnostics.is_empty() {
            eprintln!("{}", report.diagnostics.render(&source));
        }
        if options.dump_types {
            println!("{}", render_types(path, &report, options.json));
        }
    }

    print_summary(&summary, options.strict);
    Ok(summary)
}

pub(super) fn check_file(path: &Path, config: &Config) -> FileReport {
    let program = match syntax::load_program(path) {
        Ok(program) => program,
        Err(diagnostics) => {
            return FileReport {
                diagnostics,
                types: Vec::new(),
            }
        }
    };

    let checker = check_program(&program, config);
    let mut types: Vec<_> = checker
        .types()
        .iter()
        .map(|(id, ty)| (*id, ty.clone(), checker.value_of(*id).cloned()))
        .collect();
    types.sort_by_key(|(id, _, _)| *id);

    FileReport {
        diagnostics: checker.into_diagnostics(),
        types,
    }
}

pub(super) fn render_types(path: &Path, report: &FileReport, json: bool) -> String {
    if json {
        let entries: Vec<_> = report
            .types
            .iter()
            .map(|(id, ty, value)| {
                serde_json::json!({
                    "node": id.0,
                    "type": ty.to_string(),
                    "value": value,
                })
            })
            .collect();
        return serde_json::json!({
            "file": path.display().to_string(),
            "types": entries,
        })
        .to_string();
    }

    let mut out = format!("{}:", path.display());
    for (id, ty, value) in &report.types {
        out.push_str(&format!("\n  node {}: {}", id.0, ty));
        if let Some(value) = value {
            out.push_str(&format!(" = {}", value));
        }
    }
    out
}

fn print_summary(summary: &CheckSummary, strict: bool) {
    if summary.failed(strict) {
        let mut parts = Vec::new();
        if summary.errors > 0 {
            parts.push(format!("{} error(s)", summary.errors));
        }
        if summary.warnings > 0 {
            if strict {
                parts.push(format!(
                    "{} warning(s) [treated as errors with --strict]",
                    summary.warnings
                ));
            } else {
                parts.push(format!("{} warning(s)", summary.warnings));
            }
        }
        eprintln!(
            "\nChecked {} file(s), found {}",
            summary.files,
            parts.join(", ")
        );
    } else if summary.warnings > 0 {
        eprintln!(
            "Checked {} file(s), no errors ({} warning(s))",
            summary.files, summary.warnings
        );
    } else {
        eprintln!("Checked {} file(s), no errors found", summary.files);
    }
}
