//! Input trees for the Numgrad checker
//!
//! The lexer and parser live outside this crate; this module defines the
//! statement, expression and type-annotation trees they hand over, plus
//! JSON loading for trees exported by an external parser.

pub mod ast;

pub use ast::*;

use crate::diagnostics::{input, Diagnostic, DiagnosticBag, Span};
use std::path::Path;

/// Load a JSON array of statements
pub fn load_program(path: &Path) -> Result<Vec<Stmt>, DiagnosticBag> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DiagnosticBag::from(
            Diagnostic::error(input::UNREADABLE_FILE)
                .message(format!("Could not read file: {}", e))
                .span(Span::file(path))
                .build(),
        )
    })?;

    parse_program(&content, path)
}

/// Deserialize a JSON array of statements
pub fn parse_program(source: &str, path: &Path) -> Result<Vec<Stmt>, DiagnosticBag> {
    serde_json::from_str(source).map_err(|e| {
        let mut span = Span::file(path);
        span.start_line = e.line();
        span.start_col = e.column();
        span.end_line = e.line();
        span.end_col = e.column() + 1;
        DiagnosticBag::from(
            Diagnostic::error(input::MALFORMED_TREE)
                .message(format!("Malformed program tree: {}", e))
                .span(span)
                .build(),
        )
    })
}
