//! Checker findings
//!
//! Every problem the checker finds becomes a [`Diagnostic`] with a stable
//! code from [`error_codes`], a severity, a message and the [`Span`] of the
//! offending node. Diagnostics accumulate in a [`DiagnosticBag`] in the order
//! they were reported and render either as JSON (one object per diagnostic)
//! or as text with the source line underlined.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::path::PathBuf;

pub mod error_codes;
pub use error_codes::*;

/// Location of a node in the Numgrad source it was parsed from.
///
/// Lines and columns are 1-based; a zero `start_line` means the parser did
/// not supply a location. Missing fields deserialize as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    pub file: PathBuf,
    /// Byte offsets, end exclusive
    pub start: usize,
    pub end: usize,
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Span {
    /// A single-line span of `width` columns starting at `line:col`
    pub fn at(file: impl Into<PathBuf>, line: usize, col: usize, width: usize) -> Self {
        Self {
            file: file.into(),
            start_line: line,
            start_col: col,
            end_line: line,
            end_col: col + width,
            ..Self::default()
        }
    }

    /// The first position of a file, for problems with the file as a whole
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::at(path, 1, 1, 0)
    }

    pub fn is_known(&self) -> bool {
        self.start_line > 0
    }

    /// Columns to underline on the first line, given that line's text
    fn underline(&self, line: &str) -> (usize, usize) {
        let offset = self.start_col.saturating_sub(1);
        let width = if self.end_line == self.start_line {
            self.end_col.saturating_sub(self.start_col)
        } else {
            line.len().saturating_sub(offset)
        };
        (offset, width.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// Extra context attached below a diagnostic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Note {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

/// One checker finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Stable code such as `E4001`
    pub code: String,
    /// Taxonomy bucket derived from the code
    pub category: Category,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
}

impl Diagnostic {
    pub fn error(code: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code.into(), Severity::Error)
    }

    pub fn warning(code: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code.into(), Severity::Warning)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Single-line JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Header, location, underlined source line (when `source` has it) and
    /// notes, ending in a newline
    pub fn to_human_readable(&self, source: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.render(&mut out, source);
        out
    }

    fn render(&self, out: &mut String, source: &str) -> fmt::Result {
        writeln!(out, "{}", self)?;
        let line = self
            .span
            .start_line
            .checked_sub(1)
            .and_then(|index| source.lines().nth(index));
        if let Some(line) = line {
            let (offset, width) = self.span.underline(line);
            writeln!(out, "   |")?;
            writeln!(out, "{:>3} | {}", self.span.start_line, line)?;
            writeln!(out, "   | {}{}", " ".repeat(offset), "^".repeat(width))?;
        }
        for note in &self.notes {
            match &note.span {
                Some(span) if span.is_known() => writeln!(
                    out,
                    "   = note: {} ({}:{})",
                    note.message, span.start_line, span.start_col
                )?,
                _ => writeln!(out, "   = note: {}", note.message)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if self.span.is_known() {
            write!(
                f,
                "\n  --> {}:{}:{}",
                self.span.file.display(),
                self.span.start_line,
                self.span.start_col
            )?;
        }
        Ok(())
    }
}

/// Builder returned by [`Diagnostic::error`] and [`Diagnostic::warning`]
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    fn new(code: String, severity: Severity) -> Self {
        Self {
            diagnostic: Diagnostic {
                category: Category::of(&code),
                code,
                severity,
                message: String::new(),
                span: Span::default(),
                notes: Vec::new(),
            },
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.diagnostic.message = message.into();
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.diagnostic.span = span;
        self
    }

    pub fn note(mut self, note: Note) -> Self {
        self.diagnostic.notes.push(note);
        self
    }

    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}

/// Diagnostics in the order they were reported
#[derive(Debug, Default, Clone)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Codes in report order
    pub fn codes(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.code.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// JSON array of all diagnostics
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.diagnostics).unwrap_or_else(|_| "[]".to_string())
    }

    /// Every diagnostic as text, separated by blank lines
    pub fn render(&self, source: &str) -> String {
        self.diagnostics
            .iter()
            .map(|d| d.to_human_readable(source))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Diagnostic> for DiagnosticBag {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests;
