//! Numgrad static semantic checker
//!
//! Numgrad is a small statically-typed numeric language. This crate checks
//! program trees produced by its parser: it resolves names, infers types,
//! settles untyped constants with exact arithmetic, and reports semantic
//! errors as structured diagnostics.

pub mod cli;
pub mod config;
pub mod constant;
pub mod diagnostics;
pub mod syntax;
pub mod typechecker;
pub mod types;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::constant::ConstValue;
    pub use crate::diagnostics::{Diagnostic, DiagnosticBag, Severity, Span};
    pub use crate::syntax::ast::*;
    pub use crate::typechecker::{check_program, Checker};
    pub use crate::types::{Basic, ClassType, FuncType, Type};
}
