//! Static checker for Numgrad
//!
//! Resolves names through a chain of lexical scopes, infers the type of every
//! expression, gives untyped constants a concrete type from context, and
//! reports everything it finds as diagnostics. Statements are fed one at a
//! time with [`Checker::add`]; results are read back through the output
//! tables, all keyed by [`NodeId`].
//!
//! The checker is split across several files, each adding methods to
//! [`Checker`]:
//! - `scope`: objects, scopes and the predeclared base scope
//! - `resolve`: turning annotation types into concrete types
//! - `expr`: one rule per expression kind
//! - `untyped`: constraining and defaulting untyped constants
//! - `assign`: assignability and explicit conversion
//! - `stmt`: one rule per statement kind
//! - `bridge`: foreign package resolution

use crate::config::Config;
use crate::constant::ConstValue;
use crate::diagnostics::{Diagnostic, DiagnosticBag, Span};
use crate::syntax::{Expr, NodeId, Stmt};
use crate::types::Type;
use std::collections::HashMap;
use std::sync::Arc;

mod assign;
pub mod bridge;
mod expr;
mod resolve;
pub mod scope;
mod stmt;
mod untyped;

pub use bridge::{ForeignPackage, ForeignResolver, NoForeignPackages, ResolveError, StaticResolver};
pub use scope::{Obj, ObjKind};

use scope::Scope;

/// Classification of a checked expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Checking failed; the error has already been reported
    Invalid,
    /// Produces no value (a call without results, a shell escape)
    Void,
    /// Compile-time constant
    Const,
    /// Runtime value
    Var,
    /// Names a type
    TypeExpr,
    /// Function literal
    Func,
}

/// The not-yet-final result of checking one expression
#[derive(Debug, Clone)]
pub struct Partial<'a> {
    pub mode: Mode,
    pub ty: Type,
    /// Present only for `Mode::Const`
    pub val: Option<ConstValue>,
    pub expr: &'a Expr,
}

impl<'a> Partial<'a> {
    fn new(mode: Mode, ty: Type, expr: &'a Expr) -> Self {
        Self {
            mode,
            ty,
            val: None,
            expr,
        }
    }

    fn invalid(expr: &'a Expr) -> Self {
        Self::new(Mode::Invalid, Type::Invalid, expr)
    }

    fn constant(ty: Type, val: ConstValue, expr: &'a Expr) -> Self {
        Self {
            mode: Mode::Const,
            ty,
            val: Some(val),
            expr,
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.mode == Mode::Invalid
    }
}

/// Checker state for one compilation unit
pub struct Checker {
    /// Lexical scopes, outermost (the unit scope) first; the predeclared
    /// base scope sits behind index 0
    scopes: Vec<Scope>,
    /// Result lists of the enclosing function literals, innermost last
    results: Vec<Vec<Type>>,
    types: HashMap<NodeId, Type>,
    defs: HashMap<NodeId, Arc<Obj>>,
    values: HashMap<NodeId, ConstValue>,
    resolved: HashMap<NodeId, Type>,
    diagnostics: DiagnosticBag,
    resolver: Box<dyn ForeignResolver>,
    lint_unused: bool,
}

impl Checker {
    /// Create a checker with default settings and no foreign packages
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            results: Vec::new(),
            types: HashMap::new(),
            defs: HashMap::new(),
            values: HashMap::new(),
            resolved: HashMap::new(),
            diagnostics: DiagnosticBag::new(),
            resolver: Box::new(NoForeignPackages),
            lint_unused: false,
        }
    }

    /// Create a checker configured from `numgrad.toml` settings
    pub fn with_config(config: &Config) -> Self {
        let mut checker = Self::new();
        checker.lint_unused = config.lint.unused_variables;
        checker.resolver = Box::new(config.resolver());
        checker
    }

    /// Replace the foreign package resolver
    pub fn with_resolver(mut self, resolver: impl ForeignResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Check one more top-level statement
    #[tracing::instrument(level = "debug", skip_all, fields(stmt = stmt.id().0))]
    pub fn add(&mut self, stmt: &Stmt) {
        self.stmt(stmt);
    }

    /// Look up a name from the current (top-level) scope outward
    pub fn lookup(&self, name: &str) -> Option<Arc<Obj>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| scope::UNIVERSE.get(name))
    }

    /// Expression types, keyed by expression node
    pub fn types(&self) -> &HashMap<NodeId, Type> {
        &self.types
    }

    /// Identifier declarations, keyed by identifier node
    pub fn defs(&self) -> &HashMap<NodeId, Arc<Obj>> {
        &self.defs
    }

    /// Constant values, keyed by expression node
    pub fn values(&self) -> &HashMap<NodeId, ConstValue> {
        &self.values
    }

    /// Resolved annotation types of function literals, composite and table
    /// literals, class declarations and imports, keyed by node
    pub fn resolved(&self) -> &HashMap<NodeId, Type> {
        &self.resolved
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    /// Consume the checker, keeping only its diagnostics
    pub fn into_diagnostics(self) -> DiagnosticBag {
        self.diagnostics
    }

    pub fn type_of(&self, id: NodeId) -> Option<&Type> {
        self.types.get(&id)
    }

    pub fn value_of(&self, id: NodeId) -> Option<&ConstValue> {
        self.values.get(&id)
    }

    fn error(&mut self, code: &str, span: &Span, message: impl Into<String>) {
        self.diagnostics.push(
            Diagnostic::error(code)
                .message(message)
                .span(span.clone())
                .build(),
        );
    }

    /// Mark a partial invalid and forget anything recorded for its node
    fn invalidate(&mut self, p: &mut Partial<'_>) {
        p.mode = Mode::Invalid;
        p.ty = Type::Invalid;
        p.val = None;
        self.types.remove(&p.expr.id());
        self.values.remove(&p.expr.id());
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a whole program with the given configuration
pub fn check_program(program: &[Stmt], config: &Config) -> Checker {
    let mut checker = Checker::with_config(config);
    for stmt in program {
        checker.add(stmt);
    }
    checker
}
