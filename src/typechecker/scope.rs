//! Objects, lexical scopes and the predeclared base scope

use super::*;
use crate::diagnostics::{error_codes, Note};
use crate::types::Basic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::LazyLock;

/// What a declared name stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjKind {
    Var,
    Type,
}

/// A declaration record for a variable or type name
#[derive(Debug)]
pub struct Obj {
    pub name: String,
    pub kind: ObjKind,
    pub ty: Type,
    /// Node that introduced the name; `None` for predeclared names
    pub decl: Option<NodeId>,
    pub span: Span,
    used: AtomicBool,
}

impl Obj {
    pub fn new(
        name: impl Into<String>,
        kind: ObjKind,
        ty: Type,
        decl: Option<NodeId>,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            decl,
            span,
            used: AtomicBool::new(false),
        }
    }

    pub fn is_type(&self) -> bool {
        self.kind == ObjKind::Type
    }

    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::Relaxed)
    }

    pub(super) fn mark_used(&self) {
        // Predeclared objects are shared by every checker and stay untouched
        if self.decl.is_some() {
            self.used.store(true, Ordering::Relaxed);
        }
    }
}

/// One level of lexical nesting
#[derive(Debug, Default)]
pub(super) struct Scope {
    objs: HashMap<String, Arc<Obj>>,
    /// Variables introduced by `:=`, in declaration order, for the unused lint
    locals: Vec<Arc<Obj>>,
}

impl Scope {
    pub(super) fn get(&self, name: &str) -> Option<Arc<Obj>> {
        self.objs.get(name).cloned()
    }

    fn insert(&mut self, obj: Arc<Obj>) {
        self.objs.insert(obj.name.clone(), obj);
    }
}

/// Predeclared names shared by every checker
pub(super) static UNIVERSE: LazyLock<Scope> = LazyLock::new(|| {
    let mut scope = Scope::default();
    for basic in Basic::CONCRETE {
        scope.insert(Arc::new(Obj::new(
            basic.name(),
            ObjKind::Type,
            Type::basic(basic),
            None,
            Span::default(),
        )));
    }
    scope
});

/// Methods on `Checker` for scope management
impl Checker {
    /// Run `f` inside a fresh nested scope
    pub(super) fn with_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scopes.push(Scope::default());
        let result = f(self);
        self.pop_scope();
        result
    }

    /// Pop a nested scope and emit W0001 warnings for unused variables
    fn pop_scope(&mut self) {
        if self.scopes.len() <= 1 {
            return;
        }
        let Some(scope) = self.scopes.pop() else {
            return;
        };
        if !self.lint_unused {
            return;
        }
        for obj in &scope.locals {
            if !obj.is_used() && !obj.name.starts_with('_') {
                self.diagnostics.push(
                    Diagnostic::warning(error_codes::warnings::UNUSED_VARIABLE)
                        .message(format!("Unused variable `{}`", obj.name))
                        .span(obj.span.clone())
                        .note(Note::new(format!(
                            "prefix with `_` to suppress this warning: `_{}`",
                            obj.name
                        )))
                        .build(),
                );
            }
        }
    }

    /// Declare a name in the current scope, overwriting any earlier
    /// declaration of the same name in that scope
    pub(super) fn declare(&mut self, obj: Obj) -> Arc<Obj> {
        let obj = Arc::new(obj);
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(obj.clone());
        }
        obj
    }

    /// Declare a `:=` variable, tracked for the unused-variable lint
    pub(super) fn declare_local(&mut self, obj: Obj) -> Arc<Obj> {
        let obj = self.declare(obj);
        if let Some(scope) = self.scopes.last_mut() {
            scope.locals.push(obj.clone());
        }
        obj
    }
}
