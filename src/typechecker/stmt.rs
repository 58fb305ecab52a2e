//! Statement checking: one rule per statement kind

use super::expr::describe;
use super::*;
use crate::diagnostics::error_codes::{arity, imports, kind, types, unsupported};
use crate::syntax::{Block, ClassDecl, Import};
use crate::types::{ForeignType, PackageType};

impl Checker {
    pub(super) fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    pub(super) fn stmt(&mut self, stmt: &Stmt) {
        tracing::debug!(id = stmt.id().0, "check statement");
        match stmt {
            Stmt::Assign {
                span,
                decl,
                left,
                right,
                ..
            } => {
                if *decl {
                    self.define(span, left, right);
                } else {
                    self.assign_stmt(span, left, right);
                }
            }
            Stmt::Simple { expr, .. } => self.simple(expr),
            Stmt::Block(block) => self.block(block),
            Stmt::If {
                init,
                cond,
                body,
                else_branch,
                ..
            } => self.with_scope(|c| {
                if let Some(init) = init {
                    c.stmt(init);
                }
                c.condition(cond);
                c.block(body);
                if let Some(else_branch) = else_branch {
                    c.stmt(else_branch);
                }
            }),
            Stmt::For {
                init,
                cond,
                post,
                body,
                ..
            } => self.with_scope(|c| {
                if let Some(init) = init {
                    c.stmt(init);
                }
                if let Some(cond) = cond {
                    c.condition(cond);
                }
                if let Some(post) = post {
                    c.stmt(post);
                }
                c.block(body);
            }),
            Stmt::ClassDecl(decl) => self.class_decl(decl),
            Stmt::Return { span, exprs, .. } => self.return_stmt(span, exprs),
            Stmt::Import(import) => self.import(import),
        }
    }

    fn block(&mut self, block: &Block) {
        self.with_scope(|c| c.stmts(&block.stmts));
    }

    fn condition(&mut self, cond: &Expr) {
        let mut p = self.expr(cond);
        self.assign(&mut p, &Type::BOOL);
    }

    fn simple(&mut self, expr: &Expr) {
        let mut p = self.expr(expr);
        if let Expr::FuncLit(func) = expr {
            if let Some(name) = &func.name {
                // Bound after its body is checked, so a function cannot
                // refer to itself by name
                let ty = if p.is_invalid() { Type::Invalid } else { p.ty.clone() };
                self.declare(Obj::new(
                    name.clone(),
                    ObjKind::Var,
                    ty,
                    Some(func.id),
                    func.span.clone(),
                ));
            }
            return;
        }
        self.default_untyped(&mut p);
    }

    /// Declare a name whose initializer could not be checked, so later uses
    /// do not report it again
    fn declare_invalid(&mut self, target: &Expr) {
        if let Expr::Ident { id, span, name } = target {
            let obj = self.declare_local(Obj::new(
                name.clone(),
                ObjKind::Var,
                Type::Invalid,
                Some(*id),
                span.clone(),
            ));
            self.defs.insert(*id, obj);
        }
    }

    fn count_mismatch(&mut self, span: &Span, decl: bool, left: &[Expr], right: &[Expr]) {
        if decl && right.len() == 1 {
            self.error(
                unsupported::MULTI_VALUE_DESTRUCTURING,
                span,
                format!(
                    "assigning the multi-value expression {} to {} variables is not supported",
                    describe(&right[0]),
                    left.len()
                ),
            );
        } else {
            self.error(
                arity::ASSIGNMENT_COUNT,
                span,
                format!(
                    "assignment mismatch: {} variables but {} values",
                    left.len(),
                    right.len()
                ),
            );
        }
    }

    /// `a, b := x, y`
    fn define(&mut self, span: &Span, left: &[Expr], right: &[Expr]) {
        if left.len() != right.len() {
            self.count_mismatch(span, true, left, right);
            for target in left {
                self.declare_invalid(target);
            }
            return;
        }

        // Every initializer is checked before any name comes into scope
        let mut values: Vec<Partial<'_>> = right.iter().map(|r| self.expr(r)).collect();
        for (target, p) in left.iter().zip(values.iter_mut()) {
            let Expr::Ident { id, span, name } = target else {
                self.error(
                    kind::NON_NAME_DECLARATION,
                    target.span(),
                    format!("non-name {} on left side of :=", describe(target)),
                );
                continue;
            };
            self.require_single_value(p);
            self.default_untyped(p);
            let ty = if p.is_invalid() { Type::Invalid } else { p.ty.clone() };
            let obj = self.declare_local(Obj::new(
                name.clone(),
                ObjKind::Var,
                ty.clone(),
                Some(*id),
                span.clone(),
            ));
            self.defs.insert(*id, obj);
            if !ty.is_invalid() {
                self.types.insert(*id, ty);
            }
        }
    }

    /// `a, b = x, y`
    fn assign_stmt(&mut self, span: &Span, left: &[Expr], right: &[Expr]) {
        if left.len() != right.len() {
            self.count_mismatch(span, false, left, right);
            return;
        }
        for (target, value) in left.iter().zip(right) {
            let mut lhs = self.expr(target);
            let mut rhs = self.expr(value);
            self.require_single_value(&mut rhs);
            if lhs.is_invalid() || rhs.is_invalid() {
                continue;
            }
            if lhs.mode != Mode::Var {
                self.error(
                    kind::NOT_A_VALUE,
                    target.span(),
                    format!("cannot assign to {}", describe(target)),
                );
                self.invalidate(&mut lhs);
                continue;
            }
            self.assign(&mut rhs, &lhs.ty);
        }
    }

    fn class_decl(&mut self, decl: &ClassDecl) {
        let (class, ok) = self.resolve_class(&decl.class, &decl.span);
        if !ok {
            self.declare(Obj::new(
                decl.name.clone(),
                ObjKind::Type,
                Type::Invalid,
                Some(decl.id),
                decl.span.clone(),
            ));
            return;
        }
        let ty = Type::Class(class);
        self.resolved.insert(decl.id, ty.clone());

        for method in &decl.methods {
            self.with_scope(|c| {
                if let Some(receiver) = &method.receiver {
                    c.declare(Obj::new(
                        receiver.clone(),
                        ObjKind::Var,
                        ty.clone(),
                        Some(method.id),
                        method.span.clone(),
                    ));
                }
                c.func_lit(method);
            });
        }

        tracing::debug!(class = %decl.name, "declare class");
        self.declare(Obj::new(
            decl.name.clone(),
            ObjKind::Type,
            ty,
            Some(decl.id),
            decl.span.clone(),
        ));
    }

    fn return_stmt(&mut self, span: &Span, exprs: &[Expr]) {
        let mut parts: Vec<Partial<'_>> = exprs.iter().map(|e| self.expr(e)).collect();
        let Some(want) = self.results.last().cloned() else {
            self.error(
                kind::RETURN_OUTSIDE_FUNCTION,
                span,
                "return statement outside function",
            );
            return;
        };
        for p in parts.iter_mut() {
            self.require_value(p);
        }
        if parts.iter().any(Partial::is_invalid) {
            return;
        }

        // A single call with several results may fill several slots
        if let [p] = parts.as_slice() {
            if let Type::Tuple { elems } = &p.ty {
                if want.len() != 1 {
                    let have = elems.clone();
                    if self.check_return_count(span, have.len(), want.len(), &have, &want) {
                        for (i, (got, expected)) in have.iter().zip(&want).enumerate() {
                            if got != expected {
                                self.return_mismatch(p.expr, got, expected, i);
                            }
                        }
                    }
                    return;
                }
            }
        }
        if let Some(p) = parts.iter().find(|p| matches!(p.ty, Type::Tuple { .. })) {
            self.error(
                types::MULTI_VALUE_CONTEXT,
                p.expr.span(),
                format!("multiple-value {} in single-value context", describe(p.expr)),
            );
            return;
        }

        let have: Vec<Type> = parts.iter().map(|p| p.ty.clone()).collect();
        if !self.check_return_count(span, parts.len(), want.len(), &have, &want) {
            return;
        }
        for (i, (p, expected)) in parts.iter_mut().zip(&want).enumerate() {
            if p.ty.is_untyped() {
                self.constrain_untyped(p, expected);
            } else if p.ty != *expected {
                self.return_mismatch(p.expr, &p.ty.clone(), expected, i);
            }
        }
    }

    fn check_return_count(
        &mut self,
        span: &Span,
        have: usize,
        want: usize,
        have_types: &[Type],
        want_types: &[Type],
    ) -> bool {
        if have == want {
            return true;
        }
        let list = |types: &[Type]| {
            types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let which = if have < want { "too few" } else { "too many" };
        self.error(
            arity::RETURN_COUNT,
            span,
            format!(
                "{} arguments to return: have ({}), want ({})",
                which,
                list(have_types),
                list(want_types)
            ),
        );
        false
    }

    fn return_mismatch(&mut self, expr: &Expr, got: &Type, expected: &Type, index: usize) {
        self.error(
            types::NOT_ASSIGNABLE,
            expr.span(),
            format!(
                "cannot use {} (type {}) as {} in return argument {}",
                describe(expr),
                got,
                expected,
                index + 1
            ),
        );
    }

    fn import(&mut self, import: &Import) {
        if !import.foreign {
            self.error(
                unsupported::NATIVE_IMPORT,
                &import.span,
                format!(
                    "importing non-foreign package {:?} is not supported",
                    import.path
                ),
            );
            return;
        }
        tracing::debug!(path = %import.path, "import foreign package");
        match self.resolver.resolve(&import.path) {
            Ok(package) => {
                let local = import.name.clone().unwrap_or_else(|| package.name.clone());
                let ty = Type::Foreign(ForeignType {
                    path: import.path.clone(),
                    name: package.name,
                    equivalent: PackageType {
                        exports: package.exports,
                    },
                });
                self.resolved.insert(import.id, ty.clone());
                self.declare(Obj::new(
                    local,
                    ObjKind::Var,
                    ty,
                    Some(import.id),
                    import.span.clone(),
                ));
            }
            Err(err) => {
                self.error(
                    imports::IMPORT_FAILED,
                    &import.span,
                    format!("importing foreign package {}: {}", import.path, err),
                );
                let local = import
                    .name
                    .clone()
                    .unwrap_or_else(|| bridge::default_name(&import.path));
                self.declare(Obj::new(
                    local,
                    ObjKind::Var,
                    Type::Invalid,
                    Some(import.id),
                    import.span.clone(),
                ));
            }
        }
    }
}
