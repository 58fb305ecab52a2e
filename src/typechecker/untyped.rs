//! Untyped constants: promotion, constraint to a context type, defaulting
//!
//! An untyped constant keeps its exact value and an untyped kind until a
//! context forces a type on it. Untyped kinds only promote upward along
//! Integer, Float, Complex. Constraining to a concrete basic type
//! range-checks and rounds the value, then pushes the new type down the
//! expression subtree so every node of a constant expression agrees.

use super::*;
use crate::constant::RoundError;
use crate::diagnostics::error_codes::{constants, types};
use crate::types::Basic;

impl Checker {
    /// Give the untyped partial `p` the type `target`, if it has no type yet
    pub(super) fn constrain_untyped(&mut self, p: &mut Partial<'_>, target: &Type) {
        if p.is_invalid() || !p.ty.is_untyped() || target.is_invalid() {
            return;
        }
        let Some(from) = p.ty.as_basic() else {
            return;
        };
        tracing::trace!(from = %p.ty, to = %target, "constrain untyped");

        let Some(to) = target.as_basic() else {
            self.error(
                types::NOT_ASSIGNABLE,
                p.expr.span(),
                format!(
                    "cannot use {} ({}) as {} value",
                    super::expr::describe(p.expr),
                    p.ty,
                    target
                ),
            );
            self.invalidate(p);
            return;
        };

        if from.is_boolean() != to.is_boolean() || to == Basic::String {
            let code = if to.is_untyped() {
                types::NOT_CONVERTIBLE
            } else {
                types::NOT_ASSIGNABLE
            };
            self.error(
                code,
                p.expr.span(),
                format!(
                    "cannot use {} ({}) as {} value",
                    super::expr::describe(p.expr),
                    p.ty,
                    target
                ),
            );
            self.invalidate(p);
            return;
        }

        if to.is_untyped() {
            // Untyped kinds never demote
            if from.untyped_rank() >= to.untyped_rank() {
                return;
            }
            p.ty = target.clone();
            self.constrain_expr_type(p.expr, target);
            return;
        }

        if let Some(val) = p.val.take() {
            match val.round(to) {
                Ok(rounded) => {
                    self.values.insert(p.expr.id(), rounded.clone());
                    p.val = Some(rounded);
                }
                Err(err) => {
                    let code = match err {
                        RoundError::Kind { .. } => types::NOT_ASSIGNABLE,
                        RoundError::Overflow { .. } | RoundError::Truncated { .. } => {
                            constants::OVERFLOW
                        }
                    };
                    self.error(code, p.expr.span(), err.to_string());
                    self.invalidate(p);
                    return;
                }
            }
        }
        p.ty = target.clone();
        self.constrain_expr_type(p.expr, target);
    }

    /// Record `target` as the type of an untyped expression and the untyped
    /// nodes beneath it. Comparison results are booleans whatever their
    /// operands are, so propagation stops there.
    fn constrain_expr_type(&mut self, expr: &Expr, target: &Type) {
        match self.types.get(&expr.id()) {
            Some(old) if old == target => return,
            Some(old) if old.is_untyped() => {
                self.types.insert(expr.id(), target.clone());
            }
            _ => {}
        }
        match expr {
            Expr::Binary {
                op, left, right, ..
            } if !op.is_comparison() => {
                self.constrain_expr_type(left, target);
                self.constrain_expr_type(right, target);
            }
            Expr::Unary { expr: inner, .. } => self.constrain_expr_type(inner, target),
            _ => {}
        }
    }

    /// Lift whichever of two untyped numeric operands ranks lower to the
    /// other's kind
    pub(super) fn lift_untyped(&mut self, l: &mut Partial<'_>, r: &mut Partial<'_>) {
        let (Some(a), Some(b)) = (l.ty.as_basic(), r.ty.as_basic()) else {
            return;
        };
        if a.untyped_rank() < b.untyped_rank() {
            let target = r.ty.clone();
            self.constrain_untyped(l, &target);
        } else if b.untyped_rank() < a.untyped_rank() {
            let target = l.ty.clone();
            self.constrain_untyped(r, &target);
        }
    }

    /// Give a still-untyped partial its default type: `bool` for untyped
    /// booleans, `num` for every untyped numeric kind
    pub(super) fn default_untyped(&mut self, p: &mut Partial<'_>) {
        let Some(basic) = p.ty.as_basic().filter(|b| b.is_untyped()) else {
            return;
        };
        let target = if basic.is_boolean() {
            Type::BOOL
        } else {
            Type::NUM
        };
        self.constrain_untyped(p, &target);
    }
}
