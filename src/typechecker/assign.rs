//! Assignability and explicit conversion

use super::*;
use crate::constant::RoundError;
use crate::diagnostics::error_codes::{constants, kind, types};

/// Whether an explicit conversion from `from` to `to` is allowed
fn convertible(from: &Type, to: &Type) -> bool {
    from == to
        || (from.is_numeric() && to.is_numeric())
        || (from.is_boolean() && to.is_boolean())
}

impl Checker {
    /// Report and invalidate a partial that does not denote a value
    pub(super) fn require_value(&mut self, p: &mut Partial<'_>) {
        let message = match p.mode {
            Mode::Void => format!("{} (no value) used as value", super::expr::describe(p.expr)),
            Mode::TypeExpr => format!("{} (type) is not an expression", super::expr::describe(p.expr)),
            _ => return,
        };
        self.error(kind::NOT_A_VALUE, p.expr.span(), message);
        self.invalidate(p);
    }

    /// Like [`Checker::require_value`], and also reject a multi-result call
    pub(super) fn require_single_value(&mut self, p: &mut Partial<'_>) {
        self.require_value(p);
        if matches!(p.ty, Type::Tuple { .. }) {
            self.error(
                types::MULTI_VALUE_CONTEXT,
                p.expr.span(),
                format!(
                    "multiple-value {} (type {}) in single-value context",
                    super::expr::describe(p.expr),
                    p.ty
                ),
            );
            self.invalidate(p);
        }
    }

    /// Check that `p` may be stored in a location of type `target`
    pub(super) fn assign(&mut self, p: &mut Partial<'_>, target: &Type) {
        if p.is_invalid() || target.is_invalid() {
            return;
        }
        self.require_value(p);
        if p.is_invalid() {
            return;
        }
        if p.ty.is_untyped() {
            self.constrain_untyped(p, target);
            return;
        }
        if p.ty != *target {
            self.error(
                types::NOT_ASSIGNABLE,
                p.expr.span(),
                format!(
                    "cannot use {} (type {}) as {} value",
                    super::expr::describe(p.expr),
                    p.ty,
                    target
                ),
            );
            self.invalidate(p);
        }
    }

    /// Explicitly convert `p` to `target`
    pub(super) fn convert(&mut self, p: &mut Partial<'_>, target: &Type) {
        if p.is_invalid() || target.is_invalid() {
            return;
        }
        self.require_value(p);
        if p.is_invalid() {
            return;
        }
        tracing::trace!(from = %p.ty, to = %target, "convert");

        let round = match (p.mode, target.as_basic()) {
            (Mode::Const, Some(kind)) if !kind.is_untyped() => {
                p.val.as_ref().map(|val| val.round(kind))
            }
            _ => None,
        };
        let mut rounded = None;
        match round {
            Some(Ok(v)) => rounded = Some(v),
            Some(Err(err @ (RoundError::Overflow { .. } | RoundError::Truncated { .. }))) => {
                self.error(constants::OVERFLOW, p.expr.span(), err.to_string());
                self.invalidate(p);
                return;
            }
            // A kind mismatch is reported below as an inconvertible pair
            Some(Err(RoundError::Kind { .. })) | None => {}
        }

        if !convertible(&p.ty, target) {
            self.error(
                types::NOT_CONVERTIBLE,
                p.expr.span(),
                format!(
                    "cannot convert {} (type {}) to {}",
                    super::expr::describe(p.expr),
                    p.ty,
                    target
                ),
            );
            self.invalidate(p);
            return;
        }

        if p.ty.is_untyped() {
            self.constrain_untyped(p, target);
        } else {
            p.ty = target.clone();
            if rounded.is_some() {
                p.val = rounded;
            }
        }
    }
}
