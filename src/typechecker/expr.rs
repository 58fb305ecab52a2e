//! Expression checking: one rule per expression kind

use super::*;
use crate::constant::{FoldError, LiteralError};
use crate::diagnostics::error_codes::{arity, constants, kind, types, undeclared, unsupported};
use crate::syntax::{BinaryOp, FuncLit, Literal, UnaryOp};
use crate::types::{Basic, FuncType};
use num_traits::Zero;

/// Short source-like rendering of an expression for diagnostics
pub(super) fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Ident { name, .. } => name.clone(),
        Expr::BasicLit { value, .. } => match value {
            Literal::Bool(b) => b.to_string(),
            Literal::Int(text) | Literal::Float(text) => text.clone(),
            Literal::String(s) => format!("{:?}", s),
        },
        Expr::FuncLit(func) => match &func.name {
            Some(name) => format!("func {}", name),
            None => "func literal".to_string(),
        },
        Expr::CompLit { ty, .. } | Expr::TableLit { ty, .. } => format!("{}{{...}}", ty),
        Expr::Unary { op, expr, .. } => match op {
            UnaryOp::Paren => format!("({})", describe(expr)),
            UnaryOp::Neg => format!("-{}", describe(expr)),
            UnaryOp::Not => format!("!{}", describe(expr)),
        },
        Expr::Binary {
            op, left, right, ..
        } => format!("{} {} {}", describe(left), op.symbol(), describe(right)),
        Expr::Call { func, args, .. } => {
            let args: Vec<String> = args.iter().map(describe).collect();
            format!("{}({})", describe(func), args.join(", "))
        }
        Expr::Selector { left, name, .. } => format!("{}.{}", describe(left), name),
        Expr::Shell { .. } => "($$ ... $$)".to_string(),
    }
}

fn is_zero(val: &ConstValue) -> bool {
    match val {
        ConstValue::Int(i) => i.is_zero(),
        ConstValue::Rat(r) => r.is_zero(),
        ConstValue::Bool(_) => false,
    }
}

impl Checker {
    /// Check an expression and record its type and constant value
    pub(super) fn expr<'a>(&mut self, e: &'a Expr) -> Partial<'a> {
        let p = self.expr_kind(e);
        if !p.is_invalid() {
            self.types.insert(e.id(), p.ty.clone());
            if let Some(val) = &p.val {
                self.values.insert(e.id(), val.clone());
            }
        }
        p
    }

    fn expr_kind<'a>(&mut self, e: &'a Expr) -> Partial<'a> {
        match e {
            Expr::Ident { id, span, name } => self.ident(e, *id, span, name),
            Expr::BasicLit { span, value, .. } => self.basic_lit(e, span, value),
            Expr::FuncLit(func) => {
                let (ty, ok) = self.func_lit(func);
                if ok {
                    Partial::new(Mode::Func, Type::Func(ty), e)
                } else {
                    Partial::invalid(e)
                }
            }
            Expr::CompLit {
                id,
                span,
                ty,
                names,
                elements,
            } => self.comp_lit(e, *id, span, ty, names, elements),
            Expr::TableLit {
                id,
                span,
                ty,
                col_names,
                rows,
            } => self.table_lit(e, *id, span, ty, col_names, rows),
            Expr::Unary { span, op, expr, .. } => self.unary(e, span, *op, expr),
            Expr::Binary {
                span,
                op,
                left,
                right,
                ..
            } => self.binary(e, span, *op, left, right),
            Expr::Call {
                span, func, args, ..
            } => self.call(e, span, func, args),
            Expr::Selector {
                span, left, name, ..
            } => self.selector(e, span, left, name),
            Expr::Shell { .. } => Partial::new(Mode::Void, Type::tuple(Vec::new()), e),
        }
    }

    fn ident<'a>(&mut self, e: &'a Expr, id: NodeId, span: &Span, name: &str) -> Partial<'a> {
        let Some(obj) = self.lookup(name) else {
            self.error(
                undeclared::IDENTIFIER,
                span,
                format!("undeclared identifier: {}", name),
            );
            return Partial::invalid(e);
        };
        obj.mark_used();
        self.defs.insert(id, obj.clone());
        // The declaration already reported why its type is unknown
        if obj.ty.is_invalid() {
            return Partial::invalid(e);
        }
        let mode = match obj.kind {
            ObjKind::Var => Mode::Var,
            ObjKind::Type => Mode::TypeExpr,
        };
        Partial::new(mode, obj.ty.clone(), e)
    }

    fn basic_lit<'a>(&mut self, e: &'a Expr, span: &Span, value: &Literal) -> Partial<'a> {
        let (parsed, ty, what) = match value {
            Literal::Bool(b) => return Partial::constant(Type::UNTYPED_BOOL, (*b).into(), e),
            Literal::String(_) => return Partial::new(Mode::Var, Type::STRING, e),
            Literal::Int(text) => (
                ConstValue::parse_int(text).ok_or(LiteralError::Malformed),
                Type::UNTYPED_INTEGER,
                text,
            ),
            Literal::Float(text) => (ConstValue::parse_float(text), Type::UNTYPED_FLOAT, text),
        };
        match parsed {
            Ok(val) => Partial::constant(ty, val, e),
            Err(LiteralError::Malformed) => {
                self.error(
                    constants::MALFORMED_LITERAL,
                    span,
                    format!("malformed numeric literal {}", what),
                );
                Partial::invalid(e)
            }
            Err(err @ LiteralError::ExponentRange(_)) => {
                self.error(
                    constants::OVERFLOW,
                    span,
                    format!("numeric literal {}: {}", what, err),
                );
                Partial::invalid(e)
            }
        }
    }

    /// Check a function literal's body in its own scope. Returns the
    /// resolved signature and whether resolution succeeded.
    pub(super) fn func_lit(&mut self, func: &FuncLit) -> (FuncType, bool) {
        let (sig, mut ok) = self.resolve_func(&func.ty, &func.span);
        if func.param_names.len() != sig.params.len() {
            self.error(
                arity::PARAMETER_NAMES,
                &func.span,
                format!(
                    "function has {} parameter names but {} parameter types",
                    func.param_names.len(),
                    sig.params.len()
                ),
            );
            ok = false;
        }
        self.resolved.insert(func.id, Type::Func(sig.clone()));
        self.with_scope(|c| {
            for (name, ty) in func.param_names.iter().zip(&sig.params) {
                c.declare(Obj::new(
                    name.clone(),
                    ObjKind::Var,
                    ty.clone(),
                    Some(func.id),
                    func.span.clone(),
                ));
            }
            c.results.push(sig.results.clone());
            c.stmts(&func.body.stmts);
            c.results.pop();
        });
        (sig, ok)
    }

    fn comp_lit<'a>(
        &mut self,
        e: &'a Expr,
        id: NodeId,
        span: &Span,
        annotation: &Type,
        names: &[String],
        elements: &'a [Expr],
    ) -> Partial<'a> {
        let (ty, ok) = self.resolve(annotation, span);
        if !ok {
            return Partial::invalid(e);
        }
        self.resolved.insert(id, ty.clone());
        let Type::Class(class) = &ty else {
            self.error(
                kind::NOT_A_CLASS,
                span,
                format!("{} is not a class type", annotation),
            );
            return Partial::invalid(e);
        };
        if !names.is_empty() {
            self.error(
                unsupported::NAMED_FIELD_LITERAL,
                span,
                "named fields in composite literals are not supported",
            );
            return Partial::invalid(e);
        }

        let mut parts: Vec<Partial<'a>> = elements.iter().map(|el| self.expr(el)).collect();
        if parts.iter().any(Partial::is_invalid) {
            return Partial::invalid(e);
        }
        if parts.len() != class.fields.len() {
            self.error(
                arity::ELEMENT_COUNT,
                span,
                format!(
                    "wrong number of elements, {}, when {} expects {}",
                    parts.len(),
                    annotation,
                    class.fields.len()
                ),
            );
            return Partial::invalid(e);
        }
        let mut valid = true;
        for (p, field) in parts.iter_mut().zip(&class.fields) {
            self.assign(p, field);
            valid &= !p.is_invalid();
        }
        if !valid {
            return Partial::invalid(e);
        }
        Partial::new(Mode::Var, ty.clone(), e)
    }

    fn table_lit<'a>(
        &mut self,
        e: &'a Expr,
        id: NodeId,
        span: &Span,
        annotation: &Type,
        col_names: &'a [Expr],
        rows: &'a [Vec<Expr>],
    ) -> Partial<'a> {
        let (ty, ok) = self.resolve(annotation, span);
        if !ok {
            return Partial::invalid(e);
        }
        self.resolved.insert(id, ty.clone());
        let Type::Table { elem } = &ty else {
            self.error(
                kind::NOT_A_TABLE,
                span,
                format!("{} is not a table type", annotation),
            );
            return Partial::invalid(e);
        };

        let mut valid = true;
        for name in col_names {
            let mut p = self.expr(name);
            self.assign(&mut p, &Type::STRING);
            valid &= !p.is_invalid();
        }
        let Some(first) = rows.first() else {
            return if valid {
                Partial::new(Mode::Var, ty.clone(), e)
            } else {
                Partial::invalid(e)
            };
        };

        let width = first.len();
        if !col_names.is_empty() && col_names.len() != width {
            self.error(
                arity::TABLE_WIDTH,
                span,
                format!(
                    "table literal has {} column names but a width of {}",
                    col_names.len(),
                    width
                ),
            );
            return Partial::invalid(e);
        }
        if let Some(row) = rows.iter().find(|row| row.len() != width) {
            self.error(
                arity::TABLE_WIDTH,
                span,
                format!(
                    "table literal has rows of different lengths ({} and {})",
                    width,
                    row.len()
                ),
            );
            return Partial::invalid(e);
        }

        for cell in rows.iter().flatten() {
            let mut p = self.expr(cell);
            self.assign(&mut p, elem);
            valid &= !p.is_invalid();
        }
        if !valid {
            return Partial::invalid(e);
        }
        Partial::new(Mode::Var, ty.clone(), e)
    }

    fn unary<'a>(&mut self, e: &'a Expr, span: &Span, op: UnaryOp, inner: &'a Expr) -> Partial<'a> {
        let mut p = self.expr(inner);
        if p.is_invalid() {
            return Partial::invalid(e);
        }
        if op != UnaryOp::Paren {
            self.require_value(&mut p);
            if p.is_invalid() {
                return Partial::invalid(e);
            }
            let applies = match op {
                UnaryOp::Neg => p.ty.is_numeric(),
                UnaryOp::Not => p.ty.is_boolean(),
                UnaryOp::Paren => true,
            };
            if !applies {
                let symbol = if op == UnaryOp::Neg { "-" } else { "!" };
                self.error(
                    unsupported::UNARY_TYPING,
                    span,
                    format!("unary operator {} on {} is not supported", symbol, p.ty),
                );
                return Partial::invalid(e);
            }
        }
        p.val = p.val.and_then(|val| val.unary(op));
        p.expr = e;
        p
    }

    fn binary<'a>(
        &mut self,
        e: &'a Expr,
        span: &Span,
        op: BinaryOp,
        left: &'a Expr,
        right: &'a Expr,
    ) -> Partial<'a> {
        let mut l = self.expr(left);
        let mut r = self.expr(right);
        if l.is_invalid() || r.is_invalid() {
            return Partial::invalid(e);
        }
        self.require_value(&mut l);
        self.require_value(&mut r);
        if l.is_invalid() || r.is_invalid() {
            return Partial::invalid(e);
        }
        if op == BinaryOp::Pow {
            self.error(
                unsupported::EXPONENTIATION,
                span,
                "exponentiation operator ** is not supported",
            );
            return Partial::invalid(e);
        }

        match (l.ty.is_untyped(), r.ty.is_untyped()) {
            (true, true) => self.lift_untyped(&mut l, &mut r),
            (true, false) => {
                let target = r.ty.clone();
                self.constrain_untyped(&mut l, &target);
            }
            (false, true) => {
                let target = l.ty.clone();
                self.constrain_untyped(&mut r, &target);
            }
            (false, false) => {}
        }
        if l.is_invalid() || r.is_invalid() {
            return Partial::invalid(e);
        }
        if l.ty != r.ty {
            self.error(
                types::MISMATCHED_OPERANDS,
                span,
                format!(
                    "invalid operation: {} (mismatched types {} and {})",
                    describe(e),
                    l.ty,
                    r.ty
                ),
            );
            return Partial::invalid(e);
        }

        let operand = l.ty.clone();
        let Some(basic) = operand.as_basic() else {
            if op.is_comparison() {
                self.error(
                    unsupported::COMPARISON_TYPING,
                    span,
                    format!("comparison of {} values is not supported", operand),
                );
            } else {
                self.invalid_operation(span, op, &operand);
            }
            return Partial::invalid(e);
        };
        let defined = if op.is_comparison() {
            !(op.is_ordering() && basic.is_boolean())
        } else if op.is_logical() {
            basic.is_boolean()
        } else {
            let floating = matches!(
                basic,
                Basic::UntypedFloat
                    | Basic::UntypedComplex
                    | Basic::Float
                    | Basic::Float32
                    | Basic::Float64
            );
            (basic.is_numeric() && !(op == BinaryOp::Rem && floating))
                || (op == BinaryOp::Add && basic == Basic::String)
        };
        if !defined {
            self.invalid_operation(span, op, &operand);
            return Partial::invalid(e);
        }

        let both_const = l.mode == Mode::Const && r.mode == Mode::Const;
        let result = if !op.is_comparison() {
            operand.clone()
        } else if both_const {
            Type::UNTYPED_BOOL
        } else {
            Type::BOOL
        };

        let (Some(a), Some(b), true) = (&l.val, &r.val, both_const) else {
            if let (BinaryOp::Div | BinaryOp::Rem, Some(divisor)) = (op, &r.val) {
                if (basic.is_integer() || basic == Basic::Num) && is_zero(divisor) {
                    self.error(constants::DIVISION_BY_ZERO, span, "division by zero");
                    return Partial::invalid(e);
                }
            }
            return Partial::new(Mode::Var, result, e);
        };
        let folded = match a.binary(op, b, basic.is_integer()) {
            Ok(val) => val,
            Err(FoldError::DivisionByZero) => {
                self.error(constants::DIVISION_BY_ZERO, span, "division by zero");
                return Partial::invalid(e);
            }
            Err(err @ FoldError::InvalidOperation { .. }) => {
                self.error(types::INVALID_OPERATION, span, format!("invalid operation: {}", err));
                return Partial::invalid(e);
            }
        };
        // Typed constant arithmetic must stay within its kind
        let folded = match result.as_basic() {
            Some(kind) if !kind.is_untyped() && !op.is_comparison() => match folded.round(kind) {
                Ok(val) => val,
                Err(err) => {
                    self.error(constants::OVERFLOW, span, err.to_string());
                    return Partial::invalid(e);
                }
            },
            _ => folded,
        };
        Partial::constant(result, folded, e)
    }

    fn invalid_operation(&mut self, span: &Span, op: BinaryOp, operand: &Type) {
        self.error(
            types::INVALID_OPERATION,
            span,
            format!(
                "invalid operation: operator {} not defined on {}",
                op.symbol(),
                operand
            ),
        );
    }

    fn call<'a>(&mut self, e: &'a Expr, span: &Span, func: &'a Expr, args: &'a [Expr]) -> Partial<'a> {
        let callee = self.expr(func);
        match callee.mode {
            Mode::Invalid => Partial::invalid(e),
            Mode::TypeExpr => self.conversion(e, span, &callee.ty, args),
            Mode::Void => {
                let mut callee = callee;
                self.require_value(&mut callee);
                Partial::invalid(e)
            }
            Mode::Const | Mode::Var | Mode::Func => {
                let Type::Func(sig) = &callee.ty else {
                    self.error(
                        kind::NOT_CALLABLE,
                        span,
                        format!(
                            "cannot call non-function {} (type {})",
                            describe(func),
                            callee.ty
                        ),
                    );
                    return Partial::invalid(e);
                };
                if args.len() != sig.params.len() {
                    self.error(
                        arity::ARGUMENT_COUNT,
                        span,
                        format!(
                            "wrong number of arguments in call to {}: have {}, want {}",
                            describe(func),
                            args.len(),
                            sig.params.len()
                        ),
                    );
                    return Partial::invalid(e);
                }
                let mut valid = true;
                for (arg, param) in args.iter().zip(&sig.params) {
                    let mut p = self.expr(arg);
                    self.convert(&mut p, param);
                    valid &= !p.is_invalid();
                }
                if !valid {
                    return Partial::invalid(e);
                }
                match sig.results.as_slice() {
                    [] => Partial::new(Mode::Void, Type::tuple(Vec::new()), e),
                    [single] => Partial::new(Mode::Var, single.clone(), e),
                    many => Partial::new(Mode::Var, Type::tuple(many.to_vec()), e),
                }
            }
        }
    }

    fn conversion<'a>(&mut self, e: &'a Expr, span: &Span, target: &Type, args: &'a [Expr]) -> Partial<'a> {
        let [arg] = args else {
            self.error(
                arity::CONVERSION_ARGUMENTS,
                span,
                format!(
                    "conversion to {} takes exactly one argument, got {}",
                    target,
                    args.len()
                ),
            );
            return Partial::invalid(e);
        };
        let mut p = self.expr(arg);
        self.convert(&mut p, target);
        if p.is_invalid() {
            return Partial::invalid(e);
        }
        p.expr = e;
        p
    }

    fn selector<'a>(&mut self, e: &'a Expr, span: &Span, left: &'a Expr, name: &str) -> Partial<'a> {
        let base = self.expr(left);
        if base.is_invalid() {
            return Partial::invalid(e);
        }
        let member = match &base.ty {
            Type::Class(class) => match class.member(name) {
                Some(ty) => ty.clone(),
                None => {
                    self.error(
                        undeclared::MEMBER,
                        span,
                        format!(
                            "{} has no field or method {}",
                            describe(left),
                            name
                        ),
                    );
                    return Partial::invalid(e);
                }
            },
            Type::Foreign(foreign) => {
                let exports = &foreign.equivalent.exports;
                match self.export(span, &foreign.name, exports, name) {
                    Some(ty) => ty,
                    None => return Partial::invalid(e),
                }
            }
            Type::Package(package) => match self.export(span, &describe(left), &package.exports, name) {
                Some(ty) => ty,
                None => return Partial::invalid(e),
            },
            other => {
                self.error(
                    kind::NOT_A_CLASS,
                    span,
                    format!(
                        "{} (type {}) is not a class or package",
                        describe(left),
                        other
                    ),
                );
                return Partial::invalid(e);
            }
        };
        Partial::new(Mode::Var, member, e)
    }

    fn export(
        &mut self,
        span: &Span,
        package: &str,
        exports: &std::collections::BTreeMap<String, Option<Type>>,
        name: &str,
    ) -> Option<Type> {
        match exports.get(name) {
            Some(Some(ty)) => {
                let (ty, ok) = self.resolve(ty, span);
                ok.then_some(ty)
            }
            Some(None) => {
                self.error(
                    unsupported::FOREIGN_EXPORT_TYPE,
                    span,
                    format!("type of foreign export {}.{} is not known", package, name),
                );
                None
            }
            None => {
                self.error(
                    undeclared::MEMBER,
                    span,
                    format!("undefined: {}.{}", package, name),
                );
                None
            }
        }
    }
}
