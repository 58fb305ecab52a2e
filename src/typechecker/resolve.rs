//! Turning annotation types into concrete types

use super::*;
use crate::diagnostics::error_codes::{arity, kind, undeclared, unsupported};
use crate::types::{ClassType, FuncType};

impl Checker {
    /// Resolve every `Unresolved` name inside `ty`. The flag is false when
    /// any part failed; failed parts come back as `Type::Invalid`.
    pub(super) fn resolve(&mut self, ty: &Type, span: &Span) -> (Type, bool) {
        match ty {
            Type::Unresolved {
                name,
                package: Some(package),
            } => {
                self.error(
                    unsupported::QUALIFIED_TYPE,
                    span,
                    format!("qualified type lookup {}.{} is not supported", package, name),
                );
                (Type::Invalid, false)
            }
            Type::Unresolved {
                name,
                package: None,
            } => match self.lookup(name) {
                None => {
                    self.error(undeclared::TYPE, span, format!("type {} not declared", name));
                    (Type::Invalid, false)
                }
                Some(obj) if !obj.is_type() => {
                    self.error(kind::NOT_A_TYPE, span, format!("symbol {} is not a type", name));
                    (Type::Invalid, false)
                }
                Some(obj) => {
                    obj.mark_used();
                    // A type whose own declaration failed was reported there
                    (obj.ty.clone(), !obj.ty.is_invalid())
                }
            },
            Type::Table { elem } => {
                let (elem, ok) = self.resolve(elem, span);
                (Type::table(elem), ok)
            }
            Type::Tuple { elems } => {
                let (elems, ok) = self.resolve_list(elems, span);
                (Type::tuple(elems), ok)
            }
            Type::Func(func) => {
                let (func, ok) = self.resolve_func(func, span);
                (Type::Func(func), ok)
            }
            Type::Class(class) => {
                let (class, ok) = self.resolve_class(class, span);
                (Type::Class(class), ok)
            }
            Type::Invalid | Type::Basic { .. } | Type::Package(_) | Type::Foreign(_) => {
                (ty.clone(), true)
            }
        }
    }

    fn resolve_list(&mut self, types: &[Type], span: &Span) -> (Vec<Type>, bool) {
        let mut ok = true;
        let resolved = types
            .iter()
            .map(|t| {
                let (t, r) = self.resolve(t, span);
                ok &= r;
                t
            })
            .collect();
        (resolved, ok)
    }

    pub(super) fn resolve_func(&mut self, func: &FuncType, span: &Span) -> (FuncType, bool) {
        let (params, params_ok) = self.resolve_list(&func.params, span);
        let (results, results_ok) = self.resolve_list(&func.results, span);
        (FuncType { params, results }, params_ok && results_ok)
    }

    pub(super) fn resolve_class(&mut self, class: &ClassType, span: &Span) -> (ClassType, bool) {
        for (what, names, types) in [
            ("field", class.field_names.len(), class.fields.len()),
            ("method", class.method_names.len(), class.methods.len()),
        ] {
            if names != types {
                self.error(
                    arity::MEMBER_TYPES,
                    span,
                    format!("class has {} {} names but {} {} types", names, what, types, what),
                );
                return (class.clone(), false);
            }
        }
        let (fields, fields_ok) = self.resolve_list(&class.fields, span);
        let (methods, methods_ok) = self.resolve_list(&class.methods, span);
        let num_generic = fields.iter().chain(&methods).any(Type::uses_num);
        let class = ClassType {
            field_names: class.field_names.clone(),
            fields,
            method_names: class.method_names.clone(),
            methods,
            num_generic,
        };
        (class, fields_ok && methods_ok)
    }
}
