//! Type representation for Numgrad
//!
//! A closed set of type shapes. Types are pure data: they carry no behavior
//! beyond structural equality and a handful of predicates used by the checker.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Basic (scalar) kinds, including the untyped constant kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basic {
    UntypedBool,
    UntypedInteger,
    UntypedFloat,
    UntypedComplex,
    Bool,
    Integer,
    Int64,
    Float,
    Float32,
    Float64,
    /// Generic numeric type parameter
    Num,
    String,
}

impl Basic {
    /// All concrete (typed) basic kinds, in predeclared order
    pub const CONCRETE: [Basic; 8] = [
        Basic::Bool,
        Basic::Integer,
        Basic::Int64,
        Basic::Float,
        Basic::Float32,
        Basic::Float64,
        Basic::Num,
        Basic::String,
    ];

    pub fn is_untyped(self) -> bool {
        matches!(
            self,
            Basic::UntypedBool | Basic::UntypedInteger | Basic::UntypedFloat | Basic::UntypedComplex
        )
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Basic::UntypedInteger
                | Basic::UntypedFloat
                | Basic::UntypedComplex
                | Basic::Integer
                | Basic::Int64
                | Basic::Float
                | Basic::Float32
                | Basic::Float64
                | Basic::Num
        )
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, Basic::Bool | Basic::UntypedBool)
    }

    /// Integer kinds use truncated division when folding constants
    pub fn is_integer(self) -> bool {
        matches!(self, Basic::UntypedInteger | Basic::Integer | Basic::Int64)
    }

    /// Position of an untyped numeric kind in the promotion lattice
    /// (Integer, then Float, then Complex).
    pub fn untyped_rank(self) -> Option<u8> {
        match self {
            Basic::UntypedInteger => Some(0),
            Basic::UntypedFloat => Some(1),
            Basic::UntypedComplex => Some(2),
            _ => None,
        }
    }

    /// The name this kind is predeclared under, if any
    pub fn name(self) -> &'static str {
        match self {
            Basic::UntypedBool => "untyped bool",
            Basic::UntypedInteger => "untyped integer",
            Basic::UntypedFloat => "untyped float",
            Basic::UntypedComplex => "untyped complex",
            Basic::Bool => "bool",
            Basic::Integer => "integer",
            Basic::Int64 => "int64",
            Basic::Float => "float",
            Basic::Float32 => "float32",
            Basic::Float64 => "float64",
            Basic::Num => "num",
            Basic::String => "string",
        }
    }
}

/// Function signature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuncType {
    #[serde(default)]
    pub params: Vec<Type>,
    #[serde(default)]
    pub results: Vec<Type>,
}

/// A struct-with-methods
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassType {
    #[serde(default)]
    pub field_names: Vec<String>,
    #[serde(default)]
    pub fields: Vec<Type>,
    #[serde(default)]
    pub method_names: Vec<String>,
    #[serde(default)]
    pub methods: Vec<Type>,
    /// Set when any field or method signature mentions `num`
    #[serde(default)]
    pub num_generic: bool,
}

impl ClassType {
    /// Look up a member: fields first, then methods
    pub fn member(&self, name: &str) -> Option<&Type> {
        self.field_names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.fields.get(i))
            .or_else(|| {
                self.method_names
                    .iter()
                    .position(|n| n == name)
                    .and_then(|i| self.methods.get(i))
            })
    }
}

/// Exported names of a package. A `None` type means the bridge enumerated
/// the name without typing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageType {
    pub exports: BTreeMap<String, Option<Type>>,
}

/// A package from outside the language's own ecosystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignType {
    pub path: String,
    pub name: String,
    pub equivalent: PackageType,
}

/// A Numgrad type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    Invalid,
    Basic {
        basic: Basic,
    },
    Func(FuncType),
    Tuple {
        elems: Vec<Type>,
    },
    Class(ClassType),
    Table {
        elem: Box<Type>,
    },
    Package(PackageType),
    Foreign(ForeignType),
    /// A named reference the checker still has to resolve
    Unresolved {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        package: Option<String>,
    },
}

impl Type {
    pub const BOOL: Type = Type::Basic { basic: Basic::Bool };
    pub const INTEGER: Type = Type::Basic {
        basic: Basic::Integer,
    };
    pub const INT64: Type = Type::Basic {
        basic: Basic::Int64,
    };
    pub const FLOAT: Type = Type::Basic {
        basic: Basic::Float,
    };
    pub const FLOAT32: Type = Type::Basic {
        basic: Basic::Float32,
    };
    pub const FLOAT64: Type = Type::Basic {
        basic: Basic::Float64,
    };
    pub const NUM: Type = Type::Basic { basic: Basic::Num };
    pub const STRING: Type = Type::Basic {
        basic: Basic::String,
    };
    pub const UNTYPED_BOOL: Type = Type::Basic {
        basic: Basic::UntypedBool,
    };
    pub const UNTYPED_INTEGER: Type = Type::Basic {
        basic: Basic::UntypedInteger,
    };
    pub const UNTYPED_FLOAT: Type = Type::Basic {
        basic: Basic::UntypedFloat,
    };
    pub const UNTYPED_COMPLEX: Type = Type::Basic {
        basic: Basic::UntypedComplex,
    };

    pub fn basic(basic: Basic) -> Self {
        Type::Basic { basic }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Type::Unresolved {
            name: name.into(),
            package: None,
        }
    }

    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        Type::Unresolved {
            name: name.into(),
            package: Some(package.into()),
        }
    }

    pub fn func(params: Vec<Type>, results: Vec<Type>) -> Self {
        Type::Func(FuncType { params, results })
    }

    pub fn table(elem: Type) -> Self {
        Type::Table {
            elem: Box::new(elem),
        }
    }

    pub fn tuple(elems: Vec<Type>) -> Self {
        Type::Tuple { elems }
    }

    pub fn as_basic(&self) -> Option<Basic> {
        match self {
            Type::Basic { basic } => Some(*basic),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Type::Invalid)
    }

    pub fn is_untyped(&self) -> bool {
        self.as_basic().is_some_and(Basic::is_untyped)
    }

    /// Neither invalid nor an untyped constant kind
    pub fn is_typed(&self) -> bool {
        !self.is_invalid() && !self.is_untyped()
    }

    pub fn is_numeric(&self) -> bool {
        self.as_basic().is_some_and(Basic::is_numeric)
    }

    pub fn is_boolean(&self) -> bool {
        self.as_basic().is_some_and(Basic::is_boolean)
    }

    /// Whether the generic `num` parameter appears anywhere in this type
    pub fn uses_num(&self) -> bool {
        match self {
            Type::Basic { basic } => *basic == Basic::Num,
            Type::Func(f) => f.params.iter().chain(&f.results).any(Type::uses_num),
            Type::Tuple { elems } => elems.iter().any(Type::uses_num),
            Type::Class(c) => c.num_generic || c.fields.iter().chain(&c.methods).any(Type::uses_num),
            Type::Table { elem } => elem.uses_num(),
            Type::Invalid
            | Type::Package(_)
            | Type::Foreign(_)
            | Type::Unresolved { .. } => false,
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, t) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", t)?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Invalid => write!(f, "invalid type"),
            Type::Basic { basic } => write!(f, "{}", basic.name()),
            Type::Func(func) => {
                write!(f, "func(")?;
                write_list(f, &func.params)?;
                write!(f, ")")?;
                match func.results.as_slice() {
                    [] => Ok(()),
                    [single] => write!(f, " {}", single),
                    many => {
                        write!(f, " (")?;
                        write_list(f, many)?;
                        write!(f, ")")
                    }
                }
            }
            Type::Tuple { elems } => {
                write!(f, "(")?;
                write_list(f, elems)?;
                write!(f, ")")
            }
            Type::Class(class) => {
                write!(f, "class {{")?;
                for (name, ty) in class.field_names.iter().zip(&class.fields) {
                    write!(f, " {} {};", name, ty)?;
                }
                for (name, ty) in class.method_names.iter().zip(&class.methods) {
                    write!(f, " {} {};", name, ty)?;
                }
                write!(f, " }}")
            }
            Type::Table { elem } => write!(f, "[|]{}", elem),
            Type::Package(pkg) => write!(f, "package ({} exports)", pkg.exports.len()),
            Type::Foreign(foreign) => write!(f, "foreign package {:?}", foreign.path),
            Type::Unresolved { name, package } => match package {
                Some(pkg) => write!(f, "{}.{}", pkg, name),
                None => write!(f, "{}", name),
            },
        }
    }
}
