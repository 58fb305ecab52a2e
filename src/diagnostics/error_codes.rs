//! Error code definitions and documentation

use serde::{Deserialize, Serialize};

/// Input and configuration errors (E0xxx)
pub mod input {
    pub const UNREADABLE_FILE: &str = "E0100";
    pub const MALFORMED_TREE: &str = "E0101";
}

/// Count mismatches (E1xxx)
pub mod arity {
    pub const ASSIGNMENT_COUNT: &str = "E1001";
    pub const RETURN_COUNT: &str = "E1002";
    pub const ARGUMENT_COUNT: &str = "E1003";
    pub const ELEMENT_COUNT: &str = "E1004";
    pub const TABLE_WIDTH: &str = "E1005";
    pub const CONVERSION_ARGUMENTS: &str = "E1006";
    pub const MEMBER_TYPES: &str = "E1007";
    pub const PARAMETER_NAMES: &str = "E1008";
}

/// Names that are not declared in any enclosing scope (E2xxx)
pub mod undeclared {
    pub const IDENTIFIER: &str = "E2001";
    pub const TYPE: &str = "E2002";
    pub const MEMBER: &str = "E2003";
}

/// A declaration or value of the wrong kind for its position (E3xxx)
pub mod kind {
    pub const NOT_A_TYPE: &str = "E3001";
    pub const NOT_A_CLASS: &str = "E3002";
    pub const NOT_A_TABLE: &str = "E3003";
    pub const NOT_CALLABLE: &str = "E3004";
    pub const NOT_A_VALUE: &str = "E3005";
    pub const NON_NAME_DECLARATION: &str = "E3006";
    pub const RETURN_OUTSIDE_FUNCTION: &str = "E3007";
}

/// Assignability and convertibility errors (E4xxx)
pub mod types {
    pub const NOT_ASSIGNABLE: &str = "E4001";
    pub const NOT_CONVERTIBLE: &str = "E4002";
    pub const MISMATCHED_OPERANDS: &str = "E4003";
    pub const INVALID_OPERATION: &str = "E4004";
    pub const MULTI_VALUE_CONTEXT: &str = "E4005";
}

/// Constant evaluation errors (E5xxx)
pub mod constants {
    pub const OVERFLOW: &str = "E5001";
    pub const DIVISION_BY_ZERO: &str = "E5002";
    pub const MALFORMED_LITERAL: &str = "E5003";
}

/// Foreign package import errors (E6xxx)
pub mod imports {
    pub const IMPORT_FAILED: &str = "E6001";
}

/// Well-defined "not yet implemented" features (E9xxx)
pub mod unsupported {
    pub const MULTI_VALUE_DESTRUCTURING: &str = "E9001";
    pub const NAMED_FIELD_LITERAL: &str = "E9002";
    pub const QUALIFIED_TYPE: &str = "E9003";
    pub const NATIVE_IMPORT: &str = "E9004";
    pub const EXPONENTIATION: &str = "E9005";
    pub const COMPARISON_TYPING: &str = "E9006";
    pub const UNARY_TYPING: &str = "E9007";
    pub const FOREIGN_EXPORT_TYPE: &str = "E9008";
}

/// Warnings (W0xxx)
pub mod warnings {
    pub const UNUSED_VARIABLE: &str = "W0001";
}

/// Taxonomy bucket of a diagnostic code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Arity,
    Undeclared,
    WrongKind,
    Assignability,
    ConstantRange,
    Import,
    Unsupported,
    Lint,
    Other,
}

impl Category {
    /// Classify a code by its leading digits
    pub fn of(code: &str) -> Self {
        if code.starts_with('W') {
            return Category::Lint;
        }
        match code.get(..2) {
            Some("E1") => Category::Arity,
            Some("E2") => Category::Undeclared,
            Some("E3") => Category::WrongKind,
            Some("E4") => Category::Assignability,
            Some("E5") => Category::ConstantRange,
            Some("E6") => Category::Import,
            Some("E9") => Category::Unsupported,
            _ => Category::Other,
        }
    }
}
