//! Exact compile-time constant values
//!
//! Constants are kept in arbitrary precision (big integers and big rationals)
//! until they are constrained to a concrete basic kind, at which point they are
//! range-checked and rounded.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

use crate::syntax::{BinaryOp, UnaryOp};
use crate::types::Basic;

/// An exact constant value
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Bool(bool),
    Int(BigInt),
    /// A non-integral rational; integral results are normalized to `Int`
    Rat(BigRational),
}

/// Why a constant does not fit a basic kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("cannot represent {value} as {kind}")]
    Kind { value: String, kind: &'static str },
    #[error("constant {value} overflows {kind}")]
    Overflow { value: String, kind: &'static str },
    #[error("constant {value} truncated to {kind}")]
    Truncated { value: String, kind: &'static str },
}

/// Why two constants could not be folded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoldError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("operator {op} not defined on {operand}")]
    InvalidOperation { op: &'static str, operand: String },
}

/// Largest exponent magnitude accepted in a float literal
pub const MAX_EXPONENT: u32 = 4096;

/// Why a numeric literal could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("malformed literal")]
    Malformed,
    #[error("exponent {0} is out of range")]
    ExponentRange(String),
}

fn parse_exponent(text: &str) -> Result<i32, LiteralError> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(LiteralError::Malformed);
    }
    match text.parse::<i32>() {
        Ok(exp) if exp.unsigned_abs() <= MAX_EXPONENT => Ok(exp),
        _ => Err(LiteralError::ExponentRange(text.to_string())),
    }
}

fn pow2(exp: i64) -> BigRational {
    let magnitude = BigInt::one() << exp.unsigned_abs();
    if exp >= 0 {
        BigRational::from_integer(magnitude)
    } else {
        BigRational::new(BigInt::one(), magnitude)
    }
}

fn pow10(exp: i64) -> BigRational {
    let magnitude = num_traits::pow(BigInt::from(10), exp.unsigned_abs() as usize);
    if exp >= 0 {
        BigRational::from_integer(magnitude)
    } else {
        BigRational::new(BigInt::one(), magnitude)
    }
}

/// Binary floating-point format parameters
struct FloatFormat {
    /// Significand bits including the implicit one
    precision: i64,
    min_exp: i64,
    max_exp: i64,
}

const FLOAT32: FloatFormat = FloatFormat {
    precision: 24,
    min_exp: -126,
    max_exp: 127,
};

const FLOAT64: FloatFormat = FloatFormat {
    precision: 53,
    min_exp: -1022,
    max_exp: 1023,
};

/// Round `r` to the nearest value of `format`, ties to even, in one step
/// from the exact value. `None` when the result overflows.
fn round_float(r: &BigRational, format: &FloatFormat) -> Option<BigRational> {
    if r.is_zero() {
        return Some(r.clone());
    }
    let a = r.abs();
    // floor(log2 a) is one of these two
    let mut exp = a.numer().bits() as i64 - a.denom().bits() as i64;
    if a < pow2(exp) {
        exp -= 1;
    }
    let quantum = exp.max(format.min_exp) - (format.precision - 1);
    let scaled = &a * pow2(-quantum);
    let floor = scaled.floor();
    let half = BigRational::new(BigInt::one(), BigInt::from(2));
    let mut n = floor.to_integer();
    match (scaled - floor).cmp(&half) {
        Ordering::Greater => n += BigInt::one(),
        Ordering::Equal if !(&n % 2u32).is_zero() => n += BigInt::one(),
        _ => {}
    }
    let rounded = BigRational::from_integer(n) * pow2(quantum);
    if rounded >= pow2(format.max_exp + 1) {
        return None;
    }
    Some(if r.is_negative() { -rounded } else { rounded })
}

impl ConstValue {
    pub fn int(v: i64) -> Self {
        ConstValue::Int(BigInt::from(v))
    }

    /// Parse an integer literal: decimal, `0x`, `0o` or `0b`, `_` separators allowed
    pub fn parse_int(text: &str) -> Option<Self> {
        let cleaned: String = text.chars().filter(|&c| c != '_').collect();
        let (digits, radix) = match cleaned.get(..2) {
            Some("0x") | Some("0X") => (&cleaned[2..], 16),
            Some("0o") | Some("0O") => (&cleaned[2..], 8),
            Some("0b") | Some("0B") => (&cleaned[2..], 2),
            _ => (cleaned.as_str(), 10),
        };
        if digits.is_empty() {
            return None;
        }
        BigInt::parse_bytes(digits.as_bytes(), radix).map(ConstValue::Int)
    }

    /// Parse a decimal floating-point literal exactly (`1.5`, `.5`, `2e-3`).
    /// Exponents beyond [`MAX_EXPONENT`] in magnitude are rejected.
    pub fn parse_float(text: &str) -> Result<Self, LiteralError> {
        let cleaned: String = text.chars().filter(|&c| c != '_').collect();
        let (mantissa, exponent) = match cleaned.find(['e', 'E']) {
            Some(pos) => (&cleaned[..pos], parse_exponent(&cleaned[pos + 1..])?),
            None => (cleaned.as_str(), 0),
        };
        let (whole, frac) = match mantissa.split_once('.') {
            Some((w, f)) => (w, f),
            None => (mantissa, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(LiteralError::Malformed);
        }
        if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(LiteralError::Malformed);
        }
        let digits = BigInt::parse_bytes(format!("{}{}", whole, frac).as_bytes(), 10)
            .ok_or(LiteralError::Malformed)?;
        let scale = i64::from(exponent) - frac.len() as i64;
        let value = BigRational::from_integer(digits) * pow10(scale);
        Ok(ConstValue::from_rational(value))
    }

    /// Build a value from a rational, normalizing integral values to `Int`
    pub fn from_rational(r: BigRational) -> Self {
        if r.is_integer() {
            ConstValue::Int(r.to_integer())
        } else {
            ConstValue::Rat(r)
        }
    }

    fn to_rational(&self) -> Option<BigRational> {
        match self {
            ConstValue::Bool(_) => None,
            ConstValue::Int(i) => Some(BigRational::from_integer(i.clone())),
            ConstValue::Rat(r) => Some(r.clone()),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            ConstValue::Bool(_) => "bool",
            ConstValue::Int(_) => "integer",
            ConstValue::Rat(_) => "float",
        }
    }

    /// Range-check and round this value for `kind`
    pub fn round(&self, kind: Basic) -> Result<ConstValue, RoundError> {
        let kind_err = || RoundError::Kind {
            value: self.to_string(),
            kind: kind.name(),
        };
        let overflow = || RoundError::Overflow {
            value: self.to_string(),
            kind: kind.name(),
        };
        match self {
            ConstValue::Bool(_) => {
                if kind.is_boolean() {
                    Ok(self.clone())
                } else {
                    Err(kind_err())
                }
            }
            ConstValue::Int(_) | ConstValue::Rat(_) => match kind {
                Basic::UntypedFloat
                | Basic::UntypedComplex
                | Basic::Float
                | Basic::Num => Ok(self.clone()),
                Basic::Integer | Basic::UntypedInteger | Basic::Int64 => {
                    let ConstValue::Int(i) = self else {
                        return Err(RoundError::Truncated {
                            value: self.to_string(),
                            kind: kind.name(),
                        });
                    };
                    if kind == Basic::Int64 && i.to_i64().is_none() {
                        return Err(overflow());
                    }
                    Ok(self.clone())
                }
                Basic::Float32 => self
                    .to_rational()
                    .and_then(|r| round_float(&r, &FLOAT32))
                    .map(ConstValue::from_rational)
                    .ok_or_else(overflow),
                Basic::Float64 => self
                    .to_rational()
                    .and_then(|r| round_float(&r, &FLOAT64))
                    .map(ConstValue::from_rational)
                    .ok_or_else(overflow),
                Basic::Bool | Basic::UntypedBool | Basic::String => Err(kind_err()),
            },
        }
    }

    /// Fold `self op other`. `integer_kind` selects truncated division.
    pub fn binary(
        &self,
        op: BinaryOp,
        other: &ConstValue,
        integer_kind: bool,
    ) -> Result<ConstValue, FoldError> {
        if op.is_comparison() {
            return self.compare(op, other).map(ConstValue::Bool);
        }
        let invalid = |operand: &ConstValue| FoldError::InvalidOperation {
            op: op.symbol(),
            operand: operand.kind_name().to_string(),
        };
        match (self, other) {
            (ConstValue::Bool(a), ConstValue::Bool(b)) => match op {
                BinaryOp::And => Ok(ConstValue::Bool(*a && *b)),
                BinaryOp::Or => Ok(ConstValue::Bool(*a || *b)),
                _ => Err(invalid(self)),
            },
            (ConstValue::Bool(_), _) => Err(invalid(self)),
            (_, ConstValue::Bool(_)) => Err(invalid(other)),
            (ConstValue::Int(a), ConstValue::Int(b)) if integer_kind => match op {
                BinaryOp::Add => Ok(ConstValue::Int(a + b)),
                BinaryOp::Sub => Ok(ConstValue::Int(a - b)),
                BinaryOp::Mul => Ok(ConstValue::Int(a * b)),
                BinaryOp::Div | BinaryOp::Rem if b.is_zero() => Err(FoldError::DivisionByZero),
                BinaryOp::Div => Ok(ConstValue::Int(a / b)),
                BinaryOp::Rem => Ok(ConstValue::Int(a % b)),
                _ => Err(invalid(self)),
            },
            _ => {
                let (Some(a), Some(b)) = (self.to_rational(), other.to_rational()) else {
                    return Err(invalid(self));
                };
                let value = match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div if b.is_zero() => return Err(FoldError::DivisionByZero),
                    BinaryOp::Div => a / b,
                    BinaryOp::Rem => {
                        return Err(FoldError::InvalidOperation {
                            op: op.symbol(),
                            operand: "float".to_string(),
                        })
                    }
                    _ => return Err(invalid(self)),
                };
                Ok(ConstValue::from_rational(value))
            }
        }
    }

    fn compare(&self, op: BinaryOp, other: &ConstValue) -> Result<bool, FoldError> {
        let ordering = match (self, other) {
            (ConstValue::Bool(a), ConstValue::Bool(b)) => match op {
                BinaryOp::Eq => return Ok(a == b),
                BinaryOp::Ne => return Ok(a != b),
                _ => {
                    return Err(FoldError::InvalidOperation {
                        op: op.symbol(),
                        operand: "bool".to_string(),
                    })
                }
            },
            _ => match (self.to_rational(), other.to_rational()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => {
                    return Err(FoldError::InvalidOperation {
                        op: op.symbol(),
                        operand: "mixed bool and numeric".to_string(),
                    })
                }
            },
        };
        match op {
            BinaryOp::Eq => Ok(ordering == Ordering::Equal),
            BinaryOp::Ne => Ok(ordering != Ordering::Equal),
            BinaryOp::Lt => Ok(ordering == Ordering::Less),
            BinaryOp::Le => Ok(ordering != Ordering::Greater),
            BinaryOp::Gt => Ok(ordering == Ordering::Greater),
            BinaryOp::Ge => Ok(ordering != Ordering::Less),
            _ => Err(FoldError::InvalidOperation {
                op: op.symbol(),
                operand: self.kind_name().to_string(),
            }),
        }
    }

    /// Fold a unary operator; `None` when the operator does not apply
    pub fn unary(&self, op: UnaryOp) -> Option<ConstValue> {
        match (op, self) {
            (UnaryOp::Paren, v) => Some(v.clone()),
            (UnaryOp::Not, ConstValue::Bool(b)) => Some(ConstValue::Bool(!b)),
            (UnaryOp::Neg, ConstValue::Int(i)) => Some(ConstValue::Int(-i)),
            (UnaryOp::Neg, ConstValue::Rat(r)) => Some(ConstValue::Rat(-r)),
            _ => None,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Bool(b) => write!(f, "{}", b),
            ConstValue::Int(i) => write!(f, "{}", i),
            ConstValue::Rat(r) => match r.to_f64() {
                Some(v) if v.is_finite() => write!(f, "{}", v),
                _ => {
                    let sign = if r.is_negative() { "-" } else { "" };
                    write!(f, "{}{}/{}", sign, r.numer().abs(), r.denom())
                }
            },
        }
    }
}

impl Serialize for ConstValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConstValue::Bool(b) => serializer.serialize_bool(*b),
            _ => serializer.serialize_str(&self.to_string()),
        }
    }
}

impl From<bool> for ConstValue {
    fn from(b: bool) -> Self {
        ConstValue::Bool(b)
    }
}

#[cfg(test)]
mod tests;
