use super::*;
use pretty_assertions::assert_eq;

fn float(text: &str) -> ConstValue {
    ConstValue::parse_float(text).expect("valid float literal")
}

#[test]
fn test_parse_int_radixes() {
    assert_eq!(ConstValue::parse_int("42"), Some(ConstValue::int(42)));
    assert_eq!(ConstValue::parse_int("0x2A"), Some(ConstValue::int(42)));
    assert_eq!(ConstValue::parse_int("0o52"), Some(ConstValue::int(42)));
    assert_eq!(ConstValue::parse_int("0b101010"), Some(ConstValue::int(42)));
    assert_eq!(ConstValue::parse_int("1_000"), Some(ConstValue::int(1000)));
    assert_eq!(ConstValue::parse_int("0x"), None);
    assert_eq!(ConstValue::parse_int("12a"), None);
}

#[test]
fn test_parse_int_beyond_machine_width() {
    let v = ConstValue::parse_int("123456789012345678901234567890").unwrap();
    assert_eq!(v.to_string(), "123456789012345678901234567890");
}

#[test]
fn test_parse_float_is_exact() {
    assert_eq!(float("2.5").to_string(), "2.5");
    assert_eq!(float(".5").to_string(), "0.5");
    assert_eq!(float("2e3"), ConstValue::int(2000));
    assert_eq!(float("1.0"), ConstValue::int(1));
    assert_eq!(float("25e-1").to_string(), "2.5");
    assert_eq!(ConstValue::parse_float("1.2.3"), Err(LiteralError::Malformed));
    assert_eq!(ConstValue::parse_float("e5"), Err(LiteralError::Malformed));
    assert_eq!(ConstValue::parse_float("1e"), Err(LiteralError::Malformed));
    assert_eq!(ConstValue::parse_float("1e+-2"), Err(LiteralError::Malformed));
}

#[test]
fn test_parse_float_exponent_limit() {
    assert_eq!(
        ConstValue::parse_float("1e999999999"),
        Err(LiteralError::ExponentRange("999999999".to_string()))
    );
    assert_eq!(
        ConstValue::parse_float("1e-99999999999999999999"),
        Err(LiteralError::ExponentRange("-99999999999999999999".to_string()))
    );
    assert!(ConstValue::parse_float("1e4097").is_err());
    assert_eq!(float("1e+3"), ConstValue::int(1000));
    assert_eq!(
        float("1e4096"),
        ConstValue::Int(num_traits::pow(BigInt::from(10), 4096))
    );
    assert!(matches!(float("1e-4096"), ConstValue::Rat(_)));
}

#[test]
fn test_round_int64_range() {
    let big = ConstValue::parse_int("9223372036854775808").unwrap();
    assert!(matches!(
        big.round(Basic::Int64),
        Err(RoundError::Overflow { .. })
    ));
    let max = ConstValue::parse_int("9223372036854775807").unwrap();
    assert_eq!(max.round(Basic::Int64), Ok(max.clone()));
    assert_eq!(big.round(Basic::Integer), Ok(big.clone()));
    assert_eq!(big.round(Basic::Num), Ok(big));
}

#[test]
fn test_round_float_to_integer_kinds() {
    assert!(matches!(
        float("2.5").round(Basic::Integer),
        Err(RoundError::Truncated { .. })
    ));
    assert_eq!(float("2.0").round(Basic::Int64), Ok(ConstValue::int(2)));
}

#[test]
fn test_round_float32_narrows_precision() {
    let v = float("0.1");
    let rounded = v.round(Basic::Float32).unwrap();
    assert_ne!(rounded, v);
    assert_eq!(
        rounded,
        ConstValue::from_rational(BigRational::from_float(f64::from(0.1f32)).unwrap())
    );
    assert_eq!(v.round(Basic::Float).unwrap(), v);
}

fn two_to(exp: i32) -> BigRational {
    BigRational::from_integer(BigInt::from(2)).pow(exp)
}

fn rational(r: BigRational) -> ConstValue {
    ConstValue::from_rational(r)
}

#[test]
fn test_round_float32_rounds_once_from_exact_value() {
    let one = BigRational::from_integer(BigInt::from(1));
    // Just above the halfway point between 1 and the next float32
    let v = rational(one.clone() + two_to(-24) + two_to(-60));
    assert_eq!(
        v.round(Basic::Float32),
        Ok(rational(one.clone() + two_to(-23)))
    );
    assert_eq!(
        v.round(Basic::Float32).unwrap().to_string(),
        "1.0000001192092896"
    );
}

#[test]
fn test_round_float_ties_to_even() {
    let one = BigRational::from_integer(BigInt::from(1));
    assert_eq!(
        rational(one.clone() + two_to(-24)).round(Basic::Float32),
        Ok(ConstValue::int(1))
    );
    assert_eq!(
        rational(one.clone() + two_to(-24) * BigInt::from(3)).round(Basic::Float32),
        Ok(rational(one.clone() + two_to(-22)))
    );
    assert_eq!(
        rational(one.clone() + two_to(-53)).round(Basic::Float64),
        Ok(ConstValue::int(1))
    );
    assert_eq!(
        rational(-(one + two_to(-24) * BigInt::from(3))).round(Basic::Float32),
        Ok(rational(-(BigRational::from_integer(BigInt::from(1)) + two_to(-22))))
    );
}

#[test]
fn test_round_float32_subnormals() {
    assert_eq!(
        rational(two_to(-149)).round(Basic::Float32),
        Ok(rational(two_to(-149)))
    );
    assert_eq!(rational(two_to(-150)).round(Basic::Float32), Ok(ConstValue::int(0)));
    assert_eq!(
        rational(two_to(-150) * BigInt::from(3)).round(Basic::Float32),
        Ok(rational(two_to(-148)))
    );
}

#[test]
fn test_round_float32_largest_finite() {
    let max = BigRational::from_float(f64::from(f32::MAX)).unwrap();
    assert_eq!(rational(max.clone()).round(Basic::Float32), Ok(rational(max)));
    assert!(matches!(
        rational(two_to(128)).round(Basic::Float32),
        Err(RoundError::Overflow { .. })
    ));
}

#[test]
fn test_round_float32_overflow() {
    let v = float("1e39");
    assert!(matches!(
        v.round(Basic::Float32),
        Err(RoundError::Overflow { .. })
    ));
    assert!(v.round(Basic::Float64).is_ok());
    assert!(matches!(
        float("1e400").round(Basic::Float64),
        Err(RoundError::Overflow { .. })
    ));
}

#[test]
fn test_round_kind_mismatch() {
    assert!(matches!(
        ConstValue::Bool(true).round(Basic::Integer),
        Err(RoundError::Kind { .. })
    ));
    assert!(matches!(
        ConstValue::int(1).round(Basic::Bool),
        Err(RoundError::Kind { .. })
    ));
    assert!(matches!(
        ConstValue::int(1).round(Basic::String),
        Err(RoundError::Kind { .. })
    ));
}

#[test]
fn test_integer_division_truncates() {
    let seven = ConstValue::int(7);
    let two = ConstValue::int(2);
    assert_eq!(
        seven.binary(BinaryOp::Div, &two, true),
        Ok(ConstValue::int(3))
    );
    assert_eq!(
        seven.binary(BinaryOp::Div, &two, false),
        Ok(float("3.5"))
    );
    assert_eq!(
        seven.binary(BinaryOp::Rem, &two, true),
        Ok(ConstValue::int(1))
    );
}

#[test]
fn test_division_by_zero() {
    let zero = ConstValue::int(0);
    assert_eq!(
        ConstValue::int(1).binary(BinaryOp::Div, &zero, true),
        Err(FoldError::DivisionByZero)
    );
    assert_eq!(
        float("1.5").binary(BinaryOp::Div, &zero, false),
        Err(FoldError::DivisionByZero)
    );
}

#[test]
fn test_remainder_on_floats_is_invalid() {
    let result = float("1.5").binary(BinaryOp::Rem, &ConstValue::int(1), false);
    assert!(matches!(result, Err(FoldError::InvalidOperation { .. })));
}

#[test]
fn test_mixed_int_and_float_arithmetic_is_exact() {
    let sum = ConstValue::int(1).binary(BinaryOp::Add, &float("0.5"), false);
    assert_eq!(sum, Ok(float("1.5")));
    let product = float("0.1").binary(BinaryOp::Mul, &ConstValue::int(10), false);
    assert_eq!(product, Ok(ConstValue::int(1)));
}

#[test]
fn test_comparisons_fold_to_bool() {
    let one = ConstValue::int(1);
    let half = float("0.5");
    assert_eq!(one.binary(BinaryOp::Gt, &half, false), Ok(true.into()));
    assert_eq!(one.binary(BinaryOp::Le, &half, false), Ok(false.into()));
    assert_eq!(
        ConstValue::Bool(true).binary(BinaryOp::Ne, &ConstValue::Bool(false), false),
        Ok(true.into())
    );
    assert!(ConstValue::Bool(true)
        .binary(BinaryOp::Lt, &ConstValue::Bool(false), false)
        .is_err());
}

#[test]
fn test_logical_operators() {
    let t = ConstValue::Bool(true);
    let f = ConstValue::Bool(false);
    assert_eq!(t.binary(BinaryOp::And, &f, false), Ok(false.into()));
    assert_eq!(t.binary(BinaryOp::Or, &f, false), Ok(true.into()));
    assert!(t.binary(BinaryOp::Add, &f, false).is_err());
}

#[test]
fn test_unary_folding() {
    assert_eq!(ConstValue::int(5).unary(UnaryOp::Neg), Some(ConstValue::int(-5)));
    assert_eq!(float("2.5").unary(UnaryOp::Neg).unwrap().to_string(), "-2.5");
    assert_eq!(ConstValue::Bool(true).unary(UnaryOp::Not), Some(false.into()));
    assert_eq!(ConstValue::int(1).unary(UnaryOp::Not), None);
    assert_eq!(ConstValue::Bool(true).unary(UnaryOp::Neg), None);
}

#[test]
fn test_serialize_as_strings() {
    assert_eq!(serde_json::to_string(&float("2.5")).unwrap(), r#""2.5""#);
    assert_eq!(serde_json::to_string(&ConstValue::Bool(true)).unwrap(), "true");
}
