//! Handler for the `numgrad explain` subcommand.

use super::CliError;

pub(crate) fn run_explain(code: &str) -> Result<(), CliError> {
    match get_error_explanation(code) {
        Some(text) => {
            println!("{}", text);
            Ok(())
        }
        None => {
            eprintln!("Valid codes:");
            eprintln!("  E01xx  Unreadable input (E0100-E0101)");
            eprintln!("  E1xxx  Arity errors (E1001-E1008)");
            eprintln!("  E2xxx  Undeclared names (E2001-E2003)");
            eprintln!("  E3xxx  Wrong kind of entity (E3001-E3007)");
            eprintln!("  E4xxx  Assignability errors (E4001-E4005)");
            eprintln!("  E5xxx  Constant range errors (E5001-E5003)");
            eprintln!("  E6xxx  Import errors (E6001)");
            eprintln!("  E9xxx  Unsupported constructs (E9001-E9008)");
            eprintln!("  W0xxx  Warnings (W0001)");
            Err(CliError::UnknownCode(code.to_string()))
        }
    }
}

/// Get a detailed explanation for a diagnostic code.
pub(super) fn get_error_explanation(code: &str) -> Option<String> {
    let explanation = match code {
        // Input
        "E0100" => {
            r#"E0100: Unreadable file

A program file given to `numgrad check` could not be read.

Fix: Check the path and its permissions.
"#
        }
        "E0101" => {
            r#"E0101: Malformed program tree

The file is not a JSON array of statements in the form the checker
expects. The diagnostic points at the line and column where decoding
stopped.

Fix: Regenerate the tree with the parser, or correct the JSON by hand.
"#
        }

        // Arity
        "E1001" => {
            r#"E1001: Assignment count mismatch

The two sides of an assignment have a different number of elements.

Example:
  a, b := 1, 2, 3

Fix: Give every variable exactly one value.
"#
        }
        "E1002" => {
            r#"E1002: Wrong number of return values

A return statement yields a different number of values than the
function declares.

Example:
  func f() (integer, integer) {
    return 1
  }

Fix: Return one value per declared result.
"#
        }
        "E1003" => {
            r#"E1003: Wrong number of arguments

A call passes a different number of arguments than the function takes.

Example:
  func add(x, y integer) integer { return x + y }
  add(1)

Fix: Pass one argument per parameter.
"#
        }
        "E1004" => {
            r#"E1004: Wrong number of composite literal elements

A class literal must list a value for every field, in order.

Example:
  class Point { x, y float64 }
  p := Point{1}

Fix: Supply all fields.
"#
        }
        "E1005" => {
            r#"E1005: Inconsistent table literal shape

Every row of a table literal must have the same length, and the column
names (when given) must match that width.

Example:
  t := [|]num{{"a", "b"}, {1, 2, 3}}

Fix: Make all rows as wide as the column list.
"#
        }
        "E1006" => {
            r#"E1006: Conversion takes one argument

A conversion such as `float64(x)` applies to exactly one value.

Example:
  y := float64(1, 2)

Fix: Convert one value at a time.
"#
        }
        "E1007" => {
            r#"E1007: Class member names and types differ in number

A class lists its field names beside its field types, and its method
names beside its method signatures. Each name needs exactly one type.
The class is treated as invalid.

Example:
  class C { a, b: [int64] }

Fix: Give every field and method a type.
"#
        }
        "E1008" => {
            r#"E1008: Parameter names and types differ in number

A function literal names each parameter of its signature once.

Example:
  f := func(x, y float64) float64 { ... }   // signature lists one parameter

Fix: Give every parameter a name and a type.
"#
        }

        // Undeclared
        "E2001" => {
            r#"E2001: Undeclared identifier

The name is not declared in any enclosing scope.

Example:
  y := x + 1   # x was never declared

Fix: Declare the variable with `:=` before using it.
"#
        }
        "E2002" => {
            r#"E2002: Undeclared type

A type annotation names a type that does not exist.

Example:
  func f(x widget) {}

Fix: Declare the class first or use a predeclared type.
"#
        }
        "E2003" => {
            r#"E2003: Unknown field, method or export

The selector names a member the class or package does not have.

Example:
  p := Point{1, 2}
  p.z

Fix: Use one of the declared fields, methods or exports.
"#
        }

        // Wrong kind
        "E3001" => {
            r#"E3001: Not a type

A name used in a type annotation refers to a variable.

Example:
  x := 1
  func f(y x) {}

Fix: Annotate with a type name.
"#
        }
        "E3002" => {
            r#"E3002: Not a class

A composite literal or selector needs a class (or package) but the
operand has some other type.

Example:
  p := integer{1}

Fix: Use a class type.
"#
        }
        "E3003" => {
            r#"E3003: Not a table type

A table literal was written with a type that is not a table.

Example:
  t := integer{{1}}

Fix: Annotate the literal with a `[|]T` type.
"#
        }
        "E3004" => {
            r#"E3004: Not callable

Only functions and type conversions can be called.

Example:
  x := 1
  x(2)
"#
        }
        "E3005" => {
            r#"E3005: Not a value

An expression without a value was used where one is needed, or the
left side of `=` is not a variable.

Example:
  func log() {}
  x := log()

Fix: Use an expression that produces a value.
"#
        }
        "E3006" => {
            r#"E3006: Non-name on left side of :=

Only plain identifiers can be declared with `:=`.

Example:
  p.x := 1

Fix: Use `=` to assign to an existing field.
"#
        }
        "E3007" => {
            r#"E3007: Return outside function

A return statement appears at the top level of the program.

Fix: Remove it or move it into a function body.
"#
        }

        // Assignability
        "E4001" => {
            r#"E4001: Not assignable

A value's type does not match the type it is being assigned to, and
Numgrad performs no implicit conversions between typed values.

Example:
  func f(x float64) {}
  n := int64(1)
  f(n)

Fix: Convert explicitly, e.g. `f(float64(n))`.
"#
        }
        "E4002" => {
            r#"E4002: Not convertible

Only numeric types convert to each other, and booleans to booleans.

Example:
  b := true
  x := float64(b)
"#
        }
        "E4003" => {
            r#"E4003: Mismatched operand types

Both operands of a binary operator must have the same type once
untyped constants are settled.

Example:
  x := int64(1)
  y := 2.5
  z := x + y   # int64 and float64

Fix: Convert one side.
"#
        }
        "E4004" => {
            r#"E4004: Invalid operation

The operator is not defined for the operand type: ordering on
booleans, `&&` on numbers, `%` on floats, arithmetic on booleans.

Example:
  ok := true < false
"#
        }
        "E4005" => {
            r#"E4005: Multiple values in single-value context

A call that returns several values was used where only one fits.

Example:
  return pair(), 3
"#
        }

        // Constant range
        "E5001" => {
            r#"E5001: Constant out of range

A constant does not fit the type it is given, or a fractional constant
was given an integer type.

Example:
  x := float32(1e100)
  y := int64(1.5)

Fix: Pick a wider type or an in-range value.
"#
        }
        "E5002" => {
            r#"E5002: Division by zero

The divisor is the constant zero.

Example:
  x := 1 / 0
"#
        }
        "E5003" => {
            r#"E5003: Malformed numeric literal

The text of an integer or floating-point literal could not be read as
a number.
"#
        }

        // Imports
        "E6001" => {
            r#"E6001: Foreign import failed

The foreign package could not be resolved. The checker only knows the
packages listed under `[foreign.packages]` in numgrad.toml.

Example:
  import "numpy" foreign

Fix: Add the package and its exports to the configuration.
"#
        }

        // Unsupported
        "E9001" => {
            r#"E9001: Multi-value destructuring

Assigning the results of a single multi-value call to several
variables is not supported yet.

Example:
  a, b := pair()
"#
        }
        "E9002" => {
            r#"E9002: Named fields in composite literals

Composite literals list field values positionally.

Example:
  p := Point{x: 1, y: 2}

Fix: Write `Point{1, 2}`.
"#
        }
        "E9003" => {
            r#"E9003: Qualified type names

Type annotations of the form `pkg.Name` are not supported.
"#
        }
        "E9004" => {
            r#"E9004: Native imports

Only foreign imports are checked; importing Numgrad packages is not
supported.
"#
        }
        "E9005" => {
            r#"E9005: Exponentiation

The `**` operator is not supported by the checker.
"#
        }
        "E9006" => {
            r#"E9006: Comparison of non-basic values

Comparisons are only typed for numbers, booleans and strings.
"#
        }
        "E9007" => {
            r#"E9007: Unary operator on unsupported type

`-` applies to numbers and `!` to booleans.

Example:
  x := -true
"#
        }
        "E9008" => {
            r#"E9008: Foreign export of unknown type

The package exports the name but its type is not known, so the
selector cannot be typed.

Fix: Give the export a type under `types` in numgrad.toml.
"#
        }

        // Warnings
        "W0001" => {
            r#"W0001: Unused variable

A variable declared with `:=` is never read. Enabled with
`unused_variables = true` under `[lint]`.

Example:
  func f() {
    x := 1
  }

Fix: Remove it, or prefix the name with `_`.
"#
        }
        _ => return None,
    };
    Some(explanation.to_string())
}
