//! End-to-end checks through the public API: program trees in, types and
//! diagnostics out

use numgrad::prelude::*;
use numgrad::syntax::parse_program;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::path::Path;

fn check(stmts: &[Stmt]) -> Checker {
    check_program(stmts, &Config::default())
}

fn span(line: usize, start_col: usize, end_col: usize) -> serde_json::Value {
    serde_json::json!({
        "file": "prog.ng",
        "start": 0,
        "end": 0,
        "start_line": line,
        "start_col": start_col,
        "end_line": line,
        "end_col": end_col,
    })
}

fn int_lit(text: &str) -> serde_json::Value {
    serde_json::json!({"type": "BasicLit", "value": {"kind": "int", "value": text}})
}

/// a, b := 1, 2, 3
/// x := float64(1)
/// y := z + x
fn broken_program() -> Vec<Stmt> {
    let tree = serde_json::json!([
        {
            "type": "Assign",
            "span": span(1, 1, 16),
            "decl": true,
            "left": [{"type": "Ident", "name": "a"}, {"type": "Ident", "name": "b"}],
            "right": [int_lit("1"), int_lit("2"), int_lit("3")],
        },
        {
            "type": "Assign",
            "decl": true,
            "left": [{"type": "Ident", "name": "x"}],
            "right": [{
                "type": "Call",
                "func": {"type": "Ident", "name": "float64"},
                "args": [int_lit("1")],
            }],
        },
        {
            "type": "Assign",
            "decl": true,
            "left": [{"type": "Ident", "name": "y"}],
            "right": [{
                "type": "Binary",
                "op": "Add",
                "left": {"type": "Ident", "name": "z", "span": span(3, 6, 7)},
                "right": {"type": "Ident", "name": "x"},
            }],
        },
    ]);
    parse_program(&tree.to_string(), Path::new("prog.ng")).unwrap()
}

const BROKEN_SOURCE: &str = "a, b := 1, 2, 3\nx := float64(1)\ny := z + x\n";

#[test]
fn test_human_readable_report() {
    let checker = check(&broken_program());
    let text = checker.diagnostics().render(BROKEN_SOURCE);
    insta::assert_snapshot!(text.trim_end(), @r###"
    error[E1001]: assignment mismatch: 2 variables but 3 values
      --> prog.ng:1:1
       |
      1 | a, b := 1, 2, 3
       | ^^^^^^^^^^^^^^^

    error[E2001]: undeclared identifier: z
      --> prog.ng:3:6
       |
      3 | y := z + x
       |      ^
    "###);
}

#[test]
fn test_json_report() {
    let checker = check(&broken_program());
    let json: serde_json::Value =
        serde_json::from_str(&checker.diagnostics().to_json()).unwrap();
    let codes: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["E1001", "E2001"]);
    assert_eq!(json[1]["span"]["start_col"], 6);
}

#[test]
fn test_invalid_names_do_not_cascade() {
    let checker = check(&broken_program());
    assert_eq!(checker.lookup("a").unwrap().ty, Type::Invalid);
    assert_eq!(checker.lookup("y").unwrap().ty, Type::Invalid);
    assert_eq!(checker.lookup("x").unwrap().ty, Type::FLOAT64);
    assert_eq!(checker.diagnostics().len(), 2);
}

#[test]
fn test_constant_expression_takes_context_type() {
    // x := float32(1) + 2 * 3
    let product = Expr::binary(BinaryOp::Mul, Expr::int("2"), Expr::int("3"));
    let product_id = product.id();
    let sum = Expr::binary(
        BinaryOp::Add,
        Expr::call(Expr::ident("float32"), vec![Expr::int("1")]),
        product,
    );
    let sum_id = sum.id();
    let checker = check(&[Stmt::define(&["x"], vec![sum])]);

    assert!(checker.diagnostics().is_empty());
    assert_eq!(checker.type_of(product_id), Some(&Type::FLOAT32));
    assert_eq!(checker.value_of(product_id), Some(&ConstValue::int(6)));
    assert_eq!(checker.type_of(sum_id), Some(&Type::FLOAT32));
    assert_eq!(checker.value_of(sum_id), Some(&ConstValue::int(7)));
}

#[test]
fn test_class_method_and_field_access() {
    let class = ClassType {
        field_names: vec!["w".into()],
        fields: vec![Type::named("float64")],
        method_names: vec!["scale".into()],
        methods: vec![Type::func(vec![Type::named("float64")], vec![Type::named("float64")])],
        num_generic: false,
    };
    let scale = FuncLit::new(
        vec![("k", Type::named("float64"))],
        vec![Type::named("float64")],
        vec![Stmt::ret(vec![Expr::binary(
            BinaryOp::Mul,
            Expr::selector(Expr::ident("m"), "w"),
            Expr::ident("k"),
        )])],
    )
    .named("scale")
    .with_receiver("m");

    let call = Expr::call(
        Expr::selector(Expr::ident("model"), "scale"),
        vec![Expr::float("0.5")],
    );
    let call_id = call.id();
    let checker = check(&[
        Stmt::class("Model", class, vec![scale]),
        Stmt::define(
            &["model"],
            vec![Expr::comp_lit(Type::named("Model"), vec![Expr::int("2")])],
        ),
        Stmt::define(&["out"], vec![call]),
    ]);

    assert_eq!(checker.diagnostics().codes(), Vec::<&str>::new());
    assert_eq!(checker.type_of(call_id), Some(&Type::FLOAT64));
    assert_eq!(checker.lookup("out").unwrap().ty, Type::FLOAT64);
}

#[test]
fn test_foreign_import_from_config() {
    let config = Config::parse(
        r#"
[foreign.packages."gonum/stat"]
exports = ["Mean"]

[foreign.packages."gonum/stat".types]
Tolerance = { kind = "basic", basic = "float64" }
"#,
    )
    .unwrap();

    let known = Expr::selector(Expr::ident("stat"), "Tolerance");
    let known_id = known.id();
    let program = vec![
        Stmt::import("gonum/stat", None, true),
        Stmt::define(&["tol"], vec![known]),
        Stmt::define(&["m"], vec![Expr::selector(Expr::ident("stat"), "Mean")]),
        Stmt::define(&["v"], vec![Expr::selector(Expr::ident("stat"), "Variance")]),
    ];
    let checker = check_program(&program, &config);

    assert_eq!(checker.type_of(known_id), Some(&Type::FLOAT64));
    assert_eq!(checker.diagnostics().codes(), vec!["E9008", "E2003"]);
}

#[test]
fn test_unknown_foreign_package() {
    let checker = check(&[
        Stmt::import("numpy", Some("np"), true),
        Stmt::expr(Expr::selector(Expr::ident("np"), "zeros")),
    ]);
    assert_eq!(checker.diagnostics().codes(), vec!["E6001"]);
}

#[test]
fn test_table_literal() {
    let table = Expr::table_lit(
        Type::table(Type::named("float64")),
        vec![Expr::string("a"), Expr::string("b")],
        vec![
            vec![Expr::int("1"), Expr::float("2.5")],
            vec![Expr::int("3"), Expr::int("4")],
        ],
    );
    let id = table.id();
    let checker = check(&[Stmt::define(&["t"], vec![table])]);
    assert!(checker.diagnostics().is_empty());
    assert_eq!(checker.type_of(id), Some(&Type::table(Type::FLOAT64)));
}

#[test]
fn test_unused_variable_lint() {
    let mut config = Config::default();
    config.lint.unused_variables = true;
    let body = vec![
        Stmt::define(&["used"], vec![Expr::int("1")]),
        Stmt::define(&["unused"], vec![Expr::int("2")]),
        Stmt::define(&["_skipped"], vec![Expr::int("3")]),
        Stmt::ret(vec![Expr::ident("used")]),
    ];
    let program = vec![Stmt::expr(Expr::func(
        FuncLit::new(vec![], vec![Type::named("num")], body).named("f"),
    ))];
    let checker = check_program(&program, &config);
    let bag = checker.diagnostics();
    assert_eq!(bag.codes(), vec!["W0001"]);
    assert_eq!(bag.warning_count(), 1);
    assert!(!bag.has_errors());
    assert!(bag.diagnostics()[0].message.contains("unused"));
}

proptest! {
    #[test]
    fn untyped_integer_adopts_float_operand(n in 0u64..1_000_000_000) {
        let lit = Expr::int(n.to_string());
        let lit_id = lit.id();
        let program = vec![
            Stmt::define(&["x"], vec![Expr::call(Expr::ident("float64"), vec![Expr::float("0.5")])]),
            Stmt::define(&["y"], vec![Expr::binary(BinaryOp::Add, lit, Expr::ident("x"))]),
        ];
        let checker = check(&program);
        prop_assert!(checker.diagnostics().is_empty());
        prop_assert_eq!(checker.type_of(lit_id), Some(&Type::FLOAT64));
        prop_assert_eq!(checker.lookup("y").unwrap().ty.clone(), Type::FLOAT64);
    }

    #[test]
    fn untyped_integer_division_truncates(a in 0i64..1_000_000, b in 1i64..1_000) {
        let quotient = Expr::binary(BinaryOp::Div, Expr::int(a.to_string()), Expr::int(b.to_string()));
        let id = quotient.id();
        let checker = check(&[Stmt::define(&["q"], vec![quotient])]);
        prop_assert!(checker.diagnostics().is_empty());
        prop_assert_eq!(checker.value_of(id), Some(&ConstValue::int(a / b)));
    }

    #[test]
    fn division_by_constant_zero_is_reported(a in 0i64..1_000_000) {
        let quotient = Expr::binary(BinaryOp::Div, Expr::int(a.to_string()), Expr::int("0"));
        let checker = check(&[Stmt::define(&["q"], vec![quotient])]);
        prop_assert_eq!(checker.diagnostics().codes(), vec!["E5002"]);
    }
}
