use super::*;

#[test]
fn test_diagnostic_json() {
    let diag = Diagnostic::error(types::NOT_ASSIGNABLE)
        .message("cannot assign string to float64")
        .span(Span::at("test.ng", 1, 10, 10))
        .build();

    let json: serde_json::Value = serde_json::from_str(&diag.to_json()).unwrap();
    assert_eq!(json["code"], "E4001");
    assert_eq!(json["category"], "assignability");
    assert_eq!(json["severity"], "error");
    assert_eq!(json["span"]["end_col"], 20);
    assert!(json.get("notes").is_none());
}

#[test]
fn test_span_deserializes_missing_fields_as_unknown() {
    let span: Span = serde_json::from_str(r#"{"file": "a.ng"}"#).unwrap();
    assert_eq!(span.file, PathBuf::from("a.ng"));
    assert!(!span.is_known());
}

#[test]
fn test_diagnostic_warning() {
    let diag = Diagnostic::warning(warnings::UNUSED_VARIABLE)
        .message("Unused variable")
        .build();
    assert!(!diag.is_error());
    assert_eq!(diag.severity, Severity::Warning);
    assert_eq!(diag.category, Category::Lint);
}

#[test]
fn test_diagnostic_display_without_span() {
    let diag = Diagnostic::error(arity::RETURN_COUNT)
        .message("too few arguments to return")
        .build();
    assert_eq!(diag.to_string(), "error[E1002]: too few arguments to return");
}

#[test]
fn test_diagnostic_human_readable() {
    let diag = Diagnostic::error(types::NOT_ASSIGNABLE)
        .message("cannot assign integer to float")
        .span(Span::at("test.ng", 1, 1, 3))
        .note(Note::new("the left side was declared here"))
        .build();

    let output = diag.to_human_readable("x = y");
    insta::assert_snapshot!(output, @r"
    error[E4001]: cannot assign integer to float
      --> test.ng:1:1
       |
      1 | x = y
       | ^^^
       = note: the left side was declared here
    ");
}

#[test]
fn test_note_with_span_shows_position() {
    let diag = Diagnostic::error(types::MISMATCHED_OPERANDS)
        .message("mismatched types float32 and float64")
        .span(Span::at("test.ng", 2, 5, 1))
        .note(Note::new("left operand declared").with_span(Span::at("test.ng", 1, 1, 1)))
        .build();

    let output = diag.to_human_readable("a := float32(1)\nb := a + c");
    insta::assert_snapshot!(output, @r"
    error[E4003]: mismatched types float32 and float64
      --> test.ng:2:5
       |
      2 | b := a + c
       |     ^
       = note: left operand declared (1:1)
    ");
}

#[test]
fn test_source_line_out_of_range_is_skipped() {
    let diag = Diagnostic::error(undeclared::IDENTIFIER)
        .message("undeclared identifier: q")
        .span(Span::at("test.ng", 9, 1, 1))
        .build();
    assert_eq!(
        diag.to_human_readable("x := 1"),
        "error[E2001]: undeclared identifier: q\n  --> test.ng:9:1\n"
    );
}

#[test]
fn test_diagnostic_bag_operations() {
    let mut bag = DiagnosticBag::new();
    assert!(bag.is_empty());
    assert_eq!(bag.len(), 0);

    bag.push(
        Diagnostic::error(undeclared::IDENTIFIER)
            .message("undeclared identifier: x")
            .build(),
    );
    bag.push(
        Diagnostic::warning(warnings::UNUSED_VARIABLE)
            .message("warning")
            .build(),
    );

    assert!(!bag.is_empty());
    assert_eq!(bag.len(), 2);
    assert!(bag.has_errors());
    assert_eq!(bag.error_count(), 1);
    assert_eq!(bag.warning_count(), 1);
    assert_eq!(bag.codes(), vec!["E2001", "W0001"]);
}

#[test]
fn test_diagnostic_bag_json() {
    let mut bag = DiagnosticBag::new();
    bag.push(
        Diagnostic::error(imports::IMPORT_FAILED)
            .message("test error")
            .build(),
    );

    let json = bag.to_json();
    assert!(json.starts_with('['));
    assert_eq!(bag.render(""), "error[E6001]: test error\n");
    assert!(json.contains("E6001"));
    assert!(json.contains("test error"));
}

#[test]
fn test_category_of_codes() {
    assert_eq!(Category::of(arity::TABLE_WIDTH), Category::Arity);
    assert_eq!(Category::of(undeclared::TYPE), Category::Undeclared);
    assert_eq!(Category::of(kind::NOT_A_CLASS), Category::WrongKind);
    assert_eq!(Category::of(types::NOT_CONVERTIBLE), Category::Assignability);
    assert_eq!(Category::of(constants::OVERFLOW), Category::ConstantRange);
    assert_eq!(Category::of(imports::IMPORT_FAILED), Category::Import);
    assert_eq!(
        Category::of(unsupported::EXPONENTIATION),
        Category::Unsupported
    );
    assert_eq!(Category::of("X"), Category::Other);
}

#[test]
fn test_span_file_constructor() {
    let span = Span::file("test.ng");
    assert_eq!(span.file, PathBuf::from("test.ng"));
    assert!(span.is_known());
    assert!(!Span::default().is_known());
}
