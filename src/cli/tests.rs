use super::check_cmd::{check_file, render_types};
use super::explain_cmd::get_error_explanation;
use super::*;
use crate::config::Config;
use crate::diagnostics::error_codes::{
    arity, constants, imports, input, kind, types, undeclared, unsupported, warnings,
};
use clap::CommandFactory;
use std::io::Write;

const PROGRAM: &str = r#"[
    {"type": "Assign", "decl": true,
     "left": [{"type": "Ident", "name": "x"}],
     "right": [{"type": "BasicLit", "value": {"kind": "int", "value": "1"}}]},
    {"type": "Simple", "expr": {"type": "Ident", "name": "y"}}
]"#;

fn program_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_check_flags() {
    let cli = Cli::try_parse_from([
        "numgrad",
        "check",
        "a.json",
        "b.json",
        "--strict",
        "--dump-types",
        "--config",
        "custom.toml",
        "--json",
    ])
    .unwrap();
    assert!(cli.json);
    match cli.command {
        Command::Check {
            paths,
            config,
            sources,
            strict,
            dump_types,
        } => {
            assert_eq!(paths.len(), 2);
            assert_eq!(config, Some(PathBuf::from("custom.toml")));
            assert!(sources.is_empty());
            assert!(strict);
            assert!(dump_types);
        }
        other => panic!("expected check, got {:?}", other),
    }
}

#[test]
fn test_check_requires_a_path() {
    assert!(Cli::try_parse_from(["numgrad", "check"]).is_err());
}

#[test]
fn test_every_code_has_an_explanation() {
    let codes = [
        input::UNREADABLE_FILE,
        input::MALFORMED_TREE,
        arity::ASSIGNMENT_COUNT,
        arity::RETURN_COUNT,
        arity::ARGUMENT_COUNT,
        arity::ELEMENT_COUNT,
        arity::TABLE_WIDTH,
        arity::CONVERSION_ARGUMENTS,
        arity::MEMBER_TYPES,
        arity::PARAMETER_NAMES,
        undeclared::IDENTIFIER,
        undeclared::TYPE,
        undeclared::MEMBER,
        kind::NOT_A_TYPE,
        kind::NOT_A_CLASS,
        kind::NOT_A_TABLE,
        kind::NOT_CALLABLE,
        kind::NOT_A_VALUE,
        kind::NON_NAME_DECLARATION,
        kind::RETURN_OUTSIDE_FUNCTION,
        types::NOT_ASSIGNABLE,
        types::NOT_CONVERTIBLE,
        types::MISMATCHED_OPERANDS,
        types::INVALID_OPERATION,
        types::MULTI_VALUE_CONTEXT,
        constants::OVERFLOW,
        constants::DIVISION_BY_ZERO,
        constants::MALFORMED_LITERAL,
        imports::IMPORT_FAILED,
        unsupported::MULTI_VALUE_DESTRUCTURING,
        unsupported::NAMED_FIELD_LITERAL,
        unsupported::QUALIFIED_TYPE,
        unsupported::NATIVE_IMPORT,
        unsupported::EXPONENTIATION,
        unsupported::COMPARISON_TYPING,
        unsupported::UNARY_TYPING,
        unsupported::FOREIGN_EXPORT_TYPE,
        warnings::UNUSED_VARIABLE,
    ];
    for code in codes {
        let text = get_error_explanation(code)
            .unwrap_or_else(|| panic!("no explanation for {}", code));
        assert!(text.starts_with(code), "{} explanation starts with {}", code, text);
    }
}

#[test]
fn test_unknown_code() {
    assert!(get_error_explanation("E7777").is_none());
    let err = explain_cmd::run_explain("E7777").unwrap_err();
    assert!(matches!(err, CliError::UnknownCode(ref c) if c == "E7777"));
}

#[test]
fn test_summary_failure() {
    let clean = CheckSummary {
        files: 1,
        errors: 0,
        warnings: 2,
    };
    assert!(!clean.failed(false));
    assert!(clean.failed(true));

    let broken = CheckSummary {
        files: 1,
        errors: 1,
        warnings: 0,
    };
    assert!(broken.failed(false));
}

#[test]
fn test_check_file_reports_diagnostics() {
    let file = program_file(PROGRAM);
    let report = check_file(file.path(), &Config::default());
    assert_eq!(report.diagnostics.codes(), vec![undeclared::IDENTIFIER]);
    assert!(report
        .types
        .iter()
        .any(|(_, ty, _)| ty.to_string() == "num"));
}

#[test]
fn test_check_file_missing() {
    let report = check_file(std::path::Path::new("/nonexistent/prog.json"), &Config::default());
    assert_eq!(report.diagnostics.codes(), vec![input::UNREADABLE_FILE]);
    assert!(report.types.is_empty());
}

#[test]
fn test_check_file_malformed() {
    let file = program_file("[{\"type\": \"Nonsense\"}]");
    let report = check_file(file.path(), &Config::default());
    assert_eq!(report.diagnostics.codes(), vec![input::MALFORMED_TREE]);
}

#[test]
fn test_render_types() {
    let file = program_file(PROGRAM);
    let report = check_file(file.path(), &Config::default());

    let text = render_types(file.path(), &report, false);
    assert!(text.contains("num = 1"), "{}", text);

    let json: serde_json::Value =
        serde_json::from_str(&render_types(file.path(), &report, true)).unwrap();
    let entries = json["types"].as_array().unwrap();
    assert!(entries
        .iter()
        .any(|e| e["type"] == "num" && e["value"] == "1"));
}

#[test]
fn test_run_check_counts() {
    let file = program_file(PROGRAM);
    let options = CheckOptions {
        config: Some(file.path().with_extension("missing.toml")),
        ..CheckOptions::default()
    };
    // An explicit configuration path must exist
    let err = check_cmd::run_check(&[file.path().to_path_buf()], &options).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));

    let summary = check_cmd::run_check(
        &[file.path().to_path_buf()],
        &CheckOptions {
            json: true,
            ..CheckOptions::default()
        },
    )
    .unwrap();
    assert_eq!(
        summary,
        CheckSummary {
            files: 1,
            errors: 1,
            warnings: 0,
        }
    );
}

#[test]
fn test_parse_one_source_per_file() {
    let cli = Cli::try_parse_from([
        "numgrad", "check", "a.json", "b.json", "--source", "a.ng", "--source", "b.ng",
    ])
    .unwrap();
    let Command::Check { sources, .. } = cli.command else {
        panic!("expected check");
    };
    assert_eq!(sources, vec![PathBuf::from("a.ng"), PathBuf::from("b.ng")]);
}

#[test]
fn test_run_check_source_count_must_match() {
    let first = program_file(PROGRAM);
    let second = program_file(PROGRAM);
    let source = program_file("x := 1\ny\n");
    let paths = [first.path().to_path_buf(), second.path().to_path_buf()];

    let err = check_cmd::run_check(
        &paths,
        &CheckOptions {
            sources: vec![source.path().to_path_buf()],
            ..CheckOptions::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, CliError::SourceCount { sources: 1, files: 2 }));

    let summary = check_cmd::run_check(
        &paths,
        &CheckOptions {
            sources: vec![source.path().to_path_buf(), source.path().to_path_buf()],
            ..CheckOptions::default()
        },
    )
    .unwrap();
    assert_eq!(summary.files, 2);
    assert_eq!(summary.errors, 2);
}
