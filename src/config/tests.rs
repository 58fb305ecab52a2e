use super::*;
use crate::typechecker::ForeignResolver;
use std::io::Write;

#[test]
fn test_parse_empty_config() {
    let config = Config::parse("").unwrap();
    assert!(!config.lint.unused_variables);
    assert!(config.foreign.packages.is_empty());
    assert!(config.resolver().is_empty());
}

#[test]
fn test_parse_full_config() {
    let content = r#"
[lint]
unused_variables = true

[foreign.packages."math"]
exports = ["Sqrt"]

[foreign.packages."github.com/x/stats"]
name = "st"
exports = ["Mean"]

[foreign.packages."github.com/x/stats".types]
Pi = { kind = "basic", basic = "float64" }
"#;

    let config = Config::parse(content).unwrap();
    assert!(config.lint.unused_variables);
    assert_eq!(config.foreign.packages.len(), 2);

    let resolver = config.resolver();
    let math = resolver.resolve("math").unwrap();
    assert_eq!(math.name, "math");
    assert_eq!(math.exports.get("Sqrt"), Some(&None));

    let stats = resolver.resolve("github.com/x/stats").unwrap();
    assert_eq!(stats.name, "st");
    assert_eq!(stats.exports.get("Pi"), Some(&Some(Type::FLOAT64)));
    assert_eq!(stats.exports.get("Mean"), Some(&None));
}

#[test]
fn test_default_package_name_is_last_segment() {
    let content = r#"
[foreign.packages."encoding/json"]
exports = ["Marshal"]
"#;
    let resolver = Config::parse(content).unwrap().resolver();
    assert_eq!(resolver.resolve("encoding/json").unwrap().name, "json");
}

#[test]
fn test_parse_error() {
    let err = Config::parse("[lint\nunused_variables = 1").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("invalid configuration"));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[lint]\nunused_variables = true").unwrap();

    let config = Config::load(&path).unwrap();
    assert!(config.lint.unused_variables);

    let discovered = Config::discover(None, dir.path()).unwrap();
    assert!(discovered.lint.unused_variables);
}

#[test]
fn test_discover_without_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::discover(None, dir.path()).unwrap();
    assert!(!config.lint.unused_variables);
}

#[test]
fn test_load_missing_file() {
    let err = Config::load(Path::new("/nonexistent/numgrad.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
