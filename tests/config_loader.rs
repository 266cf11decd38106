mod common;

use std::fs;
use std::path::Path;

use chain_options::config::{ConfigError, OptionDefinition, OptionFile};
use chain_options::{
    ChainOptions, InvalidPolicy, MethodTable, OptionError, OptionHost, OptionValue,
};
use tempfile::TempDir;

const NUMBERS_TOML: &str = r#"
[[option]]
name = "numbers"
default = 666
validate = "no_number_5"
invalid = "default"

[[option]]
name = "evens"
filter = "even_numbers"

[[option]]
name = "duck"
default = "waddle waddle"
transform = "to_s"

[[option]]
name = "books"
incremental = true
default = [["Momo"]]
"#;

fn parse(content: &str) -> Result<OptionFile, ConfigError> {
    OptionFile::parse(content, Path::new("inline.toml"))
}

/// Test that a definition file loads from disk.
#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("options.toml");
    fs::write(&path, NUMBERS_TOML).expect("Failed to write options file");

    let file = OptionFile::load_from(&path).expect("Should load valid file");
    assert_eq!(file.options.len(), 4);
    assert_eq!(file.options[0].name, "numbers");
    assert_eq!(file.options[3].incremental, true);
}

/// Test that a missing file produces a read error naming the path.
#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("missing.toml");

    match OptionFile::load_from(&path).unwrap_err() {
        ConfigError::ReadError { path: p, .. } => assert_eq!(p, path),
        other => panic!("Expected ReadError, got {:?}", other),
    }
}

/// Test that definitions default to the raise policy and no hooks.
#[test]
fn test_definition_defaults() {
    let file = parse("[[option]]\nname = \"plain\"\n").unwrap();
    let def = &file.options[0];

    assert_eq!(def.invalid, "raise");
    assert!(def.default.is_none());
    assert!(!def.incremental);
    assert!(!def.allow_block);
    assert_eq!(
        def.to_config().unwrap().invalid_policy(),
        InvalidPolicy::Raise
    );
}

/// Test that unknown keys are rejected instead of ignored.
#[test]
fn test_unknown_keys_rejected() {
    let result = parse("[[option]]\nname = \"plain\"\nvalidator = \"x\"\n");

    match result.unwrap_err() {
        ConfigError::ParseError { source, .. } => {
            assert!(source.to_string().contains("validator"));
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

/// Test that invalid TOML produces a parse error.
#[test]
fn test_parse_invalid_toml() {
    assert!(matches!(
        parse("this is not valid toml [[["),
        Err(ConfigError::ParseError { .. })
    ));
}

/// Test validation of the invalid-value policy.
#[test]
fn test_invalid_policy_must_be_known() {
    let result = parse("[[option]]\nname = \"plain\"\ninvalid = \"ignore\"\n");

    match result.unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("plain"));
            assert!(message.contains("ignore"));
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

/// Test validation rejects duplicate names.
#[test]
fn test_duplicate_names_rejected() {
    let result = parse("[[option]]\nname = \"a\"\n\n[[option]]\nname = \"a\"\n");

    match result.unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("more than once"));
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

/// Test validation rejects table defaults.
#[test]
fn test_table_default_rejected() {
    let result = parse("[[option]]\nname = \"a\"\ndefault = { x = 1 }\n");
    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

/// Test that a loaded registry behaves like one defined in code.
#[test]
fn test_build_registry_behaviour() {
    let file = parse(NUMBERS_TOML).unwrap();
    let registry = file.build_registry(common::test_methods()).unwrap();
    let host = OptionHost::new(registry);

    assert_eq!(host.get_option("numbers").unwrap(), OptionValue::Int(666));
    assert_eq!(
        host.set_option("numbers", 5).unwrap().get_option("numbers").unwrap(),
        OptionValue::Int(666)
    );
    assert_eq!(
        host.with_option("evens", chain_options::OptionCall::args([1, 2, 3, 4]))
            .unwrap()
            .get_option("evens")
            .unwrap(),
        common::ints([2, 4])
    );
    assert_eq!(
        host.set_option("duck", 42).unwrap().get_option("duck").unwrap(),
        OptionValue::from("42")
    );
    assert_eq!(
        host.get_option("books").unwrap(),
        OptionValue::list([OptionValue::list(["Momo"])])
    );
}

/// Test that unresolvable method names surface as registration errors.
#[test]
fn test_unknown_method_fails_registration() {
    let file = parse(NUMBERS_TOML).unwrap();

    match file.build_registry(MethodTable::new()).unwrap_err() {
        ConfigError::Registration(OptionError::UnknownMethod { option, kind, method }) => {
            assert_eq!(option, "numbers");
            assert_eq!(kind, "validate");
            assert_eq!(method, "no_number_5");
        }
        other => panic!("Expected Registration error, got {:?}", other),
    }
}

/// Test that registration errors keep the cause as their source.
#[test]
fn test_registration_error_source() {
    use std::error::Error;

    let file = parse("[[option]]\nname = \"numbers\"\nvalidate = \"no_number_5\"\n").unwrap();
    let err = file.build_registry(MethodTable::new()).unwrap_err();

    assert_eq!(err.to_string(), "Option registration failed");
    let source = err.source().expect("Registration error should have a source");
    assert!(source.to_string().contains("no_number_5"));
}

/// Test that builtin predicates resolve without a custom method table.
#[test]
fn test_builtin_predicates_resolve() {
    let file = parse("[[option]]\nname = \"evens\"\nfilter = \"even\"\n").unwrap();
    let host = OptionHost::new(file.build_registry(MethodTable::new()).unwrap());

    assert_eq!(
        host.with_option("evens", chain_options::OptionCall::args([1, 2, 3, 4]))
            .unwrap()
            .get_option("evens")
            .unwrap(),
        common::ints([2, 4])
    );
}

/// Test that incompatible flags warn but still register.
#[test]
fn test_incompatible_flags_warn() {
    let mut def = OptionDefinition::named("books");
    def.incremental = true;
    def.invalid = "default".to_string();
    def.transform = Some("to_s".to_string());
    let file = OptionFile {
        options: vec![def],
    };

    let registry = file.build_registry(MethodTable::new()).unwrap();
    assert!(registry.contains("books"));
    assert_eq!(registry.warnings().len(), 2);
}

/// Test round-trip serialization/deserialization.
#[test]
fn test_definition_roundtrip() {
    let original = parse(NUMBERS_TOML).unwrap();
    let serialized = toml::to_string(&original).expect("Should serialize");
    let deserialized = parse(&serialized).expect("Should deserialize");

    assert_eq!(original.options.len(), deserialized.options.len());
    assert_eq!(original.options[0].name, deserialized.options[0].name);
    assert_eq!(original.options[0].default, deserialized.options[0].default);
}
