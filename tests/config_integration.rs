//! Integration tests for configuration parsing and handling.
//!
//! These tests verify that `erdgen.toml` settings reach the compiler.

use erdgen::schema::config::{CONFIG_FILE_NAME, ServiceDefinition};
use erdgen::schema::{Compiler, FieldType, OutputFormat, SchemaConfig, SchemaError};
use std::fs;
use tempfile::TempDir;

/// Test that an empty file yields the defaults
#[test]
fn test_config_minimal() {
    let config = SchemaConfig::from_str("").expect("Failed to parse config");
    assert_eq!(config.schema.path, "schema.mmd");
    assert_eq!(config.schema.format, OutputFormat::Yaml);
    assert_eq!(config.compiler.identity_key, "_id");
    assert_eq!(config.compiler.reference_type, "ObjectId");
}

/// Test full configuration with all options
#[test]
fn test_config_full() {
    let config = SchemaConfig::from_str(
        r#"
        [schema]
        path = "model/erd.mmd"
        output = "build/schema.json"
        format = "json"

        [compiler]
        identity_key = "key"
        reference_type = "String"

        [services.auth]
        required_fields = ["email", "password"]

        [services.billing]
    "#,
    )
    .expect("Failed to parse config");

    assert_eq!(config.schema.format, OutputFormat::Json);
    assert_eq!(config.services.len(), 2);
    assert_eq!(config.services["billing"], ServiceDefinition::default());

    let options = config.compiler_options();
    assert_eq!(options.identity_key, "key");
    assert_eq!(options.reference_type, FieldType::String);
}

/// Test loading from disk
#[test]
fn test_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[schema]\nformat = \"json\"\n").unwrap();

    let config = SchemaConfig::from_file(&path).unwrap();
    assert_eq!(config.schema.format, OutputFormat::Json);

    let missing = SchemaConfig::from_file(dir.path().join("missing.toml"));
    assert!(matches!(missing, Err(SchemaError::IoError { .. })));
}

/// Test that typos are reported instead of ignored
#[test]
fn test_config_rejects_unknown_keys() {
    let result = SchemaConfig::from_str("[schema]\nouptut = \"x.yaml\"\n");
    assert!(matches!(result, Err(SchemaError::TomlError { .. })));

    let result = SchemaConfig::from_str("[schema]\nformat = \"xml\"\n");
    assert!(matches!(result, Err(SchemaError::TomlError { .. })));
}

/// Test that the service registry is enforced on object payloads
#[test]
fn test_service_registry_enforced() {
    let config = SchemaConfig::from_str(
        r#"
        [services.auth]
        required_fields = ["email", "password"]
    "#,
    )
    .unwrap();
    let compiler = Compiler::new(config.compiler_options());

    let complete = compiler.compile(
        "User {\n String email\n %% @service { auth: { fields: ['email', 'password'] } }\n}\n",
    );
    assert!(complete.is_ok());

    let incomplete = compiler
        .compile("User {\n String email\n %% @service { auth: { fields: ['email'] } }\n}\n");
    match incomplete {
        Err(SchemaError::ServiceRequirement {
            entity,
            service,
            field,
        }) => {
            assert_eq!(entity, "User");
            assert_eq!(service, "auth");
            assert_eq!(field, "password");
        }
        other => panic!("Expected ServiceRequirement, got {:?}", other),
    }

    // A bare service name is not checked against the registry.
    let bare = compiler.compile("User {\n String email\n %% @service auth\n}\n");
    assert!(bare.is_ok());
}

/// Test that the identity key from the config renames `id` fields
#[test]
fn test_identity_key_applied() {
    let config = SchemaConfig::from_str("[compiler]\nidentity_key = \"pk\"\n").unwrap();
    let compilation = Compiler::new(config.compiler_options())
        .compile("User {\n ObjectId Id\n String name %% @unique\n}\n")
        .unwrap();

    let user = compilation.document.get_entity("User").unwrap();
    assert!(user.get_field("pk").is_some());
    assert!(user.get_field("Id").is_none());
}
