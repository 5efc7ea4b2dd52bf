//! Integration tests for schema compilation.
//!
//! These tests drive the compiler through the facade crate with complete
//! diagrams and check the canonical document it produces.

use erdgen::schema::emit::{from_yaml, to_json, to_yaml};
use erdgen::schema::{
    Compiler, CompilerOptions, FieldType, MetadataIndex, Relationship, SchemaError, WarningKind,
    compile_schema, compile_schema_file, validate_schema,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/schema.mmd")
}

/// A single undecorated field produces a single bare entity
#[test]
fn test_single_entity_single_field() {
    let doc = compile_schema("erDiagram\n    Note {\n        String body\n    }\n").unwrap();

    assert_eq!(doc.entities.len(), 1);
    let note = doc.get_entity("Note").unwrap();
    assert_eq!(note.fields.len(), 1);
    assert_eq!(
        note.get_field("body").unwrap().field_type,
        Some(FieldType::String)
    );
    assert!(note.unique.is_empty());
    assert!(doc.relationships.is_empty());
}

/// Compiling the same input twice gives the same document and bytes
#[test]
fn test_compilation_is_deterministic() {
    let first = compile_schema_file(fixture()).unwrap();
    let second = compile_schema_file(fixture()).unwrap();

    assert_eq!(first, second);
    assert_eq!(to_yaml(&first).unwrap(), to_yaml(&second).unwrap());
    assert_eq!(to_json(&first).unwrap(), to_json(&second).unwrap());
}

/// Fields copied by `@include` get descending negative ordering tokens
#[test]
fn test_include_copies_abstract_fields() {
    let doc = compile_schema(
        r#"
A {
    String f1
    %% @abstract
}
B {
    %% @include A
}
"#,
    )
    .unwrap();

    let b = doc.get_entity("B").unwrap();
    assert_eq!(b.get_field("f1").unwrap().display_after_field(), Some("-1"));
    assert_eq!(b.include, vec!["A"]);
    assert!(doc.included_entities.contains("A"));
    assert!(!doc.included_entities.contains("B"));
}

/// Field level and entity level unique constraints
#[test]
fn test_unique_groups() {
    let doc = compile_schema(
        r#"
User {
    String firstName
    String lastName
    String email %% @unique
    %% @unique firstName + lastName
}
"#,
    )
    .unwrap();

    let user = doc.get_entity("User").unwrap();
    assert_eq!(
        user.unique,
        vec![vec!["email"], vec!["firstName", "lastName"]]
    );
}

/// A relationship line injects a required foreign key into the target
#[test]
fn test_relationship_injects_foreign_key() {
    let doc = compile_schema(
        r#"
erDiagram
    User ||--o{ Account: ""
    User {
        String email
    }
    Account {
        String name
    }
"#,
    )
    .unwrap();

    assert_eq!(doc.relationships, vec![Relationship::new("User", "Account")]);
    let user_id = doc.get_entity("Account").unwrap().get_field("userId").unwrap();
    assert_eq!(user_id.field_type, Some(FieldType::ObjectId));
    assert!(user_id.is_required());
    assert!(user_id.is_read_only());
    assert_eq!(doc.get_entity("User").unwrap().relationships, vec!["Account"]);
}

/// An unterminated `@validate` payload aborts with the offending text
#[test]
fn test_malformed_validate_aborts() {
    let result = compile_schema(
        r#"
User {
    String email %% @validate { required: true
}
"#,
    );

    match result {
        Err(err @ SchemaError::MalformedPayload { .. }) => {
            assert!(err.is_fatal());
            assert!(err.to_string().contains("{ required: true"));
        }
        other => panic!("Expected MalformedPayload, got {:?}", other),
    }
}

/// Dictionary references are kept as written
#[test]
fn test_dictionary_reference_preserved() {
    let doc = compile_schema_file(fixture()).unwrap();

    let email = doc.get_entity("User").unwrap().get_field("email").unwrap();
    assert_eq!(
        email.attribute("pattern").unwrap()["regex"],
        "dictionary=Patterns.email"
    );
    assert_eq!(
        doc.resolve_dictionary_ref("dictionary=Patterns.email"),
        Some(r"^[^@]+@[^@]+\.[^@]+$")
    );
}

/// Entities keep declaration order even when a relationship names them first
#[test]
fn test_entity_order_follows_declaration() {
    let doc = compile_schema(
        r#"erDiagram
    User ||--o{ Account: ""
    User {
        String email
    }
    Account {
        String name
    }
"#,
    )
    .unwrap();

    let names: Vec<_> = doc.entities.keys().map(|k| k.as_str()).collect();
    assert_eq!(names, vec!["User", "Account"]);
    assert!(doc.get_entity("Account").unwrap().get_field("userId").is_some());
}

/// An abstraction's relationship lines are inherited by entities including it
#[test]
fn test_include_inherits_relationships() {
    let doc = compile_schema(
        r#"erDiagram
    Owned ||--o{ Tag: ""
    Owned {
        String note
        %% @abstract
    }
    Post {
        %% @include Owned
    }
    Tag {
    }
"#,
    )
    .unwrap();

    for name in ["Owned", "Post"] {
        let targets: Vec<_> = doc
            .get_entity(name)
            .unwrap()
            .relationships
            .iter()
            .map(|t| t.as_str())
            .collect();
        assert_eq!(targets, vec!["Tag"], "{}", name);
    }
}

/// Each `@include` directive numbers its copies from -1
#[test]
fn test_separate_includes_restart_ordering_tokens() {
    let doc = compile_schema(
        r#"
A {
    String a1
    %% @abstract
}
C {
    String c1
    %% @abstract
}
B {
    %% @include A
    %% @include C
}
"#,
    )
    .unwrap();

    let b = doc.get_entity("B").unwrap();
    assert_eq!(b.get_field("a1").unwrap().display_after_field(), Some("-1"));
    assert_eq!(b.get_field("c1").unwrap().display_after_field(), Some("-1"));
}

/// The full fixture exercises every decorator
#[test]
fn test_fixture_document() {
    let doc = compile_schema_file(fixture()).unwrap();

    let names: Vec<_> = doc.entities.keys().map(|k| k.as_str()).collect();
    assert_eq!(
        names,
        vec!["Timestamps", "Audit", "User", "Account", "Transaction"]
    );
    let services: Vec<_> = doc.services.iter().map(|s| s.as_str()).collect();
    assert_eq!(services, vec!["auth", "ledger"]);
    let included: Vec<_> = doc.included_entities.iter().map(|s| s.as_str()).collect();
    assert_eq!(included, vec!["Timestamps", "Audit"]);

    let patterns = doc.get_dictionary("Patterns").unwrap();
    assert_eq!(patterns.len(), 3);
    assert_eq!(doc.dictionary_value("Patterns", "postcode"), Some("^[0-9]{5}$"));

    let user = doc.get_entity("User").unwrap();
    assert!(user.get_field("_id").is_some());
    assert_eq!(
        user.get_field("createdAt").unwrap().display_after_field(),
        Some("-1")
    );
    assert_eq!(
        user.get_field("updatedAt").unwrap().display_after_field(),
        Some("-2")
    );
    assert_eq!(
        user.get_field("createdBy").unwrap().display_after_field(),
        Some("-3")
    );
    assert_eq!(user.ui_metadata["icon"], "person");

    let account = doc.get_entity("Account").unwrap();
    assert_eq!(
        account.get_field("createdAt").unwrap().display_after_field(),
        Some("name")
    );
    assert_eq!(
        account.get_field("updatedAt").unwrap().display_after_field(),
        Some("createdAt")
    );
    assert_eq!(account.operations, "cru");
    assert!(!account.allows('d'));
    let show = account.get_field("userId").unwrap().show.as_ref().unwrap();
    assert_eq!(show.endpoint, "user");
    assert_eq!(show.display_info[0].fields, vec!["firstName", "lastName"]);

    let transaction = doc.get_entity("Transaction").unwrap();
    assert_eq!(
        transaction.get_field("createdAt").unwrap().display_after_field(),
        None
    );
    assert!(transaction.get_field("accountId").unwrap().is_required());
}

/// The fixture passes the consistency checks
#[test]
fn test_fixture_validates() {
    let input = std::fs::read_to_string(fixture()).unwrap();
    assert!(validate_schema(&input).is_ok());
}

/// YAML output survives a round trip
#[test]
fn test_yaml_round_trip() {
    let doc = compile_schema_file(fixture()).unwrap();
    let back = from_yaml(&to_yaml(&doc).unwrap()).unwrap();
    assert_eq!(back, doc);
}

/// Metadata lookups ignore case
#[test]
fn test_metadata_lookup() {
    let doc = compile_schema_file(fixture()).unwrap();
    let index = MetadataIndex::new(&doc);

    assert_eq!(index.proper_name("user", Some("FIRSTNAME")), Some("firstName"));
    assert_eq!(
        index.get("USER", Some("email"), Some("pattern.message")),
        Some(serde_json::json!("Invalid email"))
    );
}

/// Compiler options change identity and reference handling
#[test]
fn test_custom_compiler_options() {
    let options = CompilerOptions {
        identity_key: "uid".into(),
        reference_type: FieldType::String,
        ..CompilerOptions::default()
    };
    let compilation = Compiler::new(options)
        .compile("User ||--o{ Post: \"\"\nUser {\n ObjectId ID\n}\nPost {\n String title\n}\n")
        .unwrap();

    let doc = compilation.document;
    assert!(doc.get_entity("User").unwrap().get_field("uid").is_some());
    assert_eq!(
        doc.get_entity("Post").unwrap().get_field("userId").unwrap().field_type,
        Some(FieldType::String)
    );
}

/// Non-fatal findings are collected and do not stop compilation
#[test]
fn test_warnings_are_collected() {
    let compilation = Compiler::default()
        .compile(
            r#"
%% @abstract
User {
    String email %% @ui { widget: 'slider' }
    String phone %% @ui { colour: 'red' }
}
"#,
        )
        .unwrap();

    let kinds: Vec<_> = compilation.warnings.iter().map(|w| w.kind).collect();
    assert!(kinds.contains(&WarningKind::MisplacedDirective));
    assert!(kinds.contains(&WarningKind::UnsupportedUiValue));
    assert!(kinds.contains(&WarningKind::UnsupportedUiAttribute));
    assert!(compilation.document.get_entity("User").is_some());
}
