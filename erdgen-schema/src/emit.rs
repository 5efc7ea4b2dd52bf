//! Serialization of the canonical document.
//!
//! Key order is stable: the document keys are always `relationships`,
//! `dictionaries`, `services`, `includedEntities`, `entities`, and every map
//! below them keeps insertion order.

use std::collections::BTreeMap;
use std::fmt::Write;

use indexmap::IndexMap;
use serde::Serialize;
use smol_str::SmolStr;

use crate::ast::{DictionaryTable, SchemaDocument};
use crate::config::OutputFormat;
use crate::error::{SchemaError, SchemaResult};

/// Serialize a document as YAML.
///
/// Dictionary values are always double-quoted.
pub fn to_yaml(document: &SchemaDocument) -> SchemaResult<String> {
    let mut out = yaml_section("relationships", &document.relationships)?;
    out.push_str(&yaml_dictionaries(&document.dictionaries)?);
    out.push_str(&yaml_section("services", &document.services)?);
    out.push_str(&yaml_section("includedEntities", &document.included_entities)?);
    out.push_str(&yaml_section("entities", &document.entities)?);
    Ok(out)
}

fn yaml_section<T: Serialize>(key: &str, value: &T) -> SchemaResult<String> {
    let section = BTreeMap::from([(key, value)]);
    serde_yaml::to_string(&section).map_err(serialize_error)
}

fn yaml_dictionaries(dictionaries: &IndexMap<SmolStr, DictionaryTable>) -> SchemaResult<String> {
    if dictionaries.is_empty() {
        return Ok("dictionaries: {}\n".to_string());
    }

    let mut out = String::from("dictionaries:\n");
    for (name, table) in dictionaries {
        if table.is_empty() {
            writeln!(out, "  {}: {{}}", yaml_key(name)?).map_err(serialize_error)?;
            continue;
        }
        writeln!(out, "  {}:", yaml_key(name)?).map_err(serialize_error)?;
        for (key, value) in table {
            // A JSON string is a valid YAML double-quoted scalar.
            let quoted = serde_json::to_string(value.as_str()).map_err(serialize_error)?;
            writeln!(out, "    {}: {}", yaml_key(key)?, quoted).map_err(serialize_error)?;
        }
    }
    Ok(out)
}

fn yaml_key(key: &str) -> SchemaResult<String> {
    let plain = serde_yaml::to_string(key).map_err(serialize_error)?;
    let plain = plain.trim_end();
    if plain.contains('\n') {
        serde_json::to_string(key).map_err(serialize_error)
    } else {
        Ok(plain.to_string())
    }
}

fn serialize_error(error: impl std::fmt::Display) -> SchemaError {
    SchemaError::SerializeError {
        message: error.to_string(),
    }
}

/// Serialize a document as pretty printed JSON.
pub fn to_json(document: &SchemaDocument) -> SchemaResult<String> {
    serde_json::to_string_pretty(document).map_err(serialize_error)
}

/// Serialize a document in the given format.
pub fn render(document: &SchemaDocument, format: OutputFormat) -> SchemaResult<String> {
    match format {
        OutputFormat::Yaml => to_yaml(document),
        OutputFormat::Json => to_json(document),
    }
}

/// Read a document back from YAML.
pub fn from_yaml(text: &str) -> SchemaResult<SchemaDocument> {
    serde_yaml::from_str(text).map_err(serialize_error)
}

/// Read a document back from JSON.
pub fn from_json(text: &str) -> SchemaResult<SchemaDocument> {
    serde_json::from_str(text).map_err(serialize_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::compile_schema;
    use pretty_assertions::assert_eq;

    const SCHEMA: &str = r#"
erDiagram
    User ||--o{ Account: ""
    %% @dictionary Flags { enabled: 'true', code: '0123' }
    User {
        String email %% @validate { required: true, pattern: { regex: "dictionary=Patterns.email" } }
    }
    Account {
        String name
    }
"#;

    #[test]
    fn test_yaml_top_level_key_order() {
        let doc = compile_schema(SCHEMA).unwrap();
        let yaml = to_yaml(&doc).unwrap();

        let positions: Vec<_> = [
            "relationships:",
            "dictionaries:",
            "services:",
            "includedEntities:",
            "entities:",
        ]
        .iter()
        .map(|key| yaml.find(key).unwrap())
        .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_yaml_round_trip_keeps_ambiguous_strings() {
        let doc = compile_schema(SCHEMA).unwrap();
        let back = from_yaml(&to_yaml(&doc).unwrap()).unwrap();

        assert_eq!(back.dictionary_value("Flags", "enabled"), Some("true"));
        assert_eq!(back.dictionary_value("Flags", "code"), Some("0123"));
        assert_eq!(back, doc);
    }

    #[test]
    fn test_yaml_dictionary_values_are_double_quoted() {
        let doc = compile_schema(SCHEMA).unwrap();
        let yaml = to_yaml(&doc).unwrap();

        assert!(yaml.contains("dictionaries:\n  Flags:\n"));
        assert!(yaml.contains("    enabled: \"true\"\n"));
        assert!(yaml.contains("    code: \"0123\"\n"));
    }

    #[test]
    fn test_yaml_quoting_survives_escapes() {
        let mut doc = SchemaDocument::new();
        let mut table = DictionaryTable::new();
        table.insert("email".into(), r#"^[^@]+@"x"\.io$"#.into());
        table.insert("yes".into(), "plain".into());
        doc.dictionaries.insert("Patterns".into(), table);
        doc.dictionaries.insert("Empty".into(), DictionaryTable::new());

        let back = from_yaml(&to_yaml(&doc).unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_yaml_empty_document_round_trips() {
        let doc = SchemaDocument::new();
        let yaml = to_yaml(&doc).unwrap();
        assert!(yaml.contains("dictionaries: {}\n"));
        assert_eq!(from_yaml(&yaml).unwrap(), doc);
    }

    #[test]
    fn test_json_round_trip() {
        let doc = compile_schema(SCHEMA).unwrap();
        let back = from_json(&to_json(&doc).unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let doc = compile_schema(SCHEMA).unwrap();
        assert!(render(&doc, OutputFormat::Json).unwrap().starts_with('{'));
        assert!(
            render(&doc, OutputFormat::Yaml)
                .unwrap()
                .starts_with("relationships:")
        );
    }

    #[test]
    fn test_from_yaml_rejects_garbage() {
        assert!(matches!(
            from_yaml("entities: [1, 2"),
            Err(SchemaError::SerializeError { .. })
        ));
    }
}
