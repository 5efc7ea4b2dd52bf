//! Structured fuzzing for the diagram compiler.
//!
//! Generates diagrams that are mostly well formed, with decorators whose
//! payloads are sometimes broken, to reach deeper into the decorator engine.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_compile_structured
//! ```

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use erdgen_schema::compile_schema;
use libfuzzer_sys::fuzz_target;

/// A generated field type.
#[derive(Debug, Arbitrary)]
enum FuzzFieldType {
    String,
    Integer,
    Number,
    Boolean,
    IsoDate,
    ObjectId,
    Json,
    Unknown,
}

impl FuzzFieldType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::IsoDate => "ISODate",
            Self::ObjectId => "ObjectId",
            Self::Json => "JSON",
            Self::Unknown => "Money",
        }
    }
}

/// A generated field decorator.
#[derive(Debug, Arbitrary)]
enum FuzzFieldDecorator {
    None,
    Validate { required: bool, min_length: u8 },
    ValidateBroken,
    Ui(String),
    Unique,
}

impl FuzzFieldDecorator {
    fn render(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Validate {
                required,
                min_length,
            } => format!(
                " %% @validate {{ required: {}, minLength: {} }}",
                required, min_length
            ),
            Self::ValidateBroken => " %% @validate { required: true".to_string(),
            Self::Ui(widget) => format!(" %% @ui {{ widget: '{}' }}", sanitize_string(widget)),
            Self::Unique => " %% @unique".to_string(),
        }
    }
}

/// A generated entity-level decorator.
#[derive(Debug, Arbitrary)]
enum FuzzEntityDecorator {
    Abstract,
    Include(u8, Option<String>),
    UniqueGroup(String, String),
    Operations(Vec<String>),
    Service(String),
    Show(u8),
}

/// A generated field.
#[derive(Debug, Arbitrary)]
struct FuzzField {
    name: String,
    field_type: FuzzFieldType,
    decorator: FuzzFieldDecorator,
}

/// A generated entity.
#[derive(Debug, Arbitrary)]
struct FuzzEntity {
    name: String,
    fields: Vec<FuzzField>,
    decorators: Vec<FuzzEntityDecorator>,
}

/// A generated diagram.
#[derive(Debug, Arbitrary)]
struct FuzzDiagram {
    entities: Vec<FuzzEntity>,
    relationships: Vec<(u8, u8)>,
    dictionary: Vec<(String, String)>,
}

impl FuzzDiagram {
    fn render(&self) -> String {
        let names: Vec<String> = self
            .entities
            .iter()
            .map(|e| sanitize_identifier(&e.name))
            .collect();
        let pick = |index: u8| pick_name(&names, index);

        let mut out = String::from("erDiagram\n");
        for (source, target) in &self.relationships {
            out.push_str(&format!("    {} ||--o{{ {}: \"\"\n", pick(*source), pick(*target)));
        }
        if !self.dictionary.is_empty() {
            let entries: Vec<String> = self
                .dictionary
                .iter()
                .map(|(k, v)| format!("{}: '{}'", sanitize_identifier(k), sanitize_string(v)))
                .collect();
            out.push_str(&format!("    %% @dictionary Fuzz {{ {} }}\n", entries.join(", ")));
        }

        for (entity, name) in self.entities.iter().zip(&names) {
            out.push_str(&format!("    {} {{\n", name));
            for field in &entity.fields {
                out.push_str(&format!(
                    "        {} {}{}\n",
                    field.field_type.as_str(),
                    sanitize_identifier(&field.name),
                    field.decorator.render()
                ));
            }
            for decorator in &entity.decorators {
                let line = match decorator {
                    FuzzEntityDecorator::Abstract => "@abstract".to_string(),
                    FuzzEntityDecorator::Include(index, None) => format!("@include {}", pick(*index)),
                    FuzzEntityDecorator::Include(index, Some(after)) => format!(
                        "@include {} @ui {{ displayAfterField: '{}' }}",
                        pick(*index),
                        sanitize_string(after)
                    ),
                    FuzzEntityDecorator::UniqueGroup(a, b) => format!(
                        "@unique {} + {}",
                        sanitize_identifier(a),
                        sanitize_identifier(b)
                    ),
                    FuzzEntityDecorator::Operations(ops) => {
                        let ops: Vec<String> =
                            ops.iter().map(|o| format!("'{}'", sanitize_string(o))).collect();
                        format!("@operations [{}]", ops.join(", "))
                    }
                    FuzzEntityDecorator::Service(name) => {
                        format!("@service {}", sanitize_identifier(name))
                    }
                    FuzzEntityDecorator::Show(index) => format!("@show {}", pick(*index)),
                };
                out.push_str(&format!("        %% {}\n", line));
            }
            out.push_str("    }\n");
        }

        out
    }
}

/// Pick an entity name by index, or a name nothing declares.
fn pick_name(names: &[String], index: u8) -> String {
    if names.is_empty() {
        "Ghost".to_string()
    } else {
        names[index as usize % names.len()].clone()
    }
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if i == 0 {
            if c.is_ascii_alphabetic() {
                result.push(c);
            } else {
                result.push('x');
            }
        } else if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
        }
    }
    if result.is_empty() {
        "field".to_string()
    } else {
        result
    }
}

/// Sanitize a string for use in a quoted literal.
fn sanitize_string(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '\'' | '"' | '\\' | '\n' | '\r'))
        .take(50)
        .collect()
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    if let Ok(diagram) = FuzzDiagram::arbitrary(&mut unstructured) {
        // The compiler should never panic
        let _ = compile_schema(&diagram.render());
    }
});
