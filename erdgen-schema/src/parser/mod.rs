//! Schema compiler for entity-relationship diagrams.
//!
//! The input is read in a single forward pass. Every line is classified,
//! then applied to an [`EntityBuilder`]; after the last line the assembler
//! derives the document-wide aggregates.

pub mod line;
pub mod literal;

use std::path::Path;

use tracing::{debug, info, trace, warn};

use crate::assembler::assemble;
use crate::ast::SchemaDocument;
use crate::builder::EntityBuilder;
use crate::config::CompilerOptions;
use crate::decorator;
use crate::error::{CompileWarning, SchemaError, SchemaResult, WarningKind};

use line::{LineKind, Mode, classify};

/// State threaded through one compilation.
#[derive(Debug)]
pub(crate) struct ParseContext {
    pub(crate) builder: EntityBuilder,
    pub(crate) warnings: Vec<CompileWarning>,
    /// 1-based number of the line being processed.
    pub(crate) line: usize,
}

impl ParseContext {
    pub(crate) fn new(options: CompilerOptions) -> Self {
        Self {
            builder: EntityBuilder::new(options),
            warnings: Vec::new(),
            line: 0,
        }
    }

    pub(crate) fn options(&self) -> &CompilerOptions {
        self.builder.options()
    }

    /// Record a non-fatal finding for the current line.
    pub(crate) fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let warning = CompileWarning::new(self.line, kind, message);
        warn!(line = warning.line, kind = %warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }
}

/// The result of a successful compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    /// The canonical document.
    pub document: SchemaDocument,
    /// Non-fatal findings, in source order.
    pub warnings: Vec<CompileWarning>,
}

/// Compiles diagram text into a [`SchemaDocument`].
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    /// Create a compiler with the given options.
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile diagram text.
    pub fn compile(&self, input: &str) -> SchemaResult<Compilation> {
        let mut ctx = ParseContext::new(self.options.clone());
        let mut mode = Mode::Outside;

        for (index, raw) in input.lines().enumerate() {
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }
            ctx.line = index + 1;

            let kind = classify(text, mode);
            trace!(line = ctx.line, ?kind, "classified line");

            match kind {
                LineKind::EntityOpen { name } => {
                    ctx.builder.open_entity(name);
                    mode = Mode::Inside;
                }
                LineKind::EntityClose => {
                    ctx.builder.close_entity();
                    mode = Mode::Outside;
                }
                LineKind::Relationship { source, target } => {
                    ctx.builder.add_relationship(source, target);
                }
                LineKind::Dictionary { text } => decorator::merge_dictionary(&mut ctx, text)?,
                LineKind::Decorator { text } => match ctx.builder.current().cloned() {
                    Some(entity) => decorator::process(&mut ctx, &entity, None, text)?,
                    None => ctx.warn(
                        WarningKind::MisplacedDirective,
                        format!("`{}` is outside an entity block", text),
                    ),
                },
                LineKind::Field {
                    field_type,
                    name,
                    decorators,
                } => {
                    let Some(entity) = ctx.builder.current().cloned() else {
                        continue;
                    };
                    let field = ctx.builder.define_field(&entity, field_type, name);
                    if let Some(text) = decorators {
                        decorator::process(&mut ctx, &entity, Some(field), text)?;
                    }
                }
                LineKind::Comment => {}
                LineKind::Ignored => debug!(line = ctx.line, text, "ignoring line"),
            }
        }

        let warnings = ctx.warnings;
        let document = assemble(ctx.builder.into_parts());
        info!(
            entities = document.entities.len(),
            relationships = document.relationships.len(),
            dictionaries = document.dictionaries.len(),
            warnings = warnings.len(),
            "compiled schema"
        );

        Ok(Compilation { document, warnings })
    }

    /// Compile a diagram file.
    pub fn compile_file(&self, path: impl AsRef<Path>) -> SchemaResult<Compilation> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        self.compile(&content)
    }
}

/// Compile diagram text with default options.
pub fn compile_schema(input: &str) -> SchemaResult<SchemaDocument> {
    Compiler::default()
        .compile(input)
        .map(|compilation| compilation.document)
}

/// Compile a diagram file with default options.
pub fn compile_schema_file(path: impl AsRef<Path>) -> SchemaResult<SchemaDocument> {
    Compiler::default()
        .compile_file(path)
        .map(|compilation| compilation.document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FieldType;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use smol_str::SmolStr;

    fn compile(input: &str) -> Compilation {
        Compiler::default().compile(input).unwrap()
    }

    // ==================== Basic Parsing Tests ====================

    #[test]
    fn test_single_entity_single_field() {
        let doc = compile_schema("erDiagram\n    User {\n        String name\n    }\n").unwrap();

        assert_eq!(doc.entities.len(), 1);
        let user = doc.get_entity("User").unwrap();
        assert_eq!(user.fields.len(), 1);
        assert_eq!(
            user.get_field("name").unwrap().field_type,
            Some(FieldType::String)
        );
        assert!(user.unique.is_empty());
        assert!(doc.relationships.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let doc = compile_schema("").unwrap();
        assert!(doc.entities.is_empty());
    }

    #[test]
    fn test_identity_normalized() {
        let doc = compile_schema("User {\n ObjectId id\n String ID2\n}").unwrap();
        let user = doc.get_entity("User").unwrap();
        assert!(user.get_field("_id").is_some());
        assert!(user.get_field("ID2").is_some());
    }

    #[test]
    fn test_short_field_line_is_ignored() {
        let doc = compile_schema("User {\n String\n}").unwrap();
        assert!(doc.get_entity("User").unwrap().fields.is_empty());
    }

    #[test]
    fn test_entity_open_inside_entity_switches_entity() {
        let doc = compile_schema("A {\n String a\nB {\n String b\n}").unwrap();
        assert!(doc.get_entity("A").unwrap().get_field("a").is_some());
        assert!(doc.get_entity("B").unwrap().get_field("b").is_some());
    }

    #[test]
    fn test_field_order_is_declaration_order() {
        let doc = compile_schema("User {\n String b\n String a\n String c\n}").unwrap();
        let names: Vec<_> = doc.get_entity("User").unwrap().fields.keys().cloned().collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    // ==================== Decorator Tests ====================

    #[test]
    fn test_inline_and_standalone_decorators() {
        let doc = compile_schema(
            r#"
User {
    String email %% @validate { required: true } @unique
    String firstName
    String lastName
    %% @unique firstName + lastName
    %% @ui email { widget: 'email' }
}
"#,
        )
        .unwrap();

        let user = doc.get_entity("User").unwrap();
        assert_eq!(
            user.unique,
            vec![
                vec![SmolStr::new("email")],
                vec![SmolStr::new("firstName"), SmolStr::new("lastName")],
            ]
        );
        let email = user.get_field("email").unwrap();
        assert!(email.is_required());
        assert_eq!(email.ui_metadata["widget"], json!("email"));
    }

    #[test]
    fn test_field_redefinition_resets_decorators() {
        let doc = compile_schema(
            "User {\n String email %% @validate { required: true }\n String email\n}",
        )
        .unwrap();
        assert!(!doc.get_entity("User").unwrap().get_field("email").unwrap().is_required());
    }

    #[test]
    fn test_decorator_outside_entity_warns() {
        let compilation = compile("%% @abstract\nUser {\n}");
        assert_eq!(compilation.warnings.len(), 1);
        assert_eq!(compilation.warnings[0].kind, WarningKind::MisplacedDirective);
        assert_eq!(compilation.warnings[0].line, 1);
        assert!(!compilation.document.get_entity("User").unwrap().is_abstract);
    }

    #[test]
    fn test_plain_comments_are_ignored() {
        let compilation = compile("%% a note\nUser {\n %% @todo later\n String a\n}");
        assert!(compilation.warnings.is_empty());
        assert_eq!(compilation.document.field_count(), 1);
    }

    // ==================== Relationship Tests ====================

    #[test]
    fn test_relationship_before_entities() {
        let doc = compile_schema(
            "erDiagram\nUser ||--o{ Account: \"\"\nUser {\n String name\n}\nAccount {\n String title\n}",
        )
        .unwrap();

        let account = doc.get_entity("Account").unwrap();
        let key = account.get_field("userId").unwrap();
        assert_eq!(key.field_type, Some(FieldType::ObjectId));
        assert!(key.is_required());
        assert!(account.get_field("title").is_some());
        assert_eq!(
            doc.get_entity("User").unwrap().relationships,
            vec![SmolStr::new("Account")]
        );
    }

    // ==================== Failure Tests ====================

    #[test]
    fn test_malformed_validate_aborts() {
        let result = compile_schema("User {\n String email %% @validate { required: true\n}");

        match result {
            Err(SchemaError::MalformedPayload { text, line, .. }) => {
                assert_eq!(text, "{ required: true");
                assert_eq!(line, 2);
            }
            other => panic!("Expected MalformedPayload, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_forward_include_aborts() {
        let result = compile_schema("User {\n %% @include Base\n}\nBase {\n %% @abstract\n}");
        assert!(matches!(
            result,
            Err(SchemaError::UnknownAbstraction { .. })
        ));
    }

    #[test]
    fn test_compile_file_missing() {
        let result = compile_schema_file("/nonexistent/schema.mmd");
        assert!(matches!(result, Err(SchemaError::IoError { .. })));
    }

    #[test]
    fn test_custom_identity_key() {
        let options = CompilerOptions {
            identity_key: "pk".into(),
            ..CompilerOptions::default()
        };
        let compilation = Compiler::new(options).compile("User {\n Integer Id\n}").unwrap();
        assert!(compilation.document.get_entity("User").unwrap().get_field("pk").is_some());
    }
}
