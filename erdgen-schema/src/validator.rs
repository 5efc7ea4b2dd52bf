//! Consistency checks over a compiled document.
//!
//! The compiler accepts anything it can parse; this pass reports references
//! that do not line up:
//! - Unique groups naming fields the entity does not have
//! - Relationships naming entities that were never declared
//! - Includes of entities not marked abstract
//! - Fields with no type or a type outside the vocabulary
//! - `@show` specifications pointing at unknown entities

use crate::ast::*;
use crate::error::{SchemaError, SchemaResult};
use crate::parser::compile_schema;

/// Document validator.
#[derive(Debug)]
pub struct Validator {
    /// Collected validation errors.
    errors: Vec<SchemaError>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self { errors: vec![] }
    }

    /// Validate a document and return it, or every problem found.
    pub fn validate(&mut self, document: SchemaDocument) -> SchemaResult<SchemaDocument> {
        self.errors.clear();

        for (name, entity) in &document.entities {
            self.validate_entity(name, entity, &document);
        }

        for relationship in &document.relationships {
            self.validate_relationship(relationship, &document);
        }

        if self.errors.is_empty() {
            Ok(document)
        } else {
            Err(SchemaError::ValidationFailed {
                count: self.errors.len(),
                errors: std::mem::take(&mut self.errors),
            })
        }
    }

    fn validate_entity(&mut self, name: &str, entity: &Entity, document: &SchemaDocument) {
        if entity.is_abstract && !document.included_entities.contains(name) {
            tracing::debug!(entity = name, "abstract entity is never included");
        }

        for (field_name, field) in &entity.fields {
            self.validate_field(name, field_name, field, document);
        }

        for group in &entity.unique {
            for field in group {
                if entity.get_field(field).is_none() {
                    self.errors.push(SchemaError::invalid_entity(
                        name,
                        format!("unique constraint names unknown field `{}`", field),
                    ));
                }
            }
        }

        for included in &entity.include {
            match document.get_entity(included) {
                Some(source) if !source.is_abstract => {
                    self.errors.push(SchemaError::invalid_entity(
                        name,
                        format!("includes `{}`, which is not marked @abstract", included),
                    ));
                }
                Some(_) => {}
                None => {
                    self.errors.push(SchemaError::invalid_entity(
                        name,
                        format!("includes unknown entity `{}`", included),
                    ));
                }
            }
        }
    }

    fn validate_field(
        &mut self,
        entity: &str,
        name: &str,
        field: &Field,
        document: &SchemaDocument,
    ) {
        match &field.field_type {
            None => self.errors.push(SchemaError::invalid_field(
                entity,
                name,
                "decorated but never declared with a type",
            )),
            Some(FieldType::Other(type_name)) => self.errors.push(SchemaError::invalid_field(
                entity,
                name,
                format!("unknown type `{}`", type_name),
            )),
            Some(_) => {}
        }

        if let Some(show) = &field.show {
            let referenced = document
                .entities
                .keys()
                .any(|e| foreign_key_name(e) == name);
            if !referenced {
                self.errors.push(SchemaError::invalid_field(
                    entity,
                    name,
                    format!("`@show` endpoint `{}` refers to an unknown entity", show.endpoint),
                ));
            }
        }
    }

    fn validate_relationship(&mut self, relationship: &Relationship, document: &SchemaDocument) {
        if document.get_entity(&relationship.source).is_none() {
            self.errors.push(SchemaError::invalid_relationship(
                relationship.source.as_str(),
                relationship.target.as_str(),
                format!("source entity `{}` is not declared", relationship.source),
            ));
        }
        if !is_declared(&relationship.target, document) {
            self.errors.push(SchemaError::invalid_relationship(
                relationship.source.as_str(),
                relationship.target.as_str(),
                format!("target entity `{}` is not declared", relationship.target),
            ));
        }
    }
}

/// Whether an entity has anything besides the foreign keys that
/// relationships injected into it.
fn is_declared(name: &str, document: &SchemaDocument) -> bool {
    let Some(entity) = document.get_entity(name) else {
        return false;
    };
    let injected: Vec<String> = document
        .relationships
        .iter()
        .filter(|r| r.target == name)
        .map(Relationship::foreign_key)
        .collect();

    entity.is_abstract
        || entity
            .fields
            .keys()
            .any(|field| !injected.iter().any(|key| key == field.as_str()))
}

/// Compile and validate diagram text.
pub fn validate_schema(input: &str) -> SchemaResult<SchemaDocument> {
    let document = compile_schema(input)?;
    Validator::new().validate(document)
}
