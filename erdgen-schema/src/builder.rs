//! The in-progress entity map.

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use smol_str::SmolStr;
use tracing::debug;

use crate::ast::{
    DISPLAY_AFTER_FIELD, DictionaryTable, Entity, Field, FieldType, QuotedString, Relationship,
};
use crate::config::CompilerOptions;
use crate::error::{SchemaError, SchemaResult};

/// How fields copied by `@include` are ordered in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Number copies `-1`, `-2`, ... from the start of each `@include`.
    Sequential,
    /// Put the first copy after the named field and chain the rest.
    After(SmolStr),
    /// Leave the copies' ordering hint as inherited.
    Unordered,
}

/// Everything the builder accumulated, ready for assembly.
#[derive(Debug, Default)]
pub struct BuildParts {
    /// Entities in declaration order.
    pub entities: IndexMap<SmolStr, Entity>,
    /// Relationships in source order.
    pub relationships: Vec<Relationship>,
    /// Dictionary tables by name.
    pub dictionaries: IndexMap<SmolStr, DictionaryTable>,
}

/// Owns the entity map while the input is being parsed.
#[derive(Debug)]
pub struct EntityBuilder {
    options: CompilerOptions,
    parts: BuildParts,
    current: Option<SmolStr>,
    declared: IndexSet<SmolStr>,
}

impl EntityBuilder {
    /// Create an empty builder.
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            parts: BuildParts::default(),
            current: None,
            declared: IndexSet::new(),
        }
    }

    /// Compiler options in effect.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Name of the entity whose block is open.
    pub fn current(&self) -> Option<&SmolStr> {
        self.current.as_ref()
    }

    /// Open an entity block. Reopening keeps what was already collected.
    ///
    /// An entity first created by a relationship line moves to its
    /// declaration position when its block opens.
    pub fn open_entity(&mut self, name: &str) {
        let name = SmolStr::new(name);
        debug!(entity = %name, "opening entity");
        if self.declared.insert(name.clone()) {
            let entity = self.parts.entities.shift_remove(&name).unwrap_or_default();
            self.parts.entities.insert(name.clone(), entity);
        }
        self.current = Some(name);
    }

    /// Close the open entity block.
    pub fn close_entity(&mut self) {
        self.current = None;
    }

    /// Get an entity, creating it if needed.
    pub fn entity_mut(&mut self, name: &str) -> &mut Entity {
        self.parts.entities.entry(SmolStr::new(name)).or_default()
    }

    /// Get an entity.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.parts.entities.get(name)
    }

    /// Get a field, creating an untyped one if needed.
    pub fn field_mut(&mut self, entity: &str, field: &str) -> &mut Field {
        self.entity_mut(entity)
            .fields
            .entry(SmolStr::new(field))
            .or_default()
    }

    /// Declare a field, replacing any earlier definition of the same name.
    ///
    /// Returns the normalized field name.
    pub fn define_field(&mut self, entity: &str, field_type: &str, name: &str) -> SmolStr {
        let name = self.options.normalize_field_name(name);
        let field = Field::new(FieldType::from_name(field_type));
        self.entity_mut(entity).add_field(name.clone(), field);
        name
    }

    /// Record a relationship and inject the foreign key into its target.
    pub fn add_relationship(&mut self, source: &str, target: &str) {
        let relationship = Relationship::new(source, target);
        let key = relationship.foreign_key();
        debug!(source, target, foreign_key = %key, "recording relationship");

        let reference_type = self.options.reference_type.clone();
        let field = self.field_mut(target, &key);
        field.field_type = Some(reference_type);
        field.set_attribute("required", true);
        field
            .ui_metadata
            .entry("displayName")
            .or_insert_with(|| Value::from(source));
        field
            .ui_metadata
            .entry("readOnly")
            .or_insert(Value::Bool(true));

        self.parts.relationships.push(relationship);
    }

    /// Copy an abstraction into `entity`.
    ///
    /// The abstraction must already be declared. Fields are copied by value;
    /// unique groups, relationships and services are appended. `counter`
    /// holds the last sequential token handed out by the current directive.
    pub fn include(
        &mut self,
        entity: &str,
        abstraction: &str,
        placement: &Placement,
        counter: &mut i64,
        line: usize,
    ) -> SchemaResult<()> {
        let Some(mut source) = self.parts.entities.get(abstraction).cloned() else {
            return Err(SchemaError::unknown_abstraction(entity, abstraction, line));
        };
        debug!(
            entity,
            abstraction,
            fields = source.fields.len(),
            "expanding include"
        );

        // Relationship lines are mirrored into entities only at assembly.
        for relationship in &self.parts.relationships {
            if relationship.source.as_str() == abstraction
                && !source.relationships.contains(&relationship.target)
            {
                source.relationships.push(relationship.target.clone());
            }
        }

        let target = self
            .parts
            .entities
            .entry(SmolStr::new(entity))
            .or_default();

        let mut anchor = match placement {
            Placement::After(name) => Some(name.clone()),
            _ => None,
        };
        for (name, mut field) in source.fields {
            match placement {
                Placement::Sequential => {
                    *counter -= 1;
                    field.ui_metadata.insert(
                        DISPLAY_AFTER_FIELD.to_string(),
                        Value::from(counter.to_string()),
                    );
                }
                Placement::After(_) => {
                    if let Some(previous) = anchor.replace(name.clone()) {
                        field
                            .ui_metadata
                            .insert(DISPLAY_AFTER_FIELD.to_string(), Value::from(previous.as_str()));
                    }
                }
                Placement::Unordered => {}
            }
            target.fields.insert(name, field);
        }

        target.unique.extend(source.unique);
        target.relationships.extend(source.relationships);
        target.service.extend(source.service);
        target.include.push(SmolStr::new(abstraction));
        Ok(())
    }

    /// Merge entries into a dictionary table, creating it if absent.
    pub fn merge_dictionary(
        &mut self,
        name: &str,
        entries: impl IntoIterator<Item = (SmolStr, QuotedString)>,
    ) {
        let table = self
            .parts
            .dictionaries
            .entry(SmolStr::new(name))
            .or_default();
        table.extend(entries);
    }

    /// Finish building.
    pub fn into_parts(self) -> BuildParts {
        self.parts
    }
}
