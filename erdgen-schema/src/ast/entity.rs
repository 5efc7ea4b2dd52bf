//! Entity definitions for the compiled schema.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smol_str::SmolStr;

use super::Field;

/// An entity (one brace-delimited block of the diagram).
///
/// Field order is declaration order, with `@include`d fields inserted at the
/// point of the include.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
    /// Fields by name.
    pub fields: IndexMap<SmolStr, Field>,
    /// Unique constraint groups, each an ordered list of field names.
    pub unique: Vec<Vec<SmolStr>>,
    /// Targets of relationships whose source is this entity.
    pub relationships: Vec<SmolStr>,
    /// Services attached with `@service`.
    pub service: Vec<SmolStr>,
    /// Abstraction entities consumed with `@include`.
    pub include: Vec<SmolStr>,
    /// Whether the entity is only a source for `@include`.
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    /// Compact permission string such as `"cru"`.
    pub operations: String,
    /// Entity level UI metadata.
    #[serde(rename = "uiMetadata")]
    pub ui_metadata: Map<String, Value>,
}

impl Entity {
    /// Create a new empty entity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field.
    pub fn add_field(&mut self, name: impl Into<SmolStr>, field: Field) {
        self.fields.insert(name.into(), field);
    }

    /// Get a field by exact name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Get a field by name, ignoring ASCII case.
    pub fn find_field(&self, name: &str) -> Option<(&SmolStr, &Field)> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// Append a unique constraint group. Duplicate groups are kept.
    pub fn add_unique(&mut self, group: Vec<SmolStr>) {
        self.unique.push(group);
    }

    /// Check whether an operation letter (`c`, `r`, `u`, `d`) is permitted.
    ///
    /// An entity without an `@operations` decorator permits everything.
    pub fn allows(&self, operation: char) -> bool {
        self.operations.is_empty() || self.operations.contains(operation)
    }

    /// Fields that are required.
    pub fn required_fields(&self) -> Vec<&SmolStr> {
        self.fields
            .iter()
            .filter(|(_, f)| f.is_required())
            .map(|(name, _)| name)
            .collect()
    }
}
