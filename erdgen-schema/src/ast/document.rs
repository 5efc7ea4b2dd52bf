//! The canonical schema document.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Entity, QuotedString};

/// A named lookup table of string values.
pub type DictionaryTable = IndexMap<SmolStr, QuotedString>;

/// A `source ||--o{ target` relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    /// The "one" side; its lower-cased name prefixes the injected key.
    pub source: SmolStr,
    /// The "many" side; receives the foreign key field.
    pub target: SmolStr,
}

impl Relationship {
    /// Create a new relationship.
    pub fn new(source: impl Into<SmolStr>, target: impl Into<SmolStr>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Name of the foreign key field injected into the target entity.
    pub fn foreign_key(&self) -> String {
        foreign_key_name(&self.source)
    }
}

/// Name of the foreign key field that refers to `entity`.
pub fn foreign_key_name(entity: &str) -> String {
    format!("{}Id", entity.to_lowercase())
}

/// The fully-resolved output of one compilation.
///
/// Every collection is insertion ordered so that compiling the same input
/// twice yields byte-identical output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaDocument {
    /// All relationships in source order. Duplicates are kept.
    pub relationships: Vec<Relationship>,
    /// Dictionary tables by name.
    pub dictionaries: IndexMap<SmolStr, DictionaryTable>,
    /// Every service attached to any entity.
    pub services: IndexSet<SmolStr>,
    /// Every entity that was the target of at least one `@include`.
    #[serde(rename = "includedEntities")]
    pub included_entities: IndexSet<SmolStr>,
    /// Entities in declaration order.
    pub entities: IndexMap<SmolStr, Entity>,
}

impl SchemaDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an entity by exact name.
    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Get a dictionary table by name.
    pub fn get_dictionary(&self, name: &str) -> Option<&DictionaryTable> {
        self.dictionaries.get(name)
    }

    /// Look up one dictionary value.
    pub fn dictionary_value(&self, dictionary: &str, key: &str) -> Option<&str> {
        self.dictionaries
            .get(dictionary)
            .and_then(|table| table.get(key))
            .map(QuotedString::as_str)
    }

    /// Entities that are not abstract.
    pub fn concrete_entities(&self) -> impl Iterator<Item = (&SmolStr, &Entity)> {
        self.entities.iter().filter(|(_, e)| !e.is_abstract)
    }

    /// Total number of fields across all entities.
    pub fn field_count(&self) -> usize {
        self.entities.values().map(|e| e.fields.len()).sum()
    }
}
