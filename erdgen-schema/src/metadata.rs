//! Read access to a compiled document, the way runtime consumers see it.
//!
//! Entity and field names are matched without regard to ASCII case.
//! Attribute paths use dot notation (`pattern.regex`) and are matched
//! exactly.

use serde_json::Value;
use smol_str::SmolStr;

use crate::ast::{Entity, Field, SchemaDocument};

/// Prefix of a deferred dictionary reference.
pub const DICTIONARY_PREFIX: &str = "dictionary=";

/// Case-insensitive lookup over a compiled document.
#[derive(Debug, Clone, Copy)]
pub struct MetadataIndex<'a> {
    document: &'a SchemaDocument,
}

impl<'a> MetadataIndex<'a> {
    /// Create an index over a document.
    pub fn new(document: &'a SchemaDocument) -> Self {
        Self { document }
    }

    /// Entity names in declaration order.
    pub fn entity_names(&self) -> impl Iterator<Item = &'a SmolStr> {
        self.document.entities.keys()
    }

    /// Find an entity.
    pub fn entity(&self, name: &str) -> Option<(&'a SmolStr, &'a Entity)> {
        self.document
            .entities
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// Find a field of an entity.
    pub fn field(&self, entity: &str, field: &str) -> Option<(&'a SmolStr, &'a Field)> {
        self.entity(entity)?.1.find_field(field)
    }

    /// The declared spelling of an entity name, or of a field name when
    /// `field` is given.
    pub fn proper_name(&self, entity: &str, field: Option<&str>) -> Option<&'a str> {
        match field {
            None => self.entity(entity).map(|(name, _)| name.as_str()),
            Some(field) => self.field(entity, field).map(|(name, _)| name.as_str()),
        }
    }

    /// Look up metadata as a JSON value.
    ///
    /// With no field this is the whole entity, with no attribute the whole
    /// field, otherwise the value at the dotted attribute path.
    pub fn get(&self, entity: &str, field: Option<&str>, attribute: Option<&str>) -> Option<Value> {
        let Some(field) = field else {
            return self
                .entity(entity)
                .and_then(|(_, e)| serde_json::to_value(e).ok());
        };

        let value = serde_json::to_value(self.field(entity, field)?.1).ok()?;
        match attribute {
            None => Some(value),
            Some(path) => path
                .split('.')
                .try_fold(&value, |current, key| current.as_object()?.get(key))
                .cloned(),
        }
    }
}

/// A `dictionary=Name.key` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryRef {
    /// Dictionary name.
    pub dictionary: SmolStr,
    /// Key within the dictionary.
    pub key: SmolStr,
}

impl DictionaryRef {
    /// Parse a reference token. Returns `None` for ordinary values.
    pub fn parse(text: &str) -> Option<Self> {
        let reference = text.strip_prefix(DICTIONARY_PREFIX)?;
        let (dictionary, key) = reference.split_once('.')?;
        if dictionary.is_empty() || key.is_empty() {
            return None;
        }
        Some(Self {
            dictionary: SmolStr::new(dictionary),
            key: SmolStr::new(key),
        })
    }
}

impl std::fmt::Display for DictionaryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}.{}", DICTIONARY_PREFIX, self.dictionary, self.key)
    }
}

impl SchemaDocument {
    /// Resolve a `dictionary=Name.key` token against this document's
    /// dictionaries. The compiler itself never does this.
    pub fn resolve_dictionary_ref(&self, text: &str) -> Option<&str> {
        let reference = DictionaryRef::parse(text)?;
        self.dictionary_value(&reference.dictionary, &reference.key)
    }
}
