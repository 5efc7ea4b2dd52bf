//! Primitive type vocabulary and scalar wrappers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::SmolStr;

/// Field types understood by the downstream generators.
///
/// Type names are case-sensitive. Anything outside the vocabulary is kept
/// verbatim as [`FieldType::Other`] so that generators can decide what to do
/// with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Free text (`String`).
    String,
    /// Whole number (`Integer`).
    Integer,
    /// Floating point number (`Number`).
    Number,
    /// Monetary amount (`Currency`).
    Currency,
    /// True/false (`Boolean`).
    Boolean,
    /// ISO-8601 timestamp (`ISODate`).
    IsoDate,
    /// Calendar date (`Date`).
    Date,
    /// Date and time (`DateTime`).
    DateTime,
    /// Reference to another entity's identity (`ObjectId`).
    ObjectId,
    /// List of strings (`Array[String]`).
    StringArray,
    /// Embedded, unindexed structure (`JSON`).
    Json,
    /// A type name outside the vocabulary.
    Other(SmolStr),
}

impl FieldType {
    /// Parse a type name. Never fails; unknown names become [`FieldType::Other`].
    pub fn from_name(s: &str) -> Self {
        match s {
            "String" => Self::String,
            "Integer" => Self::Integer,
            "Number" => Self::Number,
            "Currency" => Self::Currency,
            "Boolean" => Self::Boolean,
            "ISODate" => Self::IsoDate,
            "Date" => Self::Date,
            "DateTime" => Self::DateTime,
            "ObjectId" => Self::ObjectId,
            "Array[String]" => Self::StringArray,
            "JSON" => Self::Json,
            other => Self::Other(SmolStr::new(other)),
        }
    }

    /// Get the type name as written in a schema.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Number => "Number",
            Self::Currency => "Currency",
            Self::Boolean => "Boolean",
            Self::IsoDate => "ISODate",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::ObjectId => "ObjectId",
            Self::StringArray => "Array[String]",
            Self::Json => "JSON",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Check whether the type is part of the primitive vocabulary.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Check whether the type is a date or time type.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::IsoDate | Self::Date | Self::DateTime)
    }

    /// Check whether the type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Number | Self::Currency)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// A string that must read back as a string.
///
/// Dictionary values such as `"0123"` or `"true"` would be re-typed by a YAML
/// reader if emitted bare. [`crate::emit::to_yaml`] always writes them
/// double-quoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotedString(pub String);

impl QuotedString {
    /// Create a new quoted string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuotedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuotedString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
