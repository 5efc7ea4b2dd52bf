//! Field definitions for the compiled schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smol_str::SmolStr;

use super::FieldType;

/// Key of the UI ordering hint written by `@include`.
pub const DISPLAY_AFTER_FIELD: &str = "displayAfterField";

/// Attribute keys that are owned by [`Field`] itself and may not be set
/// through a decorator's attribute bag.
pub const RESERVED_ATTRIBUTES: &[&str] = &["type", "uiMetadata", "show"];

/// A field of an entity.
///
/// Besides its type a field carries an open attribute bag filled in by
/// decorators (`required`, `pattern`, `enum`, bounds, ...), a nested UI
/// metadata bag and, for foreign keys, an optional `show` specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Declared type. `None` when a decorator referenced the field before
    /// (or without) a field line declaring it.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// Attributes merged from `@validate` and from relationship injection.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    /// UI metadata merged from `@ui` and `@include`.
    #[serde(rename = "uiMetadata", default, skip_serializing_if = "Map::is_empty")]
    pub ui_metadata: Map<String, Value>,
    /// Foreign entity display specification from `@show`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<ShowSpec>,
}

impl Field {
    /// Create a field of the given type with no attributes.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type: Some(field_type),
            ..Self::default()
        }
    }

    /// Get an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Merge an attribute bag key by key. Later values win.
    pub fn merge_attributes(&mut self, attributes: Map<String, Value>) {
        for (key, value) in attributes {
            self.attributes.insert(key, value);
        }
    }

    /// Merge UI metadata key by key. Later values win.
    pub fn merge_ui(&mut self, metadata: Map<String, Value>) {
        for (key, value) in metadata {
            self.ui_metadata.insert(key, value);
        }
    }

    /// Check if the field is required.
    pub fn is_required(&self) -> bool {
        self.attributes
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Check if the field is read-only in the UI.
    pub fn is_read_only(&self) -> bool {
        self.ui_metadata
            .get("readOnly")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Get the UI ordering hint.
    pub fn display_after_field(&self) -> Option<&str> {
        self.ui_metadata.get(DISPLAY_AFTER_FIELD).and_then(Value::as_str)
    }

    /// Get the UI display name.
    pub fn display_name(&self) -> Option<&str> {
        self.ui_metadata.get("displayName").and_then(Value::as_str)
    }
}

/// How a foreign-key field presents its referenced entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowSpec {
    /// Endpoint serving the referenced entity.
    pub endpoint: String,
    /// Display groups.
    #[serde(rename = "displayInfo", default)]
    pub display_info: Vec<DisplayInfo>,
}

/// Which referenced fields to show on which pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayInfo {
    /// Pages (e.g. `"summary"`, `"edit|create"`) this group applies to.
    #[serde(rename = "displayPages")]
    pub display_pages: Value,
    /// Referenced field names.
    pub fields: Vec<SmolStr>,
}
