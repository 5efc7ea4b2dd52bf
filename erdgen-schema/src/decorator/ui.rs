//! Allow-list for field UI metadata.

use serde_json::{Map, Value};

use crate::error::WarningKind;

/// UI attributes a field `@ui` payload may set.
pub const UI_ATTRIBUTES: &[&str] = &[
    "displayName",
    "display",
    "widget",
    "placeholder",
    "helpText",
    "readOnly",
    "displayAfterField",
    "displayPages",
    "clientEdit",
];

/// Values accepted for the `widget` attribute.
pub const WIDGETS: &[&str] = &[
    "text",
    "textarea",
    "password",
    "email",
    "url",
    "number",
    "checkbox",
    "select",
    "multiselect",
    "date",
    "jsoneditor",
    "reference",
];

/// Values an attribute is restricted to, if any.
pub fn allowed_values(attribute: &str) -> Option<&'static [&'static str]> {
    match attribute {
        "widget" => Some(WIDGETS),
        _ => None,
    }
}

/// Check every key (and constrained value) of a field UI payload.
///
/// Returns the first violation found.
pub fn check(metadata: &Map<String, Value>) -> Result<(), (WarningKind, String)> {
    for (key, value) in metadata {
        if !UI_ATTRIBUTES.contains(&key.as_str()) {
            return Err((
                WarningKind::UnsupportedUiAttribute,
                format!("ui attribute `{}` is not supported", key),
            ));
        }
        if let Some(allowed) = allowed_values(key) {
            let accepted = value.as_str().is_some_and(|v| allowed.contains(&v));
            if !accepted {
                return Err((
                    WarningKind::UnsupportedUiValue,
                    format!(
                        "ui value {} for `{}` is not supported; allowed values are {}",
                        value,
                        key,
                        allowed.join(", ")
                    ),
                ));
            }
        }
    }
    Ok(())
}
