//! The decorator micro-language.
//!
//! A decorator is a `@tag payload` directive found either on its own
//! commented line inside an entity block or as the suffix of a field line.
//! Handling happens in three steps:
//!
//! 1. [`tokenizer`] splits the text into raw `(tag, payload)` pairs.
//! 2. [`resolve`] decides the scope of every directive (field or entity) and
//!    turns it into a [`Decorator`].
//! 3. The engine applies each [`Decorator`] to the entity map.

mod engine;
pub mod tokenizer;
pub mod ui;

use serde_json::{Map, Value};
use smol_str::SmolStr;
use tracing::debug;

use crate::ast::DISPLAY_AFTER_FIELD;
use crate::error::{SchemaResult, WarningKind};
use crate::parser::ParseContext;
use crate::parser::literal::parse_object;

pub(crate) use engine::merge_dictionary;
use tokenizer::DirectiveTokenizer;

/// Create/read/update/delete, in the order their letters are reported.
pub const OPERATIONS: &[&str] = &["create", "read", "update", "delete"];

/// The closed set of recognized directive tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoratorTag {
    /// `@validate { ... }` merges attributes into a field.
    Validate,
    /// `@ui { ... }` merges UI metadata into a field or an entity.
    Ui,
    /// `@unique` adds a unique constraint group.
    Unique,
    /// `@abstract` marks an entity as an include source.
    Abstract,
    /// `@include Name` copies the fields of an abstraction.
    Include,
    /// `@service name` attaches a service.
    Service,
    /// `@operations [...]` restricts the permitted operations.
    Operations,
    /// `@show Entity { ... }` describes how a foreign key is displayed.
    Show,
    /// `@dictionary Name { ... }` defines lookup values.
    Dictionary,
}

/// Where a tag may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagScope {
    /// Only on a field.
    Field,
    /// Only on an entity.
    Entity,
    /// On a field or an entity, decided by position.
    Ambiguous,
    /// Anywhere, including outside entity blocks.
    Global,
}

impl DecoratorTag {
    /// Look up a tag by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "validate" => Some(Self::Validate),
            "ui" => Some(Self::Ui),
            "unique" => Some(Self::Unique),
            "abstract" => Some(Self::Abstract),
            "include" => Some(Self::Include),
            "service" => Some(Self::Service),
            "operations" => Some(Self::Operations),
            "show" => Some(Self::Show),
            "dictionary" => Some(Self::Dictionary),
            _ => None,
        }
    }

    /// Get the tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Ui => "ui",
            Self::Unique => "unique",
            Self::Abstract => "abstract",
            Self::Include => "include",
            Self::Service => "service",
            Self::Operations => "operations",
            Self::Show => "show",
            Self::Dictionary => "dictionary",
        }
    }

    /// Get the scope of the tag.
    pub fn scope(&self) -> TagScope {
        match self {
            Self::Validate => TagScope::Field,
            Self::Ui | Self::Unique => TagScope::Ambiguous,
            Self::Abstract | Self::Include | Self::Service | Self::Operations | Self::Show => {
                TagScope::Entity
            }
            Self::Dictionary => TagScope::Global,
        }
    }
}

impl std::fmt::Display for DecoratorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

/// A directive with its scope decided.
#[derive(Debug, Clone, PartialEq)]
pub enum Decorator<'a> {
    /// Field attributes.
    Validate { field: SmolStr, payload: &'a str },
    /// Field UI metadata.
    FieldUi { field: SmolStr, payload: &'a str },
    /// Entity UI metadata.
    EntityUi { payload: &'a str },
    /// Unique group led by `field`; `rest` may list `+ other` fields.
    FieldUnique { field: SmolStr, rest: &'a str },
    /// Unique group given as a list.
    EntityUnique { payload: &'a str },
    /// Mark the entity abstract.
    Abstract,
    /// Include one or more abstractions, optionally with an ordering override.
    Include {
        payload: &'a str,
        ui_override: Option<Map<String, Value>>,
    },
    /// Attach services.
    Service { payload: &'a str },
    /// Restrict operations.
    Operations { payload: &'a str },
    /// Foreign key display specification.
    Show { payload: &'a str },
}

/// Resolve and apply every directive in `text` to `entity`.
///
/// `field` is the normalized name of the field whose line carried the
/// directives, or `None` for a standalone decorator line.
pub(crate) fn process(
    ctx: &mut ParseContext,
    entity: &SmolStr,
    field: Option<SmolStr>,
    text: &str,
) -> SchemaResult<()> {
    for decorator in resolve(ctx, field, text) {
        debug!(entity = %entity, line = ctx.line, ?decorator, "applying decorator");
        engine::apply(ctx, entity, decorator)?;
    }
    Ok(())
}

/// Decide the scope of every directive in `text`.
///
/// An ambiguous tag (`@ui`, `@unique`) with no bound field takes its first
/// payload token as the field name unless the payload opens with a brace or
/// bracket. Once bound, the field stays bound for the rest of the text.
pub(crate) fn resolve<'a>(
    ctx: &mut ParseContext,
    mut bound: Option<SmolStr>,
    text: &'a str,
) -> Vec<Decorator<'a>> {
    let mut resolved = Vec::new();

    for raw in DirectiveTokenizer::new(text) {
        let Some(tag) = DecoratorTag::from_name(raw.tag) else {
            ctx.warn(
                WarningKind::UnknownDirective,
                format!("`@{}` is not a recognized directive", raw.tag),
            );
            continue;
        };

        let mut payload = raw.payload;
        if tag.scope() == TagScope::Ambiguous && bound.is_none() && !opens_literal(payload) {
            let (head, rest) = split_head(payload);
            if !head.is_empty() {
                bound = Some(ctx.options().normalize_field_name(head));
                payload = rest;
            }
        }

        let decorator = match (tag, &bound) {
            (DecoratorTag::Validate, Some(field)) => Decorator::Validate {
                field: field.clone(),
                payload,
            },
            (DecoratorTag::Validate, None) => {
                ctx.warn(
                    WarningKind::MisplacedDirective,
                    "`@validate` needs a field; put it on a field line",
                );
                continue;
            }
            (DecoratorTag::Ui, Some(field)) => Decorator::FieldUi {
                field: field.clone(),
                payload,
            },
            (DecoratorTag::Ui, None) => {
                if let Some(Decorator::Include { ui_override, .. }) = resolved.last_mut() {
                    if ui_override.is_none() {
                        if let Some(map) = include_override(payload) {
                            *ui_override = Some(map);
                            continue;
                        }
                    }
                }
                Decorator::EntityUi { payload }
            }
            (DecoratorTag::Unique, Some(field)) => Decorator::FieldUnique {
                field: field.clone(),
                rest: payload,
            },
            (DecoratorTag::Unique, None) => Decorator::EntityUnique { payload },
            (DecoratorTag::Abstract, _) => Decorator::Abstract,
            (DecoratorTag::Include, _) => Decorator::Include {
                payload,
                ui_override: None,
            },
            (DecoratorTag::Service, _) => Decorator::Service { payload },
            (DecoratorTag::Operations, _) => Decorator::Operations { payload },
            (DecoratorTag::Show, _) => Decorator::Show { payload },
            (DecoratorTag::Dictionary, _) => {
                ctx.warn(
                    WarningKind::MisplacedDirective,
                    "`@dictionary` must start its own comment line",
                );
                continue;
            }
        };
        resolved.push(decorator);
    }

    resolved
}

/// An entity `@ui` payload that only carries include ordering.
fn include_override(payload: &str) -> Option<Map<String, Value>> {
    if !payload.starts_with('{') {
        return None;
    }
    parse_object(payload)
        .ok()
        .flatten()
        .filter(|map| map.contains_key(DISPLAY_AFTER_FIELD))
}

fn opens_literal(payload: &str) -> bool {
    payload.is_empty() || payload.starts_with('{') || payload.starts_with('[')
}

/// Split a payload into its leading name token and the trimmed remainder.
///
/// The name ends at whitespace or at an opening brace or bracket.
pub(crate) fn split_head(payload: &str) -> (&str, &str) {
    let payload = payload.trim();
    let end = payload
        .find(|c: char| c.is_whitespace() || c == '{' || c == '[')
        .unwrap_or(payload.len());
    (&payload[..end], payload[end..].trim())
}
