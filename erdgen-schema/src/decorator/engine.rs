//! Handlers that apply resolved decorators to the entity map.

use indexmap::IndexSet;
use serde_json::{Map, Value};
use smol_str::SmolStr;
use tracing::debug;

use super::tokenizer::DirectiveTokenizer;
use super::{Decorator, DecoratorTag, OPERATIONS, split_head, ui};
use crate::ast::{
    DISPLAY_AFTER_FIELD, DisplayInfo, QuotedString, RESERVED_ATTRIBUTES, ShowSpec,
    foreign_key_name,
};
use crate::builder::Placement;
use crate::error::{SchemaError, SchemaResult, WarningKind};
use crate::parser::ParseContext;
use crate::parser::literal::parse_literal;

/// Apply one decorator to `entity`.
pub(super) fn apply(
    ctx: &mut ParseContext,
    entity: &SmolStr,
    decorator: Decorator<'_>,
) -> SchemaResult<()> {
    match decorator {
        Decorator::Validate { field, payload } => merge_validation(ctx, entity, &field, payload),
        Decorator::FieldUi { field, payload } => merge_field_ui(ctx, entity, &field, payload),
        Decorator::EntityUi { payload } => merge_entity_ui(ctx, entity, payload),
        Decorator::FieldUnique { field, rest } => {
            let mut group = vec![field];
            group.extend(
                rest.split('+')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(|name| ctx.options().normalize_field_name(name)),
            );
            ctx.builder.entity_mut(entity).add_unique(group);
            Ok(())
        }
        Decorator::EntityUnique { payload } => entity_unique(ctx, entity, payload),
        Decorator::Abstract => {
            ctx.builder.entity_mut(entity).is_abstract = true;
            Ok(())
        }
        Decorator::Include {
            payload,
            ui_override,
        } => include(ctx, entity, payload, ui_override),
        Decorator::Service { payload } => service(ctx, entity, payload),
        Decorator::Operations { payload } => operations(ctx, entity, payload),
        Decorator::Show { payload } => show(ctx, entity, payload),
    }
}

/// Decode a payload; failure aborts the compilation.
fn decode(ctx: &ParseContext, tag: DecoratorTag, payload: &str) -> SchemaResult<Value> {
    parse_literal(payload)
        .map_err(|e| SchemaError::malformed_payload(tag.as_str(), payload, ctx.line, e.message))
}

/// Decode a payload that should be an object. A well-formed payload of
/// another shape is a warning and yields `None`.
fn decode_object(
    ctx: &mut ParseContext,
    tag: DecoratorTag,
    payload: &str,
) -> SchemaResult<Option<Map<String, Value>>> {
    match decode(ctx, tag, payload)? {
        Value::Object(map) => Ok(Some(map)),
        _ => {
            ctx.warn(
                WarningKind::UnexpectedPayload,
                format!("`{}` payload `{}` is not an object", tag, payload),
            );
            Ok(None)
        }
    }
}

fn merge_validation(
    ctx: &mut ParseContext,
    entity: &str,
    field: &str,
    payload: &str,
) -> SchemaResult<()> {
    let Some(attributes) = decode_object(ctx, DecoratorTag::Validate, payload)? else {
        return Ok(());
    };

    let mut accepted = Map::new();
    for (key, value) in attributes {
        if RESERVED_ATTRIBUTES.contains(&key.as_str()) {
            ctx.warn(
                WarningKind::UnexpectedPayload,
                format!("`@validate` cannot set `{}` on `{}.{}`", key, entity, field),
            );
            continue;
        }
        accepted.insert(key, value);
    }
    ctx.builder.field_mut(entity, field).merge_attributes(accepted);
    Ok(())
}

fn merge_field_ui(
    ctx: &mut ParseContext,
    entity: &str,
    field: &str,
    payload: &str,
) -> SchemaResult<()> {
    let Some(metadata) = decode_object(ctx, DecoratorTag::Ui, payload)? else {
        return Ok(());
    };

    if let Err((kind, message)) = ui::check(&metadata) {
        ctx.warn(kind, format!("skipping `@ui` on `{}.{}`: {}", entity, field, message));
        return Ok(());
    }
    ctx.builder.field_mut(entity, field).merge_ui(metadata);
    Ok(())
}

fn merge_entity_ui(ctx: &mut ParseContext, entity: &str, payload: &str) -> SchemaResult<()> {
    if let Some(metadata) = decode_object(ctx, DecoratorTag::Ui, payload)? {
        ctx.builder
            .entity_mut(entity)
            .ui_metadata
            .extend(metadata);
    }
    Ok(())
}

fn entity_unique(ctx: &mut ParseContext, entity: &str, payload: &str) -> SchemaResult<()> {
    if payload.is_empty() {
        ctx.warn(
            WarningKind::UnexpectedPayload,
            format!("`@unique` on `{}` names no fields", entity),
        );
        return Ok(());
    }

    let Some(names) = string_list(ctx, DecoratorTag::Unique, payload)? else {
        return Ok(());
    };
    if names.is_empty() {
        ctx.warn(
            WarningKind::UnexpectedPayload,
            format!("`@unique` on `{}` names no fields", entity),
        );
        return Ok(());
    }

    let group = names
        .iter()
        .map(|name| ctx.options().normalize_field_name(name))
        .collect();
    ctx.builder.entity_mut(entity).add_unique(group);
    Ok(())
}

/// Decode a list of strings, warning about (and dropping) other items.
fn string_list(
    ctx: &mut ParseContext,
    tag: DecoratorTag,
    payload: &str,
) -> SchemaResult<Option<Vec<String>>> {
    let Value::Array(items) = decode(ctx, tag, payload)? else {
        ctx.warn(
            WarningKind::UnexpectedPayload,
            format!("`{}` payload `{}` is not a list", tag, payload),
        );
        return Ok(None);
    };

    let mut names = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(name) => names.push(name),
            other => ctx.warn(
                WarningKind::UnexpectedPayload,
                format!("`{}` ignores non-string item {}", tag, other),
            ),
        }
    }
    Ok(Some(names))
}

fn include(
    ctx: &mut ParseContext,
    entity: &str,
    payload: &str,
    ui_override: Option<Map<String, Value>>,
) -> SchemaResult<()> {
    let names = if payload.starts_with('[') {
        match string_list(ctx, DecoratorTag::Include, payload)? {
            Some(names) => names,
            None => return Ok(()),
        }
    } else {
        let (head, _) = split_head(payload);
        if head.is_empty() {
            ctx.warn(
                WarningKind::UnexpectedPayload,
                format!("`@include` on `{}` names no entity", entity),
            );
            return Ok(());
        }
        vec![head.to_string()]
    };

    let placement = match ui_override.as_ref().and_then(|m| m.get(DISPLAY_AFTER_FIELD)) {
        None => Placement::Sequential,
        Some(Value::String(anchor)) if anchor.is_empty() => Placement::Unordered,
        Some(Value::String(anchor)) => {
            Placement::After(ctx.options().normalize_field_name(anchor))
        }
        Some(other) => {
            ctx.warn(
                WarningKind::UnexpectedPayload,
                format!("`{}` must be a string, got {}", DISPLAY_AFTER_FIELD, other),
            );
            Placement::Sequential
        }
    };

    let mut counter = 0;
    for name in names {
        ctx.builder
            .include(entity, &name, &placement, &mut counter, ctx.line)?;
    }
    Ok(())
}

fn service(ctx: &mut ParseContext, entity: &str, payload: &str) -> SchemaResult<()> {
    if payload.is_empty() {
        ctx.warn(
            WarningKind::UnexpectedPayload,
            format!("`@service` on `{}` names no service", entity),
        );
        return Ok(());
    }

    if !payload.starts_with('{') {
        let (name, _) = split_head(payload);
        ctx.builder.entity_mut(entity).service.push(SmolStr::new(name));
        return Ok(());
    }

    let Some(services) = decode_object(ctx, DecoratorTag::Service, payload)? else {
        return Ok(());
    };
    for (name, details) in services {
        if let Some(definition) = ctx.options().services.get(name.as_str()) {
            let listed = listed_fields(&details);
            if let Some(missing) = definition
                .required_fields
                .iter()
                .find(|required| !listed.contains(required.as_str()))
            {
                return Err(SchemaError::ServiceRequirement {
                    entity: entity.to_string(),
                    service: name,
                    field: missing.clone(),
                });
            }
        }
        ctx.builder.entity_mut(entity).service.push(SmolStr::new(&name));
    }
    Ok(())
}

/// Field names listed in a service's details, either as a `fields` list or
/// as the keys of a `fields` object.
fn listed_fields(details: &Value) -> IndexSet<&str> {
    match details.get("fields") {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        Some(Value::Object(map)) => map.keys().map(String::as_str).collect(),
        _ => IndexSet::new(),
    }
}

fn operations(ctx: &mut ParseContext, entity: &str, payload: &str) -> SchemaResult<()> {
    let Value::Array(items) = decode(ctx, DecoratorTag::Operations, payload)? else {
        ctx.warn(
            WarningKind::UnexpectedPayload,
            format!("`@operations` payload `{}` is not a list", payload),
        );
        return Ok(());
    };

    let letters: String = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_lowercase)
        .filter(|op| OPERATIONS.contains(&op.as_str()))
        .filter_map(|op| op.chars().next())
        .collect();

    if !letters.is_empty() {
        debug!(entity, operations = %letters, "restricting operations");
        ctx.builder.entity_mut(entity).operations = letters;
    }
    Ok(())
}

fn show(ctx: &mut ParseContext, entity: &str, payload: &str) -> SchemaResult<()> {
    let (foreign, rest) = split_head(payload);
    if foreign.is_empty() {
        ctx.warn(
            WarningKind::UnexpectedPayload,
            format!("`@show` on `{}` names no entity", entity),
        );
        return Ok(());
    }

    let spec = if rest.is_empty() {
        Map::new()
    } else {
        match decode_object(ctx, DecoratorTag::Show, rest)? {
            Some(spec) => spec,
            None => return Ok(()),
        }
    };

    let endpoint = spec
        .get("endpoint")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| foreign.to_lowercase());

    let groups = match spec.get("displayInfo") {
        None => Vec::new(),
        Some(Value::Array(groups)) => groups.clone(),
        Some(other) => {
            ctx.warn(
                WarningKind::UnexpectedPayload,
                format!("`@show {}` displayInfo {} is not a list", foreign, other),
            );
            Vec::new()
        }
    };

    let mut display_info = Vec::with_capacity(groups.len());
    for group in groups {
        match display_group(&group) {
            Some(info) => display_info.push(info),
            None => ctx.warn(
                WarningKind::IncompleteDisplayInfo,
                format!(
                    "`@show {}` group {} needs `displayPages` and a `fields` list",
                    foreign, group
                ),
            ),
        }
    }

    let reference_type = ctx.options().reference_type.clone();
    let field = ctx.builder.field_mut(entity, &foreign_key_name(foreign));
    if field.field_type.is_none() {
        field.field_type = Some(reference_type);
    }
    field.show = Some(ShowSpec {
        endpoint,
        display_info,
    });
    Ok(())
}

fn display_group(group: &Value) -> Option<DisplayInfo> {
    let display_pages = group.get("displayPages")?.clone();
    let fields = group
        .get("fields")?
        .as_array()?
        .iter()
        .map(|f| f.as_str().map(SmolStr::new))
        .collect::<Option<Vec<_>>>()?;
    Some(DisplayInfo {
        display_pages,
        fields,
    })
}

/// Apply a `@dictionary Name { ... }` line.
pub(crate) fn merge_dictionary(ctx: &mut ParseContext, text: &str) -> SchemaResult<()> {
    let mut directives = DirectiveTokenizer::new(text);
    let Some(raw) = directives.next() else {
        return Ok(());
    };
    for extra in directives {
        ctx.warn(
            WarningKind::MisplacedDirective,
            format!("`@{}` after a dictionary is ignored", extra.tag),
        );
    }

    let (name, body) = split_head(raw.payload);
    if name.is_empty() {
        ctx.warn(WarningKind::UnexpectedPayload, "`@dictionary` needs a name");
        return Ok(());
    }
    let Some(values) = decode_object(ctx, DecoratorTag::Dictionary, body)? else {
        return Ok(());
    };

    let mut entries = Vec::with_capacity(values.len());
    for (key, value) in values {
        let value = match value {
            Value::String(s) => QuotedString::new(s),
            Value::Number(n) => QuotedString::new(n.to_string()),
            Value::Bool(b) => QuotedString::new(b.to_string()),
            other => {
                ctx.warn(
                    WarningKind::NonScalarDictionaryValue,
                    format!("dictionary `{}` key `{}` has non-scalar value {}", name, key, other),
                );
                continue;
            }
        };
        entries.push((SmolStr::new(key), value));
    }

    debug!(dictionary = name, entries = entries.len(), "merging dictionary");
    ctx.builder.merge_dictionary(name, entries);
    Ok(())
}
