//! Post-pass that turns the builder's output into a [`SchemaDocument`].

use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::ast::SchemaDocument;
use crate::builder::BuildParts;

/// Derive the document-wide aggregates and package the document.
///
/// Each relationship is mirrored into its source entity's own list, once.
pub(crate) fn assemble(parts: BuildParts) -> SchemaDocument {
    let BuildParts {
        mut entities,
        relationships,
        dictionaries,
    } = parts;

    for relationship in &relationships {
        if let Some(source) = entities.get_mut(&relationship.source) {
            if !source.relationships.contains(&relationship.target) {
                source.relationships.push(relationship.target.clone());
            }
        }
    }

    let services: IndexSet<SmolStr> = entities
        .values()
        .flat_map(|entity| entity.service.iter().cloned())
        .collect();
    let included_entities: IndexSet<SmolStr> = entities
        .values()
        .flat_map(|entity| entity.include.iter().cloned())
        .collect();

    SchemaDocument {
        relationships,
        dictionaries,
        services,
        included_entities,
        entities,
    }
}
